#[cfg(test)]
#[path = "ordering_test.rs"]
mod tests;

use crate::domain::models::ApiError;
use crate::domain::models::Cart;
use crate::domain::models::MenuItem;
use crate::domain::models::OrderConfirmation;
use crate::domain::models::RestaurantApi;

/// The menu a customer is ordering from, and the cart they are building.
#[derive(Default)]
pub struct Ordering {
    pub menu: Vec<MenuItem>,
    pub cart: Cart,
}

impl Ordering {
    pub fn new(menu: Vec<MenuItem>) -> Ordering {
        return Ordering {
            menu,
            cart: Cart::new(),
        };
    }

    #[allow(clippy::implicit_return)]
    pub async fn load_menu(&mut self, api: &dyn RestaurantApi) -> Result<(), ApiError> {
        self.menu = api.fetch_menu().await?;
        tracing::debug!(items = self.menu.len(), "Loaded menu");

        return Ok(());
    }

    pub fn available(&self) -> Vec<&MenuItem> {
        return MenuItem::available(&self.menu);
    }

    pub fn add_to_order(&mut self, menu_item_id: i64, quantity: i64) -> Result<(), ApiError> {
        let item = match self.menu.iter().find(|item| return item.id == menu_item_id) {
            Some(item) => item,
            None => {
                return Err(ApiError::invalid(&format!(
                    "Menu item {menu_item_id} does not exist"
                )))
            }
        };

        if !item.is_available {
            return Err(ApiError::invalid(&format!(
                "{name} is not available",
                name = item.name
            )));
        }

        self.cart.add_line(item, quantity);
        return Ok(());
    }

    /// Submits the cart. It is only emptied once the order has been accepted,
    /// so a failed submission can be retried as is.
    #[allow(clippy::implicit_return)]
    pub async fn submit(&mut self, api: &dyn RestaurantApi) -> Result<OrderConfirmation, ApiError> {
        let confirmation = api.submit_order(&self.cart.to_order_request()).await?;
        tracing::debug!(
            order_id = confirmation.id,
            total_amount = confirmation.total_amount,
            "Order placed"
        );

        self.cart.remove_all();
        return Ok(confirmation);
    }
}
