#[cfg(test)]
#[path = "cart_test.rs"]
mod tests;

use super::MenuItem;
use super::OrderLine;
use super::OrderRequest;

#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub menu_item_id: i64,
    pub name: String,
    pub unit_price: f64,
    pub quantity: i64,
}

impl CartLine {
    pub fn subtotal(&self) -> f64 {
        return self.unit_price * self.quantity as f64;
    }
}

/// Pending order lines, at most one per menu item, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Cart {
        return Cart::default();
    }

    /// Adds `quantity` of `item`, merging into an existing line for the same
    /// menu item. Non-positive quantities are ignored.
    pub fn add_line(&mut self, item: &MenuItem, quantity: i64) {
        if quantity <= 0 {
            tracing::debug!(
                menu_item_id = item.id,
                quantity = quantity,
                "Ignoring non-positive cart quantity"
            );
            return;
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| return line.menu_item_id == item.id)
        {
            line.quantity = line.quantity.saturating_add(quantity);
            return;
        }

        self.lines.push(CartLine {
            menu_item_id: item.id,
            name: item.name.to_string(),
            unit_price: item.price,
            quantity,
        });
    }

    pub fn remove_all(&mut self) {
        self.lines.clear();
    }

    pub fn total(&self) -> f64 {
        return self.lines.iter().map(|line| return line.subtotal()).sum();
    }

    pub fn to_order_request(&self) -> OrderRequest {
        let items = self
            .lines
            .iter()
            .map(|line| {
                return OrderLine {
                    menu_item_id: line.menu_item_id,
                    quantity: line.quantity,
                };
            })
            .collect();

        return OrderRequest { items };
    }

    pub fn lines(&self) -> &[CartLine] {
        return &self.lines;
    }

    pub fn len(&self) -> usize {
        return self.lines.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.lines.is_empty();
    }
}
