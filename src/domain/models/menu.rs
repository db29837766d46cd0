#[cfg(test)]
#[path = "menu_test.rs"]
mod tests;

use serde::Deserialize;
use serde::Serialize;

use super::ApiError;

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub is_available: bool,
}

impl MenuItem {
    /// Items that can currently be ordered, in menu order.
    pub fn available(items: &[MenuItem]) -> Vec<&MenuItem> {
        return items.iter().filter(|item| return item.is_available).collect();
    }
}

/// Body of `POST /menu/`.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMenuItem {
    pub name: String,
    pub price: f64,
    pub category: String,
    pub is_available: bool,
}

impl NewMenuItem {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::invalid("Menu item name is required"));
        }
        validate_price(self.price)?;

        return Ok(());
    }
}

fn is_blank(value: &Option<String>) -> bool {
    return value.as_ref().map_or(true, |text| return text.is_empty());
}

fn validate_price(price: f64) -> Result<(), ApiError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ApiError::invalid("Price must be zero or greater"));
    }

    return Ok(());
}

/// Body of `PUT /menu/{id}`. Absent fields, and string fields left empty, are
/// left out of the JSON entirely so the server keeps its current values.
#[derive(Default, Debug, Clone, PartialEq, Serialize)]
pub struct MenuItemUpdate {
    #[serde(skip_serializing_if = "is_blank")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "is_blank")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

impl MenuItemUpdate {
    pub fn name(mut self, name: &str) -> MenuItemUpdate {
        self.name = Some(name.to_string());
        return self;
    }

    pub fn price(mut self, price: f64) -> MenuItemUpdate {
        self.price = Some(price);
        return self;
    }

    pub fn category(mut self, category: &str) -> MenuItemUpdate {
        self.category = Some(category.to_string());
        return self;
    }

    pub fn is_available(mut self, is_available: bool) -> MenuItemUpdate {
        self.is_available = Some(is_available);
        return self;
    }

    /// True when serializing would produce `{}`.
    pub fn is_empty(&self) -> bool {
        return is_blank(&self.name)
            && self.price.is_none()
            && is_blank(&self.category)
            && self.is_available.is_none();
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(price) = self.price {
            validate_price(price)?;
        }

        return Ok(());
    }
}
