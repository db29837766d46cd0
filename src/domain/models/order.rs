use serde::Deserialize;
use serde::Serialize;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub menu_item_id: i64,
    pub quantity: i64,
}

/// Body of `POST /orders/`.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub items: Vec<OrderLine>,
}

impl OrderRequest {
    pub fn is_empty(&self) -> bool {
        return self.items.is_empty();
    }
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub menu_item_id: i64,
    pub quantity: i64,
    #[serde(default)]
    pub unit_price: f64,
}

/// Returned by `POST /orders/`, and once per order by `GET /orders/`.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub id: i64,
    pub created_at: String,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
}
