use serde_json::json;

/// Menu as returned by `GET /menu/`, with one item switched off.
pub fn menu_fixture() -> String {
    return json!([
        {
            "id": 1,
            "name": "Margherita",
            "price": 5.0,
            "category": "pizza",
            "is_available": true
        },
        {
            "id": 2,
            "name": "Lemonade",
            "price": 3.0,
            "category": "drinks",
            "is_available": true
        },
        {
            "id": 3,
            "name": "Truffle Risotto",
            "price": 18.5,
            "category": "mains",
            "is_available": false
        }
    ])
    .to_string();
}

/// Order confirmation as returned by `POST /orders/` for two margheritas and a
/// lemonade.
pub fn order_confirmation_fixture() -> String {
    return json!({
        "id": 42,
        "created_at": "2024-03-01T18:30:00",
        "items": [
            { "menu_item_id": 1, "quantity": 2, "unit_price": 5.0 },
            { "menu_item_id": 2, "quantity": 1, "unit_price": 3.0 }
        ],
        "total_amount": 13.0
    })
    .to_string();
}
