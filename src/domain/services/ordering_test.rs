use std::time::Duration;

use anyhow::Result;
use mockito::Matcher;
use serde_json::json;

use super::Ordering;
use crate::domain::models::ApiError;
use crate::domain::models::MenuItem;
use crate::domain::models::Session;
use crate::infrastructure::api::HttpApi;

fn api(url: String) -> HttpApi {
    return HttpApi::new(&url, Duration::from_millis(1000), Session::with_token("abc"));
}

fn menu() -> Result<Vec<MenuItem>> {
    return Ok(serde_json::from_str(&test_utils::menu_fixture())?);
}

#[tokio::test]
async fn it_loads_the_menu() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/menu/")
        .with_status(200)
        .with_body(test_utils::menu_fixture())
        .create();

    let mut ordering = Ordering::default();
    ordering.load_menu(&api(server.url())).await?;

    mock.assert();
    assert_eq!(ordering.menu.len(), 3);
    assert_eq!(ordering.available().len(), 2);

    return Ok(());
}

#[test]
fn it_adds_menu_items_by_id() -> Result<()> {
    let mut ordering = Ordering::new(menu()?);
    ordering.add_to_order(1, 1)?;
    ordering.add_to_order(2, 1)?;
    ordering.add_to_order(1, 1)?;

    assert_eq!(ordering.cart.len(), 2);
    assert_eq!(ordering.cart.total(), 13.0);

    return Ok(());
}

#[test]
fn it_rejects_unknown_and_unavailable_items() -> Result<()> {
    let mut ordering = Ordering::new(menu()?);

    assert_eq!(
        ordering.add_to_order(99, 1).unwrap_err(),
        ApiError::invalid("Menu item 99 does not exist")
    );
    assert_eq!(
        ordering.add_to_order(3, 1).unwrap_err(),
        ApiError::invalid("Truffle Risotto is not available")
    );
    assert!(ordering.cart.is_empty());

    return Ok(());
}

#[tokio::test]
async fn it_clears_the_cart_after_submitting() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/orders/")
        .match_body(Matcher::Json(json!({
            "items": [
                { "menu_item_id": 1, "quantity": 2 },
                { "menu_item_id": 2, "quantity": 1 }
            ]
        })))
        .with_status(200)
        .with_body(test_utils::order_confirmation_fixture())
        .create();

    let mut ordering = Ordering::new(menu()?);
    ordering.add_to_order(1, 2)?;
    ordering.add_to_order(2, 1)?;
    let confirmation = ordering.submit(&api(server.url())).await?;

    mock.assert();
    assert_eq!(confirmation.id, 42);
    assert!(ordering.cart.is_empty());

    return Ok(());
}

#[tokio::test]
async fn it_keeps_the_cart_when_submitting_fails() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/orders/")
        .with_status(500)
        .with_body(json!({ "detail": "Kitchen is closed" }).to_string())
        .create();

    let mut ordering = Ordering::new(menu()?);
    ordering.add_to_order(1, 2)?;
    let res = ordering.submit(&api(server.url())).await;

    mock.assert();
    assert_eq!(res.unwrap_err().to_string(), "Kitchen is closed");
    assert_eq!(ordering.cart.len(), 1);
    assert_eq!(ordering.cart.total(), 10.0);

    return Ok(());
}

#[tokio::test]
async fn it_does_not_submit_an_empty_cart() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", "/orders/").expect(0).create();

    let mut ordering = Ordering::new(menu()?);
    let res = ordering.submit(&api(server.url())).await;

    mock.assert();
    assert_eq!(res.unwrap_err(), ApiError::invalid("Order is empty"));

    return Ok(());
}
