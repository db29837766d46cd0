use anyhow::anyhow;
use anyhow::Result;
use strum::IntoEnumIterator;
use tempdir::TempDir;

use super::build;
use super::format_cart;
use super::format_menu_item;
use super::format_order;
use super::handle_auth_error;
use super::matches_chain;
use super::parse_order_item;
use crate::configuration::ConfigKey;
use crate::domain::models::ApiError;
use crate::domain::models::Cart;
use crate::domain::models::MenuItem;
use crate::domain::models::OrderConfirmation;
use crate::infrastructure::storage::TokenCache;

fn menu() -> Result<Vec<MenuItem>> {
    return Ok(serde_json::from_str(&test_utils::menu_fixture())?);
}

#[test]
fn it_builds_a_valid_command() {
    build().debug_assert();
}

#[test]
fn it_parses_order_items() {
    assert_eq!(parse_order_item("3"), Ok((3, 1)));
    assert_eq!(parse_order_item("3:4"), Ok((3, 4)));
    assert_eq!(parse_order_item(" 3 : 4 "), Ok((3, 4)));
}

#[test]
fn it_rejects_bad_order_items() {
    assert!(parse_order_item("pizza").is_err());
    assert!(parse_order_item("3:many").is_err());
    assert!(parse_order_item("3:0").is_err());
    assert!(parse_order_item("3:-2").is_err());
}

#[test]
fn it_collects_repeated_order_items() -> Result<()> {
    let matches = build().try_get_matches_from(vec![
        "bistro", "order", "--item", "1:2", "--item", "2",
    ])?;

    let (_, order_matches) = matches.subcommand().unwrap();
    let items = order_matches
        .get_many::<(i64, i64)>("item")
        .unwrap()
        .copied()
        .collect::<Vec<(i64, i64)>>();

    assert_eq!(items, vec![(1, 2), (2, 1)]);

    return Ok(());
}

#[test]
fn it_propagates_global_args_to_subcommands() -> Result<()> {
    let matches = build().try_get_matches_from(vec![
        "bistro",
        "menu",
        "list",
        "--api-url",
        "http://localhost:9000",
    ])?;

    let chain = matches_chain(&matches);
    assert_eq!(chain.len(), 3);
    assert_eq!(
        chain[2].get_one::<String>("api-url"),
        Some(&"http://localhost:9000".to_string())
    );

    return Ok(());
}

#[test]
fn it_requires_an_id_for_deletes() {
    let res = build().try_get_matches_from(vec!["bistro", "menu", "delete"]);

    assert!(res.is_err());
}

#[test]
fn it_formats_menu_items() -> Result<()> {
    let items = menu()?;

    insta::assert_snapshot!(format_menu_item(&items[0]), @"- (ID: 1) Margherita [pizza] $5.00");
    insta::assert_snapshot!(format_menu_item(&items[2]), @"- (ID: 3) Truffle Risotto [mains] $18.50 (unavailable)");

    return Ok(());
}

#[test]
fn it_formats_carts() -> Result<()> {
    let items = menu()?;
    let mut cart = Cart::new();
    cart.add_line(&items[0], 2);
    cart.add_line(&items[1], 1);

    insta::assert_snapshot!(format_cart(&cart), @r###"
    - Margherita x 2 $10.00
    - Lemonade x 1 $3.00
    Total: $13.00
    "###);

    return Ok(());
}

#[test]
fn it_formats_orders() -> Result<()> {
    let order: OrderConfirmation =
        serde_json::from_str(&test_utils::order_confirmation_fixture())?;

    insta::assert_snapshot!(format_order(&order), @r###"
    Order #42 (2024-03-01T18:30:00)
      - 2 x item 1 @ $5.00
      - 1 x item 2 @ $3.00
      Total: $13.00
    "###);

    return Ok(());
}

#[test]
fn it_exposes_every_config_key_as_a_flag() {
    let cmd = build();
    for key in ConfigKey::iter() {
        assert_eq!(key.as_str(), key.to_string());
        assert!(cmd
            .get_arguments()
            .any(|arg| return arg.get_long() == Some(key.as_str())));
    }
}

#[tokio::test]
async fn it_removes_the_token_on_auth_errors() -> Result<()> {
    let tmp_dir = TempDir::new("bistro")?;
    let cache = TokenCache::new(tmp_dir.path().join("token"));
    std::fs::write(&cache.file_path, "expired")?;

    let err = handle_auth_error(&cache, ApiError::auth("Session expired").into()).await;

    assert!(!cache.file_path.exists());
    assert_eq!(
        err.to_string(),
        "Authentication failed: Session expired\nPlease log in again with `bistro login`."
    );

    return Ok(());
}

#[tokio::test]
async fn it_still_asks_to_log_in_when_the_token_cannot_be_removed() -> Result<()> {
    let tmp_dir = TempDir::new("bistro")?;
    // A directory can't be removed as a file.
    let cache = TokenCache::new(tmp_dir.path().to_path_buf());

    let err = handle_auth_error(&cache, ApiError::auth("Session expired").into()).await;

    assert!(err.to_string().contains("Please log in again"));

    return Ok(());
}

#[tokio::test]
async fn it_passes_other_errors_through() -> Result<()> {
    let tmp_dir = TempDir::new("bistro")?;
    let cache = TokenCache::new(tmp_dir.path().join("token"));
    std::fs::write(&cache.file_path, "abc")?;

    let err = handle_auth_error(&cache, anyhow!("Kitchen is closed")).await;

    assert_eq!(err.to_string(), "Kitchen is closed");
    assert!(cache.file_path.exists());

    return Ok(());
}
