use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::MenuItem;
use super::MenuItemUpdate;
use super::NewMenuItem;
use super::OrderConfirmation;
use super::OrderRequest;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

/// Every endpoint of the restaurant backend. Each call issues at most one
/// request. Implementations attach the session's bearer token to
/// authenticated calls and clear the session when the server rejects it.
#[async_trait]
pub trait RestaurantApi {
    /// Exchanges credentials for a bearer token and stores it on the session.
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError>;

    async fn fetch_menu(&self) -> Result<Vec<MenuItem>, ApiError>;

    async fn add_menu_item(&self, item: &NewMenuItem) -> Result<MenuItem, ApiError>;

    /// Only the fields set on `update` are sent. The server keeps the rest.
    async fn update_menu_item(
        &self,
        id: i64,
        update: &MenuItemUpdate,
    ) -> Result<MenuItem, ApiError>;

    async fn delete_menu_item(&self, id: i64) -> Result<(), ApiError>;

    /// Fails without a request when `order` has no items.
    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderConfirmation, ApiError>;

    async fn list_orders(&self) -> Result<Vec<OrderConfirmation>, ApiError>;
}
