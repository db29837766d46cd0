#[cfg(test)]
#[path = "http_api_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Method;
use reqwest::RequestBuilder;
use reqwest::Response;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ApiError;
use crate::domain::models::LoginResponse;
use crate::domain::models::MenuItem;
use crate::domain::models::MenuItemUpdate;
use crate::domain::models::NewMenuItem;
use crate::domain::models::OrderConfirmation;
use crate::domain::models::OrderRequest;
use crate::domain::models::RestaurantApi;
use crate::domain::models::Session;

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ErrorResponse {
    detail: Option<serde_json::Value>,
}

async fn error_message(res: Response) -> String {
    if let Ok(ErrorResponse {
        detail: Some(serde_json::Value::String(detail)),
    }) = res.json::<ErrorResponse>().await
    {
        return detail;
    }

    return "Request failed".to_string();
}

/// `RestaurantApi` over HTTP. Holds a handle to the shared session so a
/// rejected token is cleared for every other holder of the session too.
pub struct HttpApi {
    url: String,
    timeout: Duration,
    session: Session,
    client: reqwest::Client,
}

impl HttpApi {
    pub fn new(url: &str, timeout: Duration, session: Session) -> HttpApi {
        return HttpApi {
            url: url.trim_end_matches('/').to_string(),
            timeout,
            session,
            client: reqwest::Client::new(),
        };
    }

    pub fn from_config(session: Session) -> Result<HttpApi> {
        let timeout = Config::get(ConfigKey::RequestTimeout).parse::<u64>()?;

        return Ok(HttpApi::new(
            &Config::get(ConfigKey::ApiURL),
            Duration::from_millis(timeout),
            session,
        ));
    }

    pub fn session(&self) -> &Session {
        return &self.session;
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(method = %method, path = path, "Sending API request");

        return self
            .client
            .request(method, format!("{url}{path}", url = self.url))
            .timeout(self.timeout);
    }

    fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.session.get_token();
        if token.is_empty() {
            tracing::warn!(path = path, "No session token for authenticated request");
            return Err(ApiError::auth("Not logged in"));
        }

        return Ok(self.request(method, path).bearer_auth(token));
    }

    #[allow(clippy::implicit_return)]
    async fn send(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let res = req.send().await.map_err(|err| {
            tracing::error!(error = ?err, "API is not reachable");
            return ApiError::from(err);
        })?;

        let status = res.status();
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("Session token rejected, clearing session");
            self.session.clear();
            return Err(ApiError::auth("Session expired"));
        }

        if !status.is_success() {
            let message = error_message(res).await;
            tracing::error!(
                status = status.as_u16(),
                detail = %message,
                "API request failed"
            );
            return Err(ApiError::Request {
                status: Some(status.as_u16()),
                message,
            });
        }

        return Ok(res);
    }

    #[allow(clippy::implicit_return)]
    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let res = self.send(req).await?;
        let body = res.json::<T>().await.map_err(|err| {
            tracing::error!(error = ?err, "Failed to decode API response");
            return ApiError::from(err);
        })?;

        return Ok(body);
    }
}

#[async_trait]
impl RestaurantApi for HttpApi {
    #[allow(clippy::implicit_return)]
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let res = self
            .request(Method::POST, "/auth/login")
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "Login rejected");
            return Err(ApiError::auth("Invalid credentials"));
        }

        let login = res.json::<LoginResponse>().await?;
        self.session.set_token(&login.access_token);

        return Ok(login);
    }

    #[allow(clippy::implicit_return)]
    async fn fetch_menu(&self) -> Result<Vec<MenuItem>, ApiError> {
        let req = self.authorized(Method::GET, "/menu/")?;
        return self.send_json(req).await;
    }

    #[allow(clippy::implicit_return)]
    async fn add_menu_item(&self, item: &NewMenuItem) -> Result<MenuItem, ApiError> {
        item.validate()?;

        let req = self.authorized(Method::POST, "/menu/")?.json(item);
        return self.send_json(req).await;
    }

    #[allow(clippy::implicit_return)]
    async fn update_menu_item(
        &self,
        id: i64,
        update: &MenuItemUpdate,
    ) -> Result<MenuItem, ApiError> {
        update.validate()?;

        let req = self
            .authorized(Method::PUT, &format!("/menu/{id}"))?
            .json(update);
        return self.send_json(req).await;
    }

    #[allow(clippy::implicit_return)]
    async fn delete_menu_item(&self, id: i64) -> Result<(), ApiError> {
        let req = self.authorized(Method::DELETE, &format!("/menu/{id}"))?;
        self.send(req).await?;

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderConfirmation, ApiError> {
        if order.is_empty() {
            return Err(ApiError::invalid("Order is empty"));
        }

        let req = self.authorized(Method::POST, "/orders/")?.json(order);
        return self.send_json(req).await;
    }

    #[allow(clippy::implicit_return)]
    async fn list_orders(&self) -> Result<Vec<OrderConfirmation>, ApiError> {
        let req = self.authorized(Method::GET, "/orders/")?;
        return self.send_json(req).await;
    }
}
