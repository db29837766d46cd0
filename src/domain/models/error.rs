#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

use thiserror::Error;

/// Failures surfaced by the restaurant API and the ordering flow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The bearer credential is missing, rejected or expired. The session has
    /// already been cleared when this is returned.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Any other non-success response, an undecodable body, or input rejected
    /// before reaching the network.
    #[error("{message}")]
    Request {
        status: Option<u16>,
        message: String,
    },

    /// No response was received.
    #[error("Network error: {0}")]
    Network(String),
}

impl ApiError {
    pub fn auth(message: &str) -> ApiError {
        return ApiError::Auth(message.to_string());
    }

    pub fn invalid(message: &str) -> ApiError {
        return ApiError::Request {
            status: None,
            message: message.to_string(),
        };
    }

    pub fn is_auth(&self) -> bool {
        return matches!(self, ApiError::Auth(_));
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Auth(_) => return Some(401),
            ApiError::Request { status, .. } => return *status,
            ApiError::Network(_) => return None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> ApiError {
        if err.is_decode() {
            return ApiError::Request {
                status: err.status().map(|status| return status.as_u16()),
                message: format!("Malformed response: {err}"),
            };
        }

        return ApiError::Network(err.to_string());
    }
}
