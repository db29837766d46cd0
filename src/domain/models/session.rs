#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use std::sync::Arc;

use parking_lot::RwLock;

/// Holds the bearer token for the current session. Cloning shares the same
/// underlying token, so the API client and the caller always agree on whether
/// the user is logged in.
#[derive(Clone, Debug, Default)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
}

impl Session {
    pub fn new() -> Session {
        return Session::default();
    }

    pub fn with_token(token: &str) -> Session {
        let session = Session::new();
        session.set_token(token);
        return session;
    }

    pub fn set_token(&self, token: &str) {
        *self.token.write() = Some(token.to_string());
    }

    /// Returns the current token, or an empty string when logged out.
    pub fn get_token(&self) -> String {
        return self.token.read().clone().unwrap_or_default();
    }

    pub fn clear(&self) {
        *self.token.write() = None;
    }

    pub fn is_logged_in(&self) -> bool {
        return !self.get_token().is_empty();
    }
}
