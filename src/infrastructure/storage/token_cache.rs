#[cfg(test)]
#[path = "token_cache_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Session;

/// Keeps the session token on disk so it survives between CLI invocations.
pub struct TokenCache {
    pub file_path: path::PathBuf,
}

impl Default for TokenCache {
    fn default() -> TokenCache {
        return TokenCache::new(path::PathBuf::from(Config::get(ConfigKey::TokenFile)));
    }
}

impl TokenCache {
    pub fn new(file_path: path::PathBuf) -> TokenCache {
        return TokenCache { file_path };
    }

    /// Builds a session from the cached token. A missing file is a logged out
    /// session.
    pub async fn load(&self) -> Result<Session> {
        let session = Session::new();
        if !self.file_path.exists() {
            return Ok(session);
        }

        let token = fs::read_to_string(&self.file_path).await?;
        let token = token.trim();
        if !token.is_empty() {
            session.set_token(token);
        }

        return Ok(session);
    }

    pub async fn save(&self, session: &Session) -> Result<()> {
        if !session.is_logged_in() {
            return self.remove().await;
        }

        if let Some(parent) = self.file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&self.file_path).await?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // Files from before the mode was set keep their old permissions.
            file.set_permissions(std::fs::Permissions::from_mode(0o600))
                .await?;
        }
        file.write_all(session.get_token().as_bytes()).await?;
        file.flush().await?;

        tracing::debug!(path = ?self.file_path, "Saved session token");
        return Ok(());
    }

    pub async fn remove(&self) -> Result<()> {
        if !self.file_path.exists() {
            return Ok(());
        }

        fs::remove_file(&self.file_path).await?;
        tracing::debug!(path = ?self.file_path, "Removed session token");
        return Ok(());
    }
}
