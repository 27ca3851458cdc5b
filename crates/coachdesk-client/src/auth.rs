//! Auth token storage and session hooks.
//!
//! The token is a single opaque string shared by every request. The gateway
//! reads it before each call and clears it when a backend answers 401; the
//! login flow writes it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{ClientError, ClientResult};

/// Token file name under the default directory.
const TOKEN_FILE_NAME: &str = "auth_token";

/// Storage for the bearer token.
#[async_trait]
pub trait TokenStore: Send + Sync + std::fmt::Debug {
    /// Current token, if any.
    async fn token(&self) -> Option<String>;

    /// Replace the token.
    async fn set_token(&self, token: &str) -> ClientResult<()>;

    /// Remove the token.
    async fn clear(&self) -> ClientResult<()>;
}

/// Receives session-level side effects from the gateway.
pub trait SessionHandler: Send + Sync + std::fmt::Debug {
    /// Called once per 401 response, after the token has been cleared.
    fn on_unauthorized(&self, login_route: &str);
}

/// In-process token store.
#[derive(Debug, Default, Clone)]
pub struct MemoryTokenStore {
    token: Arc<RwLock<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(Some(token.into()))),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    async fn set_token(&self, token: &str) -> ClientResult<()> {
        *self.token.write().await = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> ClientResult<()> {
        *self.token.write().await = None;
        Ok(())
    }
}

/// Token store persisted as a single file.
///
/// The file holds the raw token and nothing else. Reads are served from
/// memory; writes go to disk first.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
    cached: Arc<RwLock<Option<String>>>,
}

impl FileTokenStore {
    /// Open the store at `path`, loading an existing token.
    pub async fn open(path: impl Into<PathBuf>) -> ClientResult<Self> {
        let path = path.into();
        let cached = match tokio::fs::read_to_string(&path).await {
            Ok(text) => {
                let token = text.trim().to_string();
                (!token.is_empty()).then_some(token)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                return Err(ClientError::TokenStore {
                    message: format!("failed to read {}: {}", path.display(), e),
                })
            }
        };
        debug!(path = %path.display(), has_token = cached.is_some(), "opened token store");

        Ok(Self {
            path,
            cached: Arc::new(RwLock::new(cached)),
        })
    }

    /// Open the store at the default location.
    ///
    /// Default: `~/.coachdesk/auth_token`
    pub async fn open_default() -> ClientResult<Self> {
        Self::open(default_token_path()?).await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Default token path: `~/.coachdesk/auth_token`.
pub fn default_token_path() -> ClientResult<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| ClientError::TokenStore {
        message: "could not determine home directory".to_string(),
    })?;
    Ok(home.join(".coachdesk").join(TOKEN_FILE_NAME))
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn token(&self) -> Option<String> {
        self.cached.read().await.clone()
    }

    async fn set_token(&self, token: &str) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ClientError::TokenStore {
                    message: format!("failed to create {}: {}", parent.display(), e),
                })?;
        }
        tokio::fs::write(&self.path, token)
            .await
            .map_err(|e| ClientError::TokenStore {
                message: format!("failed to write {}: {}", self.path.display(), e),
            })?;

        // Bearer token is a secret: owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            tokio::fs::set_permissions(&self.path, perms)
                .await
                .map_err(|e| ClientError::TokenStore {
                    message: format!("failed to set permissions on {}: {}", self.path.display(), e),
                })?;
        }

        *self.cached.write().await = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> ClientResult<()> {
        *self.cached.write().await = None;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::TokenStore {
                message: format!("failed to remove {}: {}", self.path.display(), e),
            }),
        }
    }
}

/// Session handler that only logs the redirect.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingSessionHandler;

impl SessionHandler for LoggingSessionHandler {
    fn on_unauthorized(&self, login_route: &str) {
        info!(route = login_route, "session expired, redirecting to login");
    }
}
