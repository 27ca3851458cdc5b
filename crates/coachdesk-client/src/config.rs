//! Gateway configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Backend sub-service a resource path is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    /// Generic API (users).
    Api,
    /// Account service (auth, policies).
    Account,
    /// Fitness service (plans, exercises, meal demos, reviews).
    Fitness,
}

/// Gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the generic API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Base URL of the account service.
    #[serde(default = "default_account_url")]
    pub account_url: String,

    /// Base URL of the fitness service.
    #[serde(default = "default_fitness_url")]
    pub fitness_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Route the session is sent to after a 401.
    #[serde(default = "default_login_route")]
    pub login_route: String,

    /// Where the auth token is persisted. `None` means the default location.
    #[serde(default)]
    pub token_path: Option<PathBuf>,
}

fn default_api_url() -> String {
    "https://api.coachdesk.app".to_string()
}

fn default_account_url() -> String {
    "https://account.coachdesk.app".to_string()
}

fn default_fitness_url() -> String {
    "https://fitness.coachdesk.app".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_login_route() -> String {
    "/admin/login".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            account_url: default_account_url(),
            fitness_url: default_fitness_url(),
            timeout_secs: default_timeout(),
            login_route: default_login_route(),
            token_path: None,
        }
    }
}

impl GatewayConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `COACHDESK_API_URL` | Generic API base URL |
    /// | `COACHDESK_ACCOUNT_URL` | Account service base URL |
    /// | `COACHDESK_FITNESS_URL` | Fitness service base URL |
    /// | `COACHDESK_TIMEOUT` | Request timeout in seconds (default: 30) |
    /// | `COACHDESK_LOGIN_ROUTE` | Route used after a 401 (default: `/admin/login`) |
    /// | `COACHDESK_TOKEN_PATH` | Auth token file |
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("COACHDESK_API_URL").unwrap_or_else(|_| default_api_url()),
            account_url: std::env::var("COACHDESK_ACCOUNT_URL")
                .unwrap_or_else(|_| default_account_url()),
            fitness_url: std::env::var("COACHDESK_FITNESS_URL")
                .unwrap_or_else(|_| default_fitness_url()),
            timeout_secs: std::env::var("COACHDESK_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_timeout),
            login_route: std::env::var("COACHDESK_LOGIN_ROUTE")
                .unwrap_or_else(|_| default_login_route()),
            token_path: std::env::var("COACHDESK_TOKEN_PATH")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Load config from a YAML file. Missing fields take their defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ClientError::Config {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> ClientResult<Self> {
        serde_yaml::from_str(text).map_err(|e| ClientError::Config {
            message: format!("invalid gateway config: {}", e),
        })
    }

    /// Base URL for a service, without trailing slash.
    pub fn base_url(&self, service: ServiceKind) -> &str {
        let url = match service {
            ServiceKind::Api => &self.api_url,
            ServiceKind::Account => &self.account_url,
            ServiceKind::Fitness => &self.fitness_url,
        };
        url.trim_end_matches('/')
    }

    /// Point every service at the same base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.api_url = url.clone();
        self.account_url = url.clone();
        self.fitness_url = url;
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_account_url(mut self, url: impl Into<String>) -> Self {
        self.account_url = url.into();
        self
    }

    pub fn with_fitness_url(mut self, url: impl Into<String>) -> Self {
        self.fitness_url = url.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_login_route(mut self, route: impl Into<String>) -> Self {
        self.login_route = route.into();
        self
    }

    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = Some(path.into());
        self
    }

    /// Check that every base URL parses as an absolute http(s) URL.
    pub fn validate(&self) -> ClientResult<()> {
        for (name, raw) in [
            ("api_url", &self.api_url),
            ("account_url", &self.account_url),
            ("fitness_url", &self.fitness_url),
        ] {
            let parsed = url::Url::parse(raw).map_err(|e| ClientError::Config {
                message: format!("{} '{}' is not a valid URL: {}", name, raw, e),
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ClientError::Config {
                    message: format!("{} must use http or https, got '{}'", name, parsed.scheme()),
                });
            }
        }
        if self.timeout_secs == 0 {
            return Err(ClientError::Config {
                message: "timeout_secs must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_from_env_defaults() {
        for var in [
            "COACHDESK_API_URL",
            "COACHDESK_ACCOUNT_URL",
            "COACHDESK_FITNESS_URL",
            "COACHDESK_TIMEOUT",
            "COACHDESK_LOGIN_ROUTE",
            "COACHDESK_TOKEN_PATH",
        ] {
            std::env::remove_var(var);
        }

        let config = GatewayConfig::from_env();
        assert_eq!(config.api_url, "https://api.coachdesk.app");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.login_route, "/admin/login");
        assert!(config.token_path.is_none());
    }

    #[test]
    #[serial]
    fn test_config_from_env_overrides() {
        std::env::set_var("COACHDESK_FITNESS_URL", "http://localhost:9000/");
        std::env::set_var("COACHDESK_TIMEOUT", "5");
        let config = GatewayConfig::from_env();
        std::env::remove_var("COACHDESK_FITNESS_URL");
        std::env::remove_var("COACHDESK_TIMEOUT");

        assert_eq!(config.base_url(ServiceKind::Fitness), "http://localhost:9000");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_config_yaml_partial() {
        let config = GatewayConfig::from_yaml_str(
            "account_url: https://acct.example.test\nlogin_route: /advisor/login\n",
        )
        .unwrap();
        assert_eq!(config.account_url, "https://acct.example.test");
        assert_eq!(config.login_route, "/advisor/login");
        assert_eq!(config.api_url, "https://api.coachdesk.app");
    }

    #[test]
    fn test_config_validate_rejects_bad_scheme() {
        let config = GatewayConfig::default().with_api_url("ftp://files.example.test");
        assert!(matches!(
            config.validate(),
            Err(ClientError::Config { .. })
        ));
        assert!(GatewayConfig::default().validate().is_ok());
    }
}
