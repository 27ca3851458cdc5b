//! Typed access to the Coachdesk backend services.
//!
//! This crate provides:
//!
//! - A transport [`Gateway`] that attaches the bearer token, unwraps the
//!   backends' nested `{data, message}` envelopes and folds every failure into
//!   an [`Envelope`]
//! - One resource service per backend resource ([`services`])
//! - Token storage ([`TokenStore`]) and session hooks ([`SessionHandler`])
//!
//! # Quick Start
//!
//! ```no_run
//! use coachdesk_client::services::users::UserListParams;
//! use coachdesk_client::{Gateway, GatewayConfig, Services};
//!
//! # async fn example() -> Result<(), coachdesk_client::ClientError> {
//! let gateway = Gateway::in_memory(GatewayConfig::from_env())?;
//! let services = Services::new(gateway);
//!
//! let users = services.users.list(&UserListParams::default()).await;
//! if users.success {
//!     println!("{} users", users.data.unwrap_or_default().len());
//! } else {
//!     eprintln!("{}", users.message);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `COACHDESK_API_URL` | Generic API base URL |
//! | `COACHDESK_ACCOUNT_URL` | Account service base URL |
//! | `COACHDESK_FITNESS_URL` | Fitness service base URL |
//! | `COACHDESK_TIMEOUT` | Request timeout in seconds (default: 30) |
//! | `COACHDESK_LOGIN_ROUTE` | Route used after a 401 (default: `/admin/login`) |
//! | `COACHDESK_TOKEN_PATH` | Auth token file (default: `~/.coachdesk/auth_token`) |

pub mod auth;
pub mod config;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod request;
pub mod services;
pub mod types;

// Re-export main types
pub use auth::{
    default_token_path, FileTokenStore, LoggingSessionHandler, MemoryTokenStore, SessionHandler,
    TokenStore,
};
pub use config::{GatewayConfig, ServiceKind};
pub use envelope::{Envelope, DEFAULT_SUCCESS_MESSAGE, GENERIC_FAILURE_MESSAGE};
pub use error::{ClientError, ClientResult};
pub use gateway::{Gateway, COACHDESK_USER_AGENT};
pub use request::{ApiRequest, MultipartBody, Part, PartKind, RequestBody, RequestConfig};
pub use services::Services;
pub use types::{FileUpload, PageParams, ResourceId};
