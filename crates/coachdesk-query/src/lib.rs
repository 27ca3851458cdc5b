//! Query cache and mutation invalidation over the Coachdesk services.
//!
//! A [`QueryClient`] owns every cached result. Reads are keyed by
//! `[domain, operation, fingerprint]`, served from cache inside their
//! staleness window and deduplicated while in flight. Mutations always hit
//! the network and, on success, invalidate the keys that the
//! [`InvalidationTable`] lists for their resource.
//!
//! # Quick Start
//!
//! ```no_run
//! use coachdesk_client::services::users::UserListParams;
//! use coachdesk_client::{Gateway, GatewayConfig, Services};
//! use coachdesk_query::hooks::Hooks;
//!
//! # async fn example() -> Result<(), coachdesk_client::ClientError> {
//! let services = Services::new(Gateway::in_memory(GatewayConfig::from_env())?);
//! let hooks = Hooks::new(services);
//!
//! // Second call inside 30s is served from cache.
//! let first = hooks.users.list(&UserListParams::default()).await;
//! let again = hooks.users.list(&UserListParams::default()).await;
//! assert!(!first.is_success() || again.from_cache);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod hooks;
pub mod invalidation;
pub mod key;
pub mod notify;
pub mod options;

pub use client::QueryClient;
pub use invalidation::{InvalidationTable, KeyPattern, MutationSpec};
pub use key::{fingerprint, QueryKey};
pub use notify::{Notifier, TracingNotifier};
pub use options::{QueryOptions, QueryResult, QueryStatus, DEFAULT_STALE_TIME};
