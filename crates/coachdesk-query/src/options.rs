//! Per-query options and the result handed back to callers.

use std::time::Duration;

/// How long a cached value is served without a refetch when no option says
/// otherwise.
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Window after a successful fetch during which the cached value is
    /// served without a network call.
    pub stale_time: Duration,
    /// When false the query is skipped entirely.
    pub enabled: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time: DEFAULT_STALE_TIME,
            enabled: true,
        }
    }
}

impl QueryOptions {
    pub fn stale_for(stale_time: Duration) -> Self {
        Self {
            stale_time,
            ..Self::default()
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// The enablement predicate was false; nothing was fetched.
    Disabled,
    Success,
    Error,
}

/// Outcome of one query call.
///
/// On `Error`, `data` still carries the last successful value for the key
/// when there is one.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<T> {
    pub status: QueryStatus,
    pub data: Option<T>,
    pub error: Option<String>,
    /// True when served from cache without a network call.
    pub from_cache: bool,
}

impl<T> QueryResult<T> {
    pub fn disabled() -> Self {
        Self {
            status: QueryStatus::Disabled,
            data: None,
            error: None,
            from_cache: false,
        }
    }

    pub(crate) fn fetched(data: T) -> Self {
        Self {
            status: QueryStatus::Success,
            data: Some(data),
            error: None,
            from_cache: false,
        }
    }

    pub(crate) fn cached(data: T) -> Self {
        Self {
            status: QueryStatus::Success,
            data: Some(data),
            error: None,
            from_cache: true,
        }
    }

    pub(crate) fn failed(message: impl Into<String>, previous: Option<T>) -> Self {
        Self {
            status: QueryStatus::Error,
            data: previous,
            error: Some(message.into()),
            from_cache: false,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_disabled(&self) -> bool {
        self.status == QueryStatus::Disabled
    }
}
