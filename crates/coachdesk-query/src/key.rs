//! Cache keys.
//!
//! A key is an ordered tuple of parts, `[domain, operation, ...]`, where the
//! trailing parts are either a resource identifier or a parameter
//! fingerprint. Invalidation and removal match keys by prefix.

use std::fmt;

use coachdesk_client::ResourceId;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Ordered tuple identifying one cached value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// Append one literal part.
    pub fn push(mut self, part: impl Into<String>) -> Self {
        self.0.push(part.into());
        self
    }

    /// Append the fingerprint of a parameter set.
    pub fn with_params<P: Serialize>(self, params: &P) -> Self {
        self.push(fingerprint(params))
    }

    pub fn with_id(self, id: &ResourceId) -> Self {
        self.push(id.as_str())
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    pub fn domain(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// True when `prefix` is a leading sub-tuple of this key.
    ///
    /// The empty key is a prefix of every key.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

/// SHA-256 over the canonical (RFC 8785) JSON form of `params`.
///
/// Field order in the source struct does not affect the result.
pub fn fingerprint<P: Serialize>(params: &P) -> String {
    let bytes = match serde_jcs::to_vec(params) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "canonical params failed, falling back to plain JSON");
            serde_json::to_vec(params).unwrap_or_default()
        }
    };
    format!("{:x}", Sha256::digest(&bytes))
}
