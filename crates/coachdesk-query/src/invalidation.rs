//! Mutation invalidation table.
//!
//! Every resource declares which cached keys depend on it. After a
//! successful mutation the registry looks up the resource here and marks
//! every matching key stale, so dependent reads refetch.

use std::collections::HashMap;

use coachdesk_client::ResourceId;

use crate::key::QueryKey;

/// A set of cache keys a mutation can touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPattern {
    /// Every key starting with these parts.
    Prefix(QueryKey),
    /// `[domain, operation, <target id>]`. Skipped when the mutation has no
    /// target.
    Detail {
        domain: &'static str,
        operation: &'static str,
    },
}

impl KeyPattern {
    pub fn prefix<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Prefix(QueryKey::new(parts))
    }

    pub fn detail(domain: &'static str, operation: &'static str) -> Self {
        Self::Detail { domain, operation }
    }

    /// Concrete prefix for a mutation on `target`.
    pub fn resolve(&self, target: Option<&ResourceId>) -> Option<QueryKey> {
        match self {
            Self::Prefix(key) => Some(key.clone()),
            Self::Detail { domain, operation } => {
                target.map(|id| QueryKey::new([*domain, *operation]).with_id(id))
            }
        }
    }
}

/// Resource name to dependent key patterns.
#[derive(Debug, Clone, Default)]
pub struct InvalidationTable {
    edges: HashMap<&'static str, Vec<KeyPattern>>,
}

impl InvalidationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that mutations on `resource` invalidate `pattern`.
    pub fn with_edge(mut self, resource: &'static str, pattern: KeyPattern) -> Self {
        self.add_edge(resource, pattern);
        self
    }

    pub fn add_edge(&mut self, resource: &'static str, pattern: KeyPattern) {
        self.edges.entry(resource).or_default().push(pattern);
    }

    pub fn patterns(&self, resource: &str) -> &[KeyPattern] {
        self.edges.get(resource).map(Vec::as_slice).unwrap_or_default()
    }

    /// Key prefixes to invalidate after a successful mutation.
    pub fn resolve(&self, resource: &str, target: Option<&ResourceId>) -> Vec<QueryKey> {
        self.patterns(resource)
            .iter()
            .filter_map(|p| p.resolve(target))
            .collect()
    }
}

/// Describes one mutation for the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationSpec {
    /// Resource name looked up in the invalidation table.
    pub resource: &'static str,
    /// Identifier of the mutated item, used by detail patterns.
    pub target: Option<ResourceId>,
    /// Raised through the notifier on success.
    pub success_message: Option<String>,
}

impl MutationSpec {
    pub fn new(resource: &'static str) -> Self {
        Self {
            resource,
            target: None,
            success_message: None,
        }
    }

    pub fn target(mut self, id: &ResourceId) -> Self {
        self.target = Some(id.clone());
        self
    }

    pub fn notify_success(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }
}
