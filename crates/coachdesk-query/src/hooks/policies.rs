//! Account policies (terms, privacy) change rarely, so both the list and
//! the detail views use [`POLICY_STALE_TIME`].

use coachdesk_client::services::policies::{PoliciesService, Policy, PolicyDraft};
use coachdesk_client::{Envelope, ResourceId};
use serde_json::Value;

use super::{detail_options, missing_id, register_list_and_detail, LIST, POLICY_STALE_TIME};
use crate::client::QueryClient;
use crate::invalidation::{InvalidationTable, MutationSpec};
use crate::key::QueryKey;
use crate::options::{QueryOptions, QueryResult};

pub const DOMAIN: &str = "policies";

pub fn list_key() -> QueryKey {
    QueryKey::new([DOMAIN, LIST])
}

pub fn detail_key(id: &ResourceId) -> QueryKey {
    super::detail_key(DOMAIN, Some(id))
}

pub(crate) fn register(table: &mut InvalidationTable) {
    register_list_and_detail(table, DOMAIN);
}

#[derive(Debug, Clone)]
pub struct PolicyQueries {
    client: QueryClient,
    service: PoliciesService,
}

impl PolicyQueries {
    pub fn new(client: QueryClient, service: PoliciesService) -> Self {
        Self { client, service }
    }

    pub async fn list(&self) -> QueryResult<Vec<Policy>> {
        let service = self.service.clone();
        self.client
            .query(
                list_key(),
                QueryOptions::stale_for(POLICY_STALE_TIME),
                move || async move { service.list().await },
            )
            .await
    }

    pub async fn detail(&self, id: Option<&ResourceId>) -> QueryResult<Policy> {
        let service = self.service.clone();
        let key = super::detail_key(DOMAIN, id);
        let options = detail_options(POLICY_STALE_TIME, id);
        let id = id.cloned();
        self.client
            .query(key, options, move || async move {
                match id {
                    Some(id) => service.get(&id).await,
                    None => missing_id("policy"),
                }
            })
            .await
    }

    /// Create or replace. A draft carrying an id also refreshes that
    /// policy's detail view.
    pub async fn upsert(&self, draft: &PolicyDraft) -> Envelope<Policy> {
        let mut spec = MutationSpec::new(DOMAIN).notify_success("Policy saved");
        if let Some(id) = draft
            .id
            .as_deref()
            .and_then(|raw| ResourceId::new("policy", raw).ok())
        {
            spec = spec.target(&id);
        }
        self.client
            .mutate(&spec, || self.service.upsert(draft))
            .await
    }

    pub async fn delete(&self, id: &ResourceId) -> Envelope<Value> {
        let spec = MutationSpec::new(DOMAIN)
            .target(id)
            .notify_success("Policy deleted");
        self.client.mutate(&spec, || self.service.delete(id)).await
    }
}
