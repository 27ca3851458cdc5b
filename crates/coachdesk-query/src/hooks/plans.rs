//! Training plan queries and mutations.
//!
//! Generating or changing a plan also refreshes the review queue, since new
//! plans enter it as pending reviews.

use coachdesk_client::services::plans::{
    Plan, PlanListParams, PlanRequest, PlanUpdate, PlansService,
};
use coachdesk_client::{Envelope, ResourceId};
use serde_json::Value;

use super::{detail_options, missing_id, register_list_and_detail, DETAIL_STALE_TIME, LIST};
use crate::client::QueryClient;
use crate::invalidation::{InvalidationTable, KeyPattern, MutationSpec};
use crate::key::QueryKey;
use crate::options::{QueryOptions, QueryResult};

pub const DOMAIN: &str = "plans";

pub fn list_key(params: &PlanListParams) -> QueryKey {
    super::list_key(DOMAIN, params)
}

pub fn detail_key(id: &ResourceId) -> QueryKey {
    super::detail_key(DOMAIN, Some(id))
}

pub(crate) fn register(table: &mut InvalidationTable) {
    register_list_and_detail(table, DOMAIN);
    table.add_edge(DOMAIN, KeyPattern::prefix([super::reviews::DOMAIN, LIST]));
}

#[derive(Debug, Clone)]
pub struct PlanQueries {
    client: QueryClient,
    service: PlansService,
}

impl PlanQueries {
    pub fn new(client: QueryClient, service: PlansService) -> Self {
        Self { client, service }
    }

    pub async fn list(&self, params: &PlanListParams) -> QueryResult<Vec<Plan>> {
        let service = self.service.clone();
        let params = params.clone();
        self.client
            .query(
                list_key(&params),
                QueryOptions::stale_for(super::LIST_STALE_TIME),
                move || async move { service.list(&params).await },
            )
            .await
    }

    pub async fn detail(&self, id: Option<&ResourceId>) -> QueryResult<Plan> {
        let service = self.service.clone();
        let key = super::detail_key(DOMAIN, id);
        let options = detail_options(DETAIL_STALE_TIME, id);
        let id = id.cloned();
        self.client
            .query(key, options, move || async move {
                match id {
                    Some(id) => service.get(&id).await,
                    None => missing_id("plan"),
                }
            })
            .await
    }

    pub async fn generate(&self, request: &PlanRequest) -> Envelope<Plan> {
        let spec = MutationSpec::new(DOMAIN).notify_success("Plan generated");
        self.client
            .mutate(&spec, || self.service.generate(request))
            .await
    }

    pub async fn update(&self, id: &ResourceId, update: &PlanUpdate) -> Envelope<Plan> {
        let spec = MutationSpec::new(DOMAIN)
            .target(id)
            .notify_success("Plan updated");
        self.client
            .mutate(&spec, || self.service.update(id, update))
            .await
    }

    pub async fn delete(&self, id: &ResourceId) -> Envelope<Value> {
        let spec = MutationSpec::new(DOMAIN)
            .target(id)
            .notify_success("Plan deleted");
        self.client.mutate(&spec, || self.service.delete(id)).await
    }
}
