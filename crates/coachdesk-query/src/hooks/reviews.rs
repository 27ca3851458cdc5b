//! Review queue queries and decisions.
//!
//! A decision changes the reviewed plan's status, so it refreshes every plan
//! key along with the queue.

use coachdesk_client::services::reviews::{Review, ReviewDecision, ReviewListParams, ReviewsService};
use coachdesk_client::{Envelope, ResourceId};

use super::{detail_options, missing_id, register_list_and_detail, DETAIL_STALE_TIME};
use crate::client::QueryClient;
use crate::invalidation::{InvalidationTable, KeyPattern, MutationSpec};
use crate::key::QueryKey;
use crate::options::{QueryOptions, QueryResult};

pub const DOMAIN: &str = "reviews";

pub fn list_key(params: &ReviewListParams) -> QueryKey {
    super::list_key(DOMAIN, params)
}

pub fn detail_key(id: &ResourceId) -> QueryKey {
    super::detail_key(DOMAIN, Some(id))
}

pub(crate) fn register(table: &mut InvalidationTable) {
    register_list_and_detail(table, DOMAIN);
    table.add_edge(DOMAIN, KeyPattern::prefix([super::plans::DOMAIN]));
}

#[derive(Debug, Clone)]
pub struct ReviewQueries {
    client: QueryClient,
    service: ReviewsService,
}

impl ReviewQueries {
    pub fn new(client: QueryClient, service: ReviewsService) -> Self {
        Self { client, service }
    }

    pub async fn list(&self, params: &ReviewListParams) -> QueryResult<Vec<Review>> {
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

    pub async fn detail(&self, id: Option<&ResourceId>) -> QueryResult<Review> {
        let service = self.service.clone();
        let key = super::detail_key(DOMAIN, id);
        let options = detail_options(DETAIL_STALE_TIME, id);
        let id = id.cloned();
        self.client
            .query(key, options, move || async move {
                match id {
                    Some(id) => service.get(&id).await,
                    None => missing_id("review"),
                }
            })
            .await
    }

    pub async fn approve(&self, id: &ResourceId, decision: &ReviewDecision) -> Envelope<Review> {
        let spec = MutationSpec::new(DOMAIN)
            .target(id)
            .notify_success("Review approved");
        self.client
            .mutate(&spec, || self.service.approve(id, decision))
            .await
    }

    pub async fn reject(&self, id: &ResourceId, decision: &ReviewDecision) -> Envelope<Review> {
        let spec = MutationSpec::new(DOMAIN)
            .target(id)
            .notify_success("Review rejected");
        self.client
            .mutate(&spec, || self.service.reject(id, decision))
            .await
    }
}
