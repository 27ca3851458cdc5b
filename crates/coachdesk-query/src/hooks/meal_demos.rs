use coachdesk_client::services::meal_demos::{MealDemo, MealDemoUpload, MealDemosService};
use coachdesk_client::{Envelope, PageParams, ResourceId};
use serde_json::Value;

use super::{detail_options, missing_id, register_list_and_detail, DETAIL_STALE_TIME};
use crate::client::QueryClient;
use crate::invalidation::{InvalidationTable, MutationSpec};
use crate::key::QueryKey;
use crate::options::{QueryOptions, QueryResult};

pub const DOMAIN: &str = "meal_demos";

pub fn list_key(page: &PageParams) -> QueryKey {
    super::list_key(DOMAIN, page)
}

pub fn detail_key(id: &ResourceId) -> QueryKey {
    super::detail_key(DOMAIN, Some(id))
}

pub(crate) fn register(table: &mut InvalidationTable) {
    register_list_and_detail(table, DOMAIN);
}

#[derive(Debug, Clone)]
pub struct MealDemoQueries {
    client: QueryClient,
    service: MealDemosService,
}

impl MealDemoQueries {
    pub fn new(client: QueryClient, service: MealDemosService) -> Self {
        Self { client, service }
    }

    pub async fn list(&self, page: &PageParams) -> QueryResult<Vec<MealDemo>> {
        let service = self.service.clone();
        let page = page.clone();
        self.client
            .query(
                list_key(&page),
                QueryOptions::stale_for(super::LIST_STALE_TIME),
                move || async move { service.list(&page).await },
            )
            .await
    }

    pub async fn detail(&self, id: Option<&ResourceId>) -> QueryResult<MealDemo> {
        let service = self.service.clone();
        let key = super::detail_key(DOMAIN, id);
        let options = detail_options(DETAIL_STALE_TIME, id);
        let id = id.cloned();
        self.client
            .query(key, options, move || async move {
                match id {
                    Some(id) => service.get(&id).await,
                    None => missing_id("meal demo"),
                }
            })
            .await
    }

    pub async fn create(&self, upload: &MealDemoUpload) -> Envelope<MealDemo> {
        let spec = MutationSpec::new(DOMAIN).notify_success("Meal demo created");
        self.client
            .mutate(&spec, || self.service.create(upload))
            .await
    }

    pub async fn delete(&self, id: &ResourceId) -> Envelope<Value> {
        let spec = MutationSpec::new(DOMAIN)
            .target(id)
            .notify_success("Meal demo deleted");
        self.client.mutate(&spec, || self.service.delete(id)).await
    }
}
