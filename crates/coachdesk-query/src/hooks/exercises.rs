use coachdesk_client::services::exercises::{
    Exercise, ExerciseListParams, ExerciseUpload, ExercisesService,
};
use coachdesk_client::{Envelope, ResourceId};
use serde_json::Value;

use super::{detail_options, missing_id, register_list_and_detail, DETAIL_STALE_TIME};
use crate::client::QueryClient;
use crate::invalidation::{InvalidationTable, MutationSpec};
use crate::key::QueryKey;
use crate::options::{QueryOptions, QueryResult};

pub const DOMAIN: &str = "exercises";

pub fn list_key(params: &ExerciseListParams) -> QueryKey {
    super::list_key(DOMAIN, params)
}

pub fn detail_key(id: &ResourceId) -> QueryKey {
    super::detail_key(DOMAIN, Some(id))
}

pub(crate) fn register(table: &mut InvalidationTable) {
    register_list_and_detail(table, DOMAIN);
}

#[derive(Debug, Clone)]
pub struct ExerciseQueries {
    client: QueryClient,
    service: ExercisesService,
}

impl ExerciseQueries {
    pub fn new(client: QueryClient, service: ExercisesService) -> Self {
        Self { client, service }
    }

    pub async fn list(&self, params: &ExerciseListParams) -> QueryResult<Vec<Exercise>> {
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

    pub async fn detail(&self, id: Option<&ResourceId>) -> QueryResult<Exercise> {
        let service = self.service.clone();
        let key = super::detail_key(DOMAIN, id);
        let options = detail_options(DETAIL_STALE_TIME, id);
        let id = id.cloned();
        self.client
            .query(key, options, move || async move {
                match id {
                    Some(id) => service.get(&id).await,
                    None => missing_id("exercise"),
                }
            })
            .await
    }

    pub async fn create(&self, upload: &ExerciseUpload) -> Envelope<Exercise> {
        let spec = MutationSpec::new(DOMAIN).notify_success("Exercise created");
        self.client
            .mutate(&spec, || self.service.create(upload))
            .await
    }

    pub async fn update(&self, id: &ResourceId, upload: &ExerciseUpload) -> Envelope<Exercise> {
        let spec = MutationSpec::new(DOMAIN)
            .target(id)
            .notify_success("Exercise updated");
        self.client
            .mutate(&spec, || self.service.update(id, upload))
            .await
    }

    pub async fn delete(&self, id: &ResourceId) -> Envelope<Value> {
        let spec = MutationSpec::new(DOMAIN)
            .target(id)
            .notify_success("Exercise deleted");
        self.client.mutate(&spec, || self.service.delete(id)).await
    }
}
