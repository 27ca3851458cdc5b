//! Workout plans on the fitness service.
//!
//! Plan generation itself runs in the backend; `generate` only submits the
//! request and returns the drafted plan.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ServiceKind;
use crate::envelope::Envelope;
use crate::gateway::Gateway;
use crate::request::ApiRequest;
use crate::types::ResourceId;

const PLANS_PATH: &str = "fitness/api/plans";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub weeks: u32,
    /// `draft`, `in_review`, `published` or `archived`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub sessions: Vec<PlanSession>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSession {
    pub day: u32,
    #[serde(default)]
    pub exercise_ids: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub user_id: String,
    pub goal: String,
    pub weeks: u32,
    pub days_per_week: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sessions: Option<Vec<PlanSession>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct PlansService {
    gateway: Gateway,
}

impl PlansService {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, params: &PlanListParams) -> Envelope<Vec<Plan>> {
        self.gateway
            .send(ApiRequest::get(ServiceKind::Fitness, PLANS_PATH).query_struct(params))
            .await
    }

    pub async fn get(&self, id: &ResourceId) -> Envelope<Plan> {
        self.gateway
            .send(ApiRequest::get(ServiceKind::Fitness, plan_path(id)))
            .await
    }

    pub async fn generate(&self, request: &PlanRequest) -> Envelope<Plan> {
        self.gateway
            .send(
                ApiRequest::post(ServiceKind::Fitness, format!("{}/generate", PLANS_PATH))
                    .json(request),
            )
            .await
    }

    pub async fn update(&self, id: &ResourceId, update: &PlanUpdate) -> Envelope<Plan> {
        self.gateway
            .send(ApiRequest::put(ServiceKind::Fitness, plan_path(id)).json(update))
            .await
    }

    pub async fn delete(&self, id: &ResourceId) -> Envelope<Value> {
        self.gateway
            .send(ApiRequest::delete(ServiceKind::Fitness, plan_path(id)))
            .await
    }
}

fn plan_path(id: &ResourceId) -> String {
    format!("{}/{}", PLANS_PATH, id.path_segment())
}
