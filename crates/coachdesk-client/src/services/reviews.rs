//! Advisor review queue for generated plans.

use serde::{Deserialize, Serialize};

use crate::config::ServiceKind;
use crate::envelope::Envelope;
use crate::gateway::Gateway;
use crate::request::ApiRequest;
use crate::types::ResourceId;

const REVIEWS_PATH: &str = "fitness/api/reviews";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub plan_id: String,
    #[serde(default)]
    pub advisor_id: Option<String>,
    /// `pending`, `approved` or `rejected`.
    pub status: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDecision {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisor_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct ReviewsService {
    gateway: Gateway,
}

impl ReviewsService {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, params: &ReviewListParams) -> Envelope<Vec<Review>> {
        self.gateway
            .send(ApiRequest::get(ServiceKind::Fitness, REVIEWS_PATH).query_struct(params))
            .await
    }

    pub async fn get(&self, id: &ResourceId) -> Envelope<Review> {
        self.gateway
            .send(ApiRequest::get(
                ServiceKind::Fitness,
                format!("{}/{}", REVIEWS_PATH, id.path_segment()),
            ))
            .await
    }

    pub async fn approve(&self, id: &ResourceId, decision: &ReviewDecision) -> Envelope<Review> {
        self.decide(id, "approve", decision).await
    }

    pub async fn reject(&self, id: &ResourceId, decision: &ReviewDecision) -> Envelope<Review> {
        self.decide(id, "reject", decision).await
    }

    async fn decide(
        &self,
        id: &ResourceId,
        action: &str,
        decision: &ReviewDecision,
    ) -> Envelope<Review> {
        self.gateway
            .send(
                ApiRequest::put(
                    ServiceKind::Fitness,
                    format!("{}/{}/{}", REVIEWS_PATH, id.path_segment(), action),
                )
                .json(decision),
            )
            .await
    }
}
