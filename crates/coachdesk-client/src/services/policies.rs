//! Account policies (`account/api/policy`): terms, privacy, refund.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ServiceKind;
use crate::envelope::Envelope;
use crate::gateway::Gateway;
use crate::request::ApiRequest;
use crate::types::ResourceId;

const POLICY_PATH: &str = "account/api/policy";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub id: String,
    pub kind: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Create-or-update payload. A draft with an `id` replaces that policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub kind: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct PoliciesService {
    gateway: Gateway,
}

impl PoliciesService {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> Envelope<Vec<Policy>> {
        self.gateway
            .send(ApiRequest::get(ServiceKind::Account, POLICY_PATH))
            .await
    }

    pub async fn get(&self, id: &ResourceId) -> Envelope<Policy> {
        self.gateway
            .send(ApiRequest::get(
                ServiceKind::Account,
                format!("{}/{}", POLICY_PATH, id.path_segment()),
            ))
            .await
    }

    pub async fn upsert(&self, draft: &PolicyDraft) -> Envelope<Policy> {
        self.gateway
            .send(ApiRequest::post(ServiceKind::Account, POLICY_PATH).json(draft))
            .await
    }

    pub async fn delete(&self, id: &ResourceId) -> Envelope<Value> {
        self.gateway
            .send(ApiRequest::delete(
                ServiceKind::Account,
                format!("{}/{}", POLICY_PATH, id.path_segment()),
            ))
            .await
    }
}
