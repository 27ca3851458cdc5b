//! Users on the generic API (`/users`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ServiceKind;
use crate::envelope::Envelope;
use crate::gateway::Gateway;
use crate::request::ApiRequest;
use crate::types::ResourceId;

const USERS_PATH: &str = "/users";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    /// `admin`, `advisor` or `member`.
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub full_name: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// User operations.
#[derive(Debug, Clone)]
pub struct UsersService {
    gateway: Gateway,
}

impl UsersService {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, params: &UserListParams) -> Envelope<Vec<User>> {
        self.gateway
            .send(ApiRequest::get(ServiceKind::Api, USERS_PATH).query_struct(params))
            .await
    }

    pub async fn get(&self, id: &ResourceId) -> Envelope<User> {
        self.gateway
            .send(ApiRequest::get(ServiceKind::Api, user_path(id)))
            .await
    }

    pub async fn create(&self, user: &NewUser) -> Envelope<User> {
        self.gateway
            .send(ApiRequest::post(ServiceKind::Api, USERS_PATH).json(user))
            .await
    }

    pub async fn update(&self, id: &ResourceId, update: &UserUpdate) -> Envelope<User> {
        self.gateway
            .send(ApiRequest::put(ServiceKind::Api, user_path(id)).json(update))
            .await
    }

    pub async fn delete(&self, id: &ResourceId) -> Envelope<Value> {
        self.gateway
            .send(ApiRequest::delete(ServiceKind::Api, user_path(id)))
            .await
    }
}

fn user_path(id: &ResourceId) -> String {
    format!("{}/{}", USERS_PATH, id.path_segment())
}
