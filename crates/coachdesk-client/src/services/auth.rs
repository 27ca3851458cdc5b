//! Login and logout against the account service.
//!
//! These are the only calls besides the 401 path that touch the token store.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::ServiceKind;
use crate::envelope::Envelope;
use crate::gateway::Gateway;
use crate::request::ApiRequest;
use crate::services::users::User;

const AUTH_PATH: &str = "account/api/auth";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone)]
pub struct AuthService {
    gateway: Gateway,
}

impl AuthService {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Log in and persist the returned token.
    pub async fn login(&self, credentials: &Credentials) -> Envelope<Session> {
        let envelope: Envelope<Session> = self
            .gateway
            .send(
                ApiRequest::post(ServiceKind::Account, format!("{}/login", AUTH_PATH))
                    .json(credentials),
            )
            .await;

        if let Some(session) = envelope.data() {
            if let Err(e) = self.gateway.token_store().set_token(&session.token).await {
                warn!(error = %e, "login succeeded but token could not be stored");
                return Envelope::failure(format!("failed to store auth token: {}", e));
            }
            info!(email = %credentials.email, "logged in");
        }
        envelope
    }

    /// Tell the backend, then drop the local token whatever it answered.
    pub async fn logout(&self) -> Envelope<Value> {
        let envelope = self
            .gateway
            .send(ApiRequest::post(
                ServiceKind::Account,
                format!("{}/logout", AUTH_PATH),
            ))
            .await;

        if let Err(e) = self.gateway.token_store().clear().await {
            warn!(error = %e, "failed to clear auth token on logout");
        }
        envelope
    }
}
