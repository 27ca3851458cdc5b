//! Transport gateway: the single choke point for outbound HTTP.
//!
//! Public API: no status code knowledge. All HTTP/status mapping in http.rs.
//! Every call resolves to an [`Envelope`]; nothing here returns `Err` for an
//! HTTP or network failure.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::{LoggingSessionHandler, MemoryTokenStore, SessionHandler, TokenStore};
use crate::config::{GatewayConfig, ServiceKind};
use crate::envelope::{Envelope, DEFAULT_SUCCESS_MESSAGE};
use crate::error::{ClientError, ClientResult};
use crate::request::{ApiRequest, RequestBody, RequestConfig};

mod helpers;
mod http;

use helpers::unwrap_payload;
use http::{HttpBackend, Outcome};

/// User agent for backend requests.
pub const COACHDESK_USER_AGENT: &str = concat!("coachdesk/", env!("CARGO_PKG_VERSION"));

/// HTTP gateway shared by every resource service.
///
/// Cloning is cheap; clones share the connection pool, token store and
/// session handler.
#[derive(Debug, Clone)]
pub struct Gateway {
    http: HttpBackend,
}

impl Gateway {
    pub fn new(
        config: GatewayConfig,
        tokens: Arc<dyn TokenStore>,
        session: Arc<dyn SessionHandler>,
    ) -> ClientResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(COACHDESK_USER_AGENT));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|e| ClientError::Http {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http: HttpBackend {
                client,
                config,
                tokens,
                session,
            },
        })
    }

    /// Gateway with an in-memory token store and a logging session handler.
    pub fn in_memory(config: GatewayConfig) -> ClientResult<Self> {
        Self::new(
            config,
            Arc::new(MemoryTokenStore::new()),
            Arc::new(LoggingSessionHandler),
        )
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.http.config
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.http.tokens
    }

    /// Send a request and decode the unwrapped payload as `T`.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Envelope<T> {
        match self.http.execute(request).await {
            Outcome::Success(body) => decode(body),
            Outcome::Failure { status, message } => {
                debug!(status = ?status.map(|s| s.as_u16()), "call resolved to failed envelope");
                Envelope::failure(message)
            }
        }
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        service: ServiceKind,
        path: &str,
        config: Option<RequestConfig>,
    ) -> Envelope<T> {
        self.send(with_config(ApiRequest::get(service, path), config))
            .await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        service: ServiceKind,
        path: &str,
        body: RequestBody,
        config: Option<RequestConfig>,
    ) -> Envelope<T> {
        self.send(with_config(ApiRequest::post(service, path).body(body), config))
            .await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        service: ServiceKind,
        path: &str,
        body: RequestBody,
        config: Option<RequestConfig>,
    ) -> Envelope<T> {
        self.send(with_config(ApiRequest::put(service, path).body(body), config))
            .await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        service: ServiceKind,
        path: &str,
        config: Option<RequestConfig>,
    ) -> Envelope<T> {
        self.send(with_config(ApiRequest::delete(service, path), config))
            .await
    }
}

fn with_config(request: ApiRequest, config: Option<RequestConfig>) -> ApiRequest {
    match config {
        Some(config) => request.with_config(config),
        None => request,
    }
}

fn decode<T: DeserializeOwned>(body: serde_json::Value) -> Envelope<T> {
    let (data, message) = unwrap_payload(body);
    match serde_json::from_value::<T>(data) {
        Ok(data) => Envelope::ok(
            data,
            message.unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string()),
        ),
        Err(e) => {
            debug!(error = %e, "response payload did not match expected shape");
            Envelope::failure(format!("invalid response payload: {}", e))
        }
    }
}
