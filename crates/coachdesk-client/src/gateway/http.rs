//! HTTP layer: auth header, status mapping, 401 handling.
//!
//! This is the ONLY place that looks at status codes. gateway/mod.rs only
//! sees an [`Outcome`].

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::auth::{SessionHandler, TokenStore};
use crate::config::GatewayConfig;
use crate::request::{ApiRequest, RequestBody};

use super::helpers::{join_url, parse_body, server_message};

/// Result of one HTTP exchange, before payload decoding.
#[derive(Debug)]
pub(crate) enum Outcome {
    /// 2xx with the parsed body.
    Success(Value),
    /// Any failure, with its human-readable message.
    Failure {
        status: Option<StatusCode>,
        message: String,
    },
}

impl Outcome {
    fn client_failure(message: impl Into<String>) -> Self {
        Self::Failure {
            status: None,
            message: message.into(),
        }
    }
}

/// HTTP backend (holds reqwest client, token store, session hooks, config).
#[derive(Debug, Clone)]
pub(crate) struct HttpBackend {
    pub(crate) client: reqwest::Client,
    pub(crate) config: GatewayConfig,
    pub(crate) tokens: Arc<dyn TokenStore>,
    pub(crate) session: Arc<dyn SessionHandler>,
}

impl HttpBackend {
    /// Perform a single request. Never retries.
    pub(crate) async fn execute(&self, request: ApiRequest) -> Outcome {
        let raw_url = join_url(self.config.base_url(request.service), &request.path);
        let url = match url::Url::parse(&raw_url) {
            Ok(url) => url,
            Err(e) => return Outcome::client_failure(format!("invalid url '{}': {}", raw_url, e)),
        };

        let multipart = request.body.is_multipart();
        let body = match request.body {
            RequestBody::Invalid(message) => return Outcome::client_failure(message),
            other => other,
        };

        let mut builder = self.client.request(request.method.clone(), url.clone());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(token) = self.tokens.token().await {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        // Multipart requests must not carry an explicit content type: the
        // client writes its own with the boundary.
        let has_content_type = request
            .headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()));
        if !multipart && !has_content_type {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }

        for (name, value) in &request.headers {
            if multipart && name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()) {
                debug!(value = %value, "dropping content-type override on multipart request");
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match body {
            RequestBody::Empty | RequestBody::Invalid(_) => builder,
            RequestBody::Json(value) => builder.body(value.to_string()),
            RequestBody::Multipart(form) => match form.into_form() {
                Ok(form) => builder.multipart(form),
                Err(message) => return Outcome::client_failure(message),
            },
        };

        debug!(method = %request.method, url = %url, "sending request");

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(method = %request.method, url = %url, error = %e, "request failed");
                return Outcome::client_failure(e.to_string());
            }
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                return Outcome::Failure {
                    status: Some(status),
                    message: format!("failed to read response body: {}", e),
                }
            }
        };
        let body = parse_body(&text);

        if status.is_success() {
            debug!(status = status.as_u16(), url = %url, "request succeeded");
            return Outcome::Success(body);
        }

        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized().await;
        }

        let message = server_message(&body)
            .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
        warn!(
            method = %request.method,
            url = %url,
            status = status.as_u16(),
            message = %message,
            "request rejected"
        );

        Outcome::Failure {
            status: Some(status),
            message,
        }
    }

    /// Clear the stored token and send the session to the login route.
    async fn handle_unauthorized(&self) {
        if let Err(e) = self.tokens.clear().await {
            warn!(error = %e, "failed to clear auth token");
        }
        info!(route = %self.config.login_route, "auth token cleared after 401");
        self.session.on_unauthorized(&self.config.login_route);
    }
}
