//! Integration tests for the gateway and resource services.
//!
//! Uses wiremock for HTTP mocking. Tests cover envelope unwrapping, failure
//! messages, bearer auth, 401 session handling and multipart uploads.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use coachdesk_client::services::auth::Credentials;
use coachdesk_client::services::exercises::{ExerciseStep, ExerciseUpload};
use coachdesk_client::services::users::{NewUser, UserListParams};
use coachdesk_client::{
    ClientError, ClientResult, Envelope, FileUpload, Gateway, GatewayConfig, MemoryTokenStore,
    PageParams, RequestBody, RequestConfig, ResourceId, ServiceKind, Services, SessionHandler,
    TokenStore, COACHDESK_USER_AGENT,
};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Default)]
struct RecordingSession {
    calls: AtomicUsize,
    routes: Mutex<Vec<String>>,
}

impl SessionHandler for RecordingSession {
    fn on_unauthorized(&self, login_route: &str) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.routes.lock().unwrap().push(login_route.to_string());
    }
}

struct Harness {
    gateway: Gateway,
    services: Services,
    tokens: Arc<MemoryTokenStore>,
    session: Arc<RecordingSession>,
}

fn create_harness(mock_server: &MockServer, token: Option<&str>) -> Harness {
    let tokens = Arc::new(match token {
        Some(t) => MemoryTokenStore::with_token(t),
        None => MemoryTokenStore::new(),
    });
    let session = Arc::new(RecordingSession::default());
    let config = GatewayConfig::default().with_base_url(mock_server.uri());
    let gateway = Gateway::new(config, tokens.clone(), session.clone()).expect("gateway");
    Harness {
        services: Services::new(gateway.clone()),
        gateway,
        tokens,
        session,
    }
}

#[tokio::test]
async fn test_list_users_double_unwrap() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("pageSize", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"data": [
                {"id": "u1", "email": "ana@example.test", "active": true},
                {"id": "u2", "email": "bo@example.test", "active": false}
            ]},
            "message": "OK"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let h = create_harness(&mock_server, Some("test-token"));
    let envelope = h
        .services
        .users
        .list(&UserListParams {
            page_size: Some(20),
            ..Default::default()
        })
        .await;

    assert!(envelope.success);
    assert_eq!(envelope.message, "OK");
    let users = envelope.data.expect("expected users");
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].email, "ana@example.test");
}

#[tokio::test]
async fn test_create_conflict_uses_server_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("content-type", "application/json"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"message": "Email already exists"})),
        )
        .mount(&mock_server)
        .await;

    let h = create_harness(&mock_server, Some("test-token"));
    let envelope = h
        .services
        .users
        .create(&NewUser {
            email: "ana@example.test".to_string(),
            full_name: "Ana".to_string(),
            role: "member".to_string(),
            password: None,
        })
        .await;

    assert!(!envelope.success);
    assert!(envelope.data.is_none());
    assert_eq!(envelope.message, "Email already exists");
    assert_eq!(h.session.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_server_error_without_body_falls_back_to_status_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fitness/api/plans"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let h = create_harness(&mock_server, None);
    let envelope = h.services.plans.list(&Default::default()).await;

    assert!(!envelope.success);
    assert_eq!(envelope.message, "Request failed with status code 503");
}

#[tokio::test]
async fn test_bearer_token_and_user_agent_attached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/account/api/policy"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("user-agent", COACHDESK_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let h = create_harness(&mock_server, Some("test-token"));
    let envelope = h.services.policies.list().await;
    assert!(envelope.success, "{}", envelope.message);
    assert_eq!(envelope.data, Some(vec![]));
}

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fitness/api/mealdemo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&mock_server)
        .await;

    let h = create_harness(&mock_server, None);
    let envelope = h.services.meal_demos.list(&PageParams::default()).await;
    assert!(envelope.success);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_unauthorized_clears_token_and_redirects_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fitness/api/reviews"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Token expired"})))
        .mount(&mock_server)
        .await;

    let h = create_harness(&mock_server, Some("stale-token"));
    let envelope = h.services.reviews.list(&Default::default()).await;

    assert!(!envelope.success);
    assert_eq!(envelope.message, "Token expired");
    assert_eq!(h.tokens.token().await, None);
    assert_eq!(h.session.calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        h.session.routes.lock().unwrap().as_slice(),
        ["/admin/login".to_string()]
    );
}

#[tokio::test]
async fn test_unauthorized_from_any_resource_is_handled() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let h = create_harness(&mock_server, Some("stale-token"));
    let id = ResourceId::new("exercise", "ex-1").unwrap();
    let envelope = h.services.exercises.delete(&id).await;

    assert!(!envelope.success);
    assert_eq!(envelope.message, "Request failed with status code 401");
    assert_eq!(h.tokens.token().await, None);
    assert_eq!(h.session.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_transport_failure_becomes_envelope() {
    let config = GatewayConfig::default()
        .with_base_url("http://127.0.0.1:9")
        .with_timeout_secs(2);
    let gateway = Gateway::in_memory(config).unwrap();

    let envelope: Envelope<Value> = gateway.get(ServiceKind::Api, "/users", None).await;

    assert!(!envelope.success);
    assert!(envelope.data.is_none());
    assert!(!envelope.message.is_empty());
}

#[tokio::test]
async fn test_multipart_upload_has_boundary_and_indexed_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/fitness/api/exercises"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {"id": "ex-9", "name": "Goblet squat"},
            "message": "Created"
        })))
        .mount(&mock_server)
        .await;

    let h = create_harness(&mock_server, Some("test-token"));
    let upload = ExerciseUpload {
        name: "Goblet squat".to_string(),
        muscle_group: Some("legs".to_string()),
        difficulty: None,
        description: None,
        video: Some(FileUpload::new("squat.mp4", "video/mp4", b"frames".to_vec())),
        steps: vec![ExerciseStep {
            order: 1,
            title: "Hold the bell".to_string(),
            description: None,
        }],
    };
    let envelope = h.services.exercises.create(&upload).await;
    assert!(envelope.success, "{}", envelope.message);
    assert_eq!(envelope.message, "Created");
    assert_eq!(envelope.data.unwrap().id, "ex-9");

    let requests = mock_server.received_requests().await.unwrap();
    let request = &requests[0];
    let content_type = request
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="));

    let body = String::from_utf8_lossy(&request.body);
    assert!(body.contains("name=\"steps[0].title\""));
    assert!(body.contains("Hold the bell"));
    assert!(body.contains("filename=\"squat.mp4\""));
    assert!(!body.contains("name=\"steps\""));
}

#[tokio::test]
async fn test_login_stores_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/account/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"data": {"token": "fresh-token"}, "message": "Welcome"}
        })))
        .mount(&mock_server)
        .await;

    let h = create_harness(&mock_server, None);
    let envelope = h
        .services
        .auth
        .login(&Credentials {
            email: "coach@example.test".to_string(),
            password: "hunter2".to_string(),
        })
        .await;

    assert!(envelope.success);
    assert_eq!(envelope.message, "Welcome");
    assert_eq!(h.tokens.token().await, Some("fresh-token".to_string()));
}

#[tokio::test]
async fn test_logout_clears_token_even_on_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/account/api/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let h = create_harness(&mock_server, Some("token"));
    let envelope = h.services.auth.logout().await;

    assert!(!envelope.success);
    assert_eq!(h.tokens.token().await, None);
}

/// Mirrors how callers turn raw input into a service call.
async fn delete_user(services: &Services, raw: Option<&str>) -> ClientResult<Envelope<Value>> {
    let id = ResourceId::require("user", raw)?;
    Ok(services.users.delete(&id).await)
}

#[tokio::test]
async fn test_missing_identifier_never_reaches_network() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/users/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let h = create_harness(&mock_server, Some("test-token"));

    assert!(matches!(
        delete_user(&h.services, None).await,
        Err(ClientError::MissingIdentifier { resource: "user" })
    ));
    assert!(matches!(
        delete_user(&h.services, Some("  ")).await,
        Err(ClientError::MissingIdentifier { resource: "user" })
    ));
    assert!(matches!(
        delete_user(&h.services, Some("..")).await,
        Err(ClientError::InvalidIdentifier { resource: "user", .. })
    ));
    assert!(mock_server.received_requests().await.unwrap().is_empty());

    let envelope = delete_user(&h.services, Some("u1")).await.unwrap();
    assert!(envelope.success, "{}", envelope.message);
}

#[tokio::test]
async fn test_identifier_stays_one_path_segment() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let h = create_harness(&mock_server, Some("test-token"));
    let id = ResourceId::new("user", "u1/../../account/api/policy/p9?force=true").unwrap();
    let envelope = h.services.users.delete(&id).await;
    assert!(envelope.success, "{}", envelope.message);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(
        requests[0].url.path(),
        "/users/u1%2F..%2F..%2Faccount%2Fapi%2Fpolicy%2Fp9%3Fforce%3Dtrue"
    );
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_gateway_post_and_put_verbs() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users"))
        .and(query_param("notify", "true"))
        .and(header("x-request-source", "console"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {"id": "u3"},
            "message": "Created"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/users/u3"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "data": {"message": "Name is required"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let h = create_harness(&mock_server, Some("test-token"));
    let config = RequestConfig::new()
        .header("x-request-source", "console")
        .query("notify", true);
    let created: Envelope<Value> = h
        .gateway
        .post(
            ServiceKind::Api,
            "/users",
            RequestBody::json(&json!({"email": "cy@example.test"})),
            Some(config),
        )
        .await;
    assert!(created.success, "{}", created.message);
    assert_eq!(created.message, "Created");
    assert_eq!(created.data, Some(json!({"id": "u3"})));

    let updated: Envelope<Value> = h
        .gateway
        .put(
            ServiceKind::Api,
            "/users/u3",
            RequestBody::json(&json!({"fullName": ""})),
            None,
        )
        .await;
    assert!(!updated.success);
    assert_eq!(updated.message, "Name is required");

    let requests = mock_server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body, json!({"email": "cy@example.test"}));
}

#[tokio::test]
async fn test_review_approve_path_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/fitness/api/reviews/r-7/approve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": "r-7", "planId": "p-1", "status": "approved"},
            "message": "Approved"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let h = create_harness(&mock_server, Some("test-token"));
    let id = ResourceId::new("review", "r-7").unwrap();
    let envelope = h
        .services
        .reviews
        .approve(
            &id,
            &coachdesk_client::services::reviews::ReviewDecision {
                comment: Some("looks good".to_string()),
            },
        )
        .await;

    assert!(envelope.success);
    assert_eq!(envelope.data.unwrap().status, "approved");

    let requests = mock_server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body, json!({"comment": "looks good"}));
}
