//! Mock API tests for the HTTP layer.
//!
//! These tests use wiremock to simulate the remote service and check the
//! interceptor and gateway without network access or real credentials.

use std::sync::{Arc, Mutex};

use dockyard_core::{
    AccessToken, ApiUrl, Carrier, CredentialStore, Credentials, EntityId, Gateway, Navigator,
    Persistence, Route, UserInfo,
};
use dockyard_http::ApiClient;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

#[derive(Default)]
struct RecordingNavigator(Mutex<Vec<Route>>);

impl RecordingNavigator {
    fn routes(&self) -> Vec<Route> {
        self.0.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.0.lock().unwrap().push(route);
    }
}

struct Harness {
    client: ApiClient,
    store: Arc<CredentialStore>,
    navigator: Arc<RecordingNavigator>,
}

/// Helper to create a client pointed at a mock server.
fn harness(server: &MockServer, token: Option<&str>) -> Harness {
    let api = ApiUrl::new(format!("http://127.0.0.1:{}/api", server.address().port())).unwrap();
    let store = Arc::new(CredentialStore::in_memory());
    if let Some(token) = token {
        store
            .set_session(
                &AccessToken::new(token),
                &UserInfo::new(json!({"username": "dispatch"})),
            )
            .unwrap();
    }
    let navigator = Arc::new(RecordingNavigator::default());
    let client = ApiClient::new(api, store.clone(), navigator.clone()).unwrap();
    Harness {
        client,
        store,
        navigator,
    }
}

fn has_authorization(request: &Request) -> bool {
    request.headers.contains_key("authorization")
}

// ============================================================================
// Interceptor Tests
// ============================================================================

#[tokio::test]
async fn test_list_sends_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/carriers"))
        .and(header("authorization", "Bearer tok123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Acme Haulage", "scac": "ACMH"},
            {"id": "c-2", "name": "Northern Freight"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("tok123"));
    let carriers = h.client.gateway::<Carrier>().list().await.unwrap();

    assert_eq!(carriers.len(), 2);
    assert_eq!(carriers[0].id.as_str(), "1");
    assert_eq!(carriers[1].fields.name, "Northern Freight");
}

#[tokio::test]
async fn test_request_without_token_has_no_authorization_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/carriers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, None);
    h.client.gateway::<Carrier>().list().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!has_authorization(&requests[0]));
}

#[tokio::test]
async fn test_unauthorized_clears_store_and_redirects_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/carriers"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "TokenExpired",
            "message": "Session has expired"
        })))
        .mount(&server)
        .await;

    let h = harness(&server, Some("tok123"));
    let err = h.client.gateway::<Carrier>().list().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(err.to_string().contains("Session has expired"));
    assert!(h.store.token().is_none());
    assert!(h.store.user_info().is_none());
    assert_eq!(h.navigator.routes(), vec![Route::Login]);
}

#[tokio::test]
async fn test_each_unauthorized_response_redirects_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/carriers"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let h = harness(&server, Some("tok123"));
    let gateway = h.client.gateway::<Carrier>();
    assert!(gateway.list().await.is_err());
    assert!(gateway.list().await.is_err());

    assert_eq!(h.navigator.routes(), vec![Route::Login, Route::Login]);
}

#[tokio::test]
async fn test_other_errors_leave_session_alone() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/carriers"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/carriers"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let h = harness(&server, Some("tok123"));
    let gateway = h.client.gateway::<Carrier>();

    assert_eq!(gateway.list().await.unwrap_err().status(), Some(403));
    let err = gateway.create(&Carrier::default()).await.unwrap_err();
    assert_eq!(err.status(), Some(500));

    assert!(h.store.token().is_some());
    assert!(h.navigator.routes().is_empty());
}

#[tokio::test]
async fn test_connection_failure_is_transport_error() {
    let server = MockServer::start().await;
    let h = harness(&server, Some("tok123"));
    drop(server);

    let err = h.client.gateway::<Carrier>().list().await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.status(), None);
    assert!(h.store.token().is_some());
}

// ============================================================================
// Login Tests
// ============================================================================

#[tokio::test]
async fn test_login_success_stores_session_without_sending_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"username": "dispatch", "password": "secret123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh-token",
            "user_info": {"username": "dispatch", "role": "admin"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("stale-token"));
    let credentials = Credentials::new("dispatch", "secret123").unwrap();
    let info = h
        .client
        .login(&credentials, Persistence::Durable)
        .await
        .unwrap();

    assert_eq!(info.role(), Some("admin"));
    assert_eq!(h.store.token().unwrap().as_str(), "fresh-token");

    let requests = server.received_requests().await.unwrap();
    assert!(!has_authorization(&requests[0]));
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Invalid username or password"
        })))
        .mount(&server)
        .await;

    let h = harness(&server, None);
    let credentials = Credentials::new("dispatch", "wrong").unwrap();
    let result = h.client.login(&credentials, Persistence::Durable).await;

    let err = result.unwrap_err().to_string();
    assert!(err.contains("401"));
    assert!(!h.store.is_authenticated());
}

#[tokio::test]
async fn test_logout_clears_and_navigates() {
    let server = MockServer::start().await;
    let h = harness(&server, Some("tok123"));

    h.client.logout().unwrap();
    h.client.logout().unwrap();

    assert!(!h.store.is_authenticated());
    assert_eq!(h.navigator.routes(), vec![Route::Login, Route::Login]);
}

// ============================================================================
// Gateway Tests
// ============================================================================

#[tokio::test]
async fn test_create_posts_draft_and_returns_record() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/carriers"))
        .and(header("authorization", "Bearer tok123"))
        .and(body_json(json!({"name": "Acme"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "c-9",
            "name": "Acme"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("tok123"));
    let draft = Carrier {
        name: "Acme".to_string(),
        ..Default::default()
    };
    let record = h.client.gateway::<Carrier>().create(&draft).await.unwrap();

    assert_eq!(record.id.as_str(), "c-9");
    assert_eq!(record.fields, draft);
}

#[tokio::test]
async fn test_update_puts_to_member_path() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/carriers/c-9"))
        .and(body_json(json!({"name": "Acme Ltd", "scac": "ACME"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "c-9",
            "name": "Acme Ltd",
            "scac": "ACME"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("tok123"));
    let id = EntityId::new("c-9").unwrap();
    let draft = Carrier {
        name: "Acme Ltd".to_string(),
        scac: Some("ACME".to_string()),
        ..Default::default()
    };
    let record = h
        .client
        .gateway::<Carrier>()
        .update(&id, &draft)
        .await
        .unwrap();

    assert_eq!(record.fields.scac.as_deref(), Some("ACME"));
}

#[tokio::test]
async fn test_update_missing_record_is_404() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/carriers/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "NotFound"
        })))
        .mount(&server)
        .await;

    let h = harness(&server, Some("tok123"));
    let id = EntityId::new("nope").unwrap();
    let err = h
        .client
        .gateway::<Carrier>()
        .update(&id, &Carrier::default())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_delete_ignores_response_body() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/carriers/c-9"))
        .and(header("authorization", "Bearer tok123"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("tok123"));
    let id = EntityId::new("c-9").unwrap();
    h.client.gateway::<Carrier>().delete(&id).await.unwrap();
}

#[tokio::test]
async fn test_member_ids_are_one_encoded_segment() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/carriers/a%23b"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/carriers/x%3Fforce=true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "x?force=true",
            "name": "Acme"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("tok123"));
    let gateway = h.client.gateway::<Carrier>();
    gateway.delete(&EntityId::new("a#b").unwrap()).await.unwrap();

    let record = gateway
        .update(&EntityId::new("x?force=true").unwrap(), &Carrier::default())
        .await
        .unwrap();
    assert_eq!(record.id.as_str(), "x?force=true");

    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.query().is_none()));
}

#[tokio::test]
async fn test_malformed_list_body_is_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/carriers"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let h = harness(&server, Some("tok123"));
    let err = h.client.gateway::<Carrier>().list().await.unwrap_err();
    assert!(err.is_transport());
    assert!(h.navigator.routes().is_empty());
}
