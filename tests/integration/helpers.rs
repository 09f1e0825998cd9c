//! Shared test helpers for integration tests.

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use jsonwebtoken::{EncodingKey, Header};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use projecthub_api::AppState;
use projecthub_auth::{IdentityResolver, TokenVerifier};
use projecthub_core::config::{
    AppConfig, AuthConfig, DatabaseConfig, DatabaseProvider, LoggingConfig, QueueConfig,
    ServerConfig, ServicesConfig,
};
use projecthub_database::memory::{MemoryCatalogStore, MemoryNotificationStore};
use projecthub_service::{HttpFileAttacher, NotificationService, SagaCoordinator};
use projecthub_worker::{Disposition, NotificationIngestor};

/// Secret shared between the token minter and the verifier under test.
pub const TEST_SECRET: &str = "integration-test-secret";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Mocked files service
    pub files: MockServer,
    /// Catalog rows, inspectable without going through HTTP
    pub catalog: Arc<MemoryCatalogStore>,
    /// Notification rows
    pub notifications: Arc<MemoryNotificationStore>,
    /// Consumer-side handler feeding the same notification store
    pub ingestor: NotificationIngestor,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application with a fresh files service mock.
    pub async fn new() -> Self {
        let files = MockServer::start().await;
        let files_url = files.uri();
        Self::build(files, files_url)
    }

    /// Create a test application whose attacher points at `files_url`
    /// instead of the mock, e.g. a port nothing listens on.
    pub async fn with_files_url(files_url: String) -> Self {
        let files = MockServer::start().await;
        Self::build(files, files_url)
    }

    fn build(files: MockServer, files_url: String) -> Self {
        let config = AppConfig {
            server: ServerConfig::default(),
            database: DatabaseConfig {
                provider: DatabaseProvider::Memory,
                ..DatabaseConfig::default()
            },
            auth: AuthConfig {
                jwt_secret: TEST_SECRET.to_string(),
                ..AuthConfig::default()
            },
            services: ServicesConfig {
                files_url,
                attach_timeout_ms: 500,
            },
            queue: QueueConfig {
                enabled: false,
                ..QueueConfig::default()
            },
            logging: LoggingConfig::default(),
        };
        config.validate().expect("test config should be valid");

        let catalog = Arc::new(MemoryCatalogStore::new());
        let notifications = Arc::new(MemoryNotificationStore::new());

        let attacher =
            Arc::new(HttpFileAttacher::new(&config.services).expect("Failed to build attacher"));
        let catalog_service = Arc::new(SagaCoordinator::new(catalog.clone(), attacher));
        let notification_service = Arc::new(NotificationService::new(notifications.clone()));

        let verifier = Arc::new(TokenVerifier::new(&config.auth));
        let identity_resolver = Arc::new(IdentityResolver::new(verifier));

        let app_state = AppState {
            config: Arc::new(config.clone()),
            identity_resolver,
            catalog_service,
            notification_service,
        };

        let router = projecthub_api::build_app(app_state, &config.server.cors);
        let ingestor = NotificationIngestor::new(notifications.clone(), false);

        Self {
            router,
            files,
            catalog,
            notifications,
            ingestor,
            config,
        }
    }

    /// Make the files service answer every attach with `status` and `body`.
    pub async fn files_respond(&self, status: u16, body: Value) {
        self.files.reset().await;
        Mock::given(method("POST"))
            .and(path_regex(r"^/files/[^/]+/attach$"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.files)
            .await;
    }

    /// Accept every attach, but only after `delay`.
    pub async fn files_stall(&self, delay: Duration) {
        self.files.reset().await;
        Mock::given(method("POST"))
            .and(path_regex(r"^/files/[^/]+/attach$"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "ok": true }))
                    .set_delay(delay),
            )
            .mount(&self.files)
            .await;
    }

    /// Accept attaching `file_id` only; anything else is unmatched (404).
    pub async fn files_accept(&self, file_id: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/files/{file_id}/attach")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .mount(&self.files)
            .await;
    }

    /// Number of attach calls the files service has received.
    pub async fn attach_calls(&self) -> usize {
        self.files
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }

    /// Deliver a queue message as the consumer would.
    pub async fn deliver(&self, event: Value) -> Disposition {
        let payload = serde_json::to_vec(&event).expect("Failed to serialize event");
        self.ingestor.handle("project.file.ready", &payload).await
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        self.request_with_headers(method, path, body, token, &[]).await
    }

    /// Make an HTTP request with extra headers
    pub async fn request_with_headers(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Create an entry for `token`'s owner, attaching `file_id`, and return its id.
    pub async fn create_entry(&self, token: &str, file_id: &str) -> i64 {
        self.files_accept(file_id).await;
        let response = self
            .request(
                "POST",
                "/api/catalog",
                Some(json!({ "title": "Seed", "fileId": file_id })),
                Some(token),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Create failed: {:?}",
            response.body
        );
        response.body["data"]["entry"]["id"]
            .as_i64()
            .expect("No entry id in create response")
    }
}

/// A loopback URL with no listener behind it.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind an ephemeral port");
    let port = listener
        .local_addr()
        .expect("Failed to read local address")
        .port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

/// Mint an HS256 token for `user_id` valid for an hour.
pub fn token_for(user_id: &str) -> String {
    mint(json!({
        "userId": user_id,
        "exp": chrono::Utc::now().timestamp() + 3600,
    }))
}

/// Mint a token with arbitrary claims.
pub fn mint(claims: Value) -> String {
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("Failed to mint token")
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
