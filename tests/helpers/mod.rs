//! Shared test helpers for API integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use serde_json::Value;
use tokio::sync::watch;
use tower::ServiceExt;
use uuid::Uuid;

use blockshare_api::{AppState, build_app};
use blockshare_auth::JwtEncoder;
use blockshare_core::config::AppConfig;
use blockshare_database::{Database, MemoryDatabase};
use blockshare_service::ServiceContainer;

const BOUNDARY: &str = "blockshare-test-boundary";

/// Test application context over the in-memory backend.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application config
    pub config: AppConfig,
    /// Mints bearer tokens the router accepts
    pub encoder: JwtEncoder,
    /// Stops the file event listener when dropped
    _shutdown: watch::Sender<bool>,
}

/// An identity with a bearer token.
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config.server.public_url = "http://files.test".to_string();
        config.files.token_length = 24;

        let database = Database::Memory(MemoryDatabase::new());
        let (services, events) = ServiceContainer::new(database.repositories(), &config.files);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(services.listener().run(events, shutdown_rx));

        let encoder = JwtEncoder::new(&config.auth);
        let router = build_app(AppState::new(config.clone(), database, &services));

        Self {
            router,
            config,
            encoder,
            _shutdown: shutdown_tx,
        }
    }

    /// A fresh identity with a valid token. The user row is provisioned
    /// on its first authenticated request.
    pub fn user(&self, name: &str) -> TestUser {
        let id = Uuid::new_v4();
        let email = format!("{name}@test.com");
        let token = self
            .encoder
            .issue(id, &email, name, chrono::Duration::minutes(15))
            .expect("Failed to issue token");
        TestUser { id, email, token }
    }

    /// Make a JSON request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Upload `data` as the multipart `file` field.
    pub async fn upload(
        &self,
        file_name: &str,
        mime_type: &str,
        data: &[u8],
        token: Option<&str>,
    ) -> TestResponse {
        let mut body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: {mime_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let mut req = Request::builder()
            .method("POST")
            .uri("/api/v1/files/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );

        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Upload a small text file as `user` and return its JSON.
    pub async fn upload_text(&self, user: &TestUser, file_name: &str) -> Value {
        let response = self
            .upload(file_name, "text/plain", b"hello", Some(&user.token))
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Upload failed: {:?}",
            response.body
        );
        response.body
    }

    /// The path part of a file's `download_url`.
    pub fn download_path(&self, file: &Value) -> String {
        let url = file["download_url"]
            .as_str()
            .expect("No download_url in file response");
        url.strip_prefix(self.config.server.public_url.as_str())
            .expect("download_url outside public_url")
            .to_string()
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
            .await
            .expect("Failed to read body")
            .to_vec();

        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            bytes,
            body,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw body
    pub bytes: Vec<u8>,
    /// Parsed JSON body, `Null` when not JSON
    pub body: Value,
}

impl TestResponse {
    /// A header as a string.
    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}
