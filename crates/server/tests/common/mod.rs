//! Common test utilities for in-process API testing.
//!
//! The fixture builds the real router over SQLite stores in a temporary
//! directory, so requests exercise the full stack without binding a port.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use helpdesk_core::{
    AuthConfig, AuthMethod, Authenticator, Config, DatabaseConfig, LoggingConfig,
    NoneAuthenticator, ServerConfig, SqliteResponseStore, SqliteTicketStore, SqliteUserStore,
    TicketsConfig, TokenAuthenticator, TokenGrant,
};

/// Token accepted when the fixture runs with token auth.
pub const TEST_TOKEN: &str = "test-token";

/// Test fixture wrapping an in-process router.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_ticket_creation() {
///     let fixture = TestFixture::new().await;
///     let user_id = fixture.seed_user("Ada", "ada@example.com").await;
///
///     let response = fixture.post("/api/v1/tickets", json!({
///         "user_id": user_id,
///         "agent_id": 2,
///         "title": "Test",
///         "description": "Test",
///         "status": "open"
///     })).await;
///
///     assert_eq!(response.status, 201);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Temporary directory holding the test database
    pub temp_dir: TempDir,
    /// Bearer token sent with every request, if any
    token: Option<String>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with anonymous access.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let auth = if test_config.token_auth {
            AuthConfig {
                method: AuthMethod::Token,
                tokens: vec![TokenGrant {
                    token: TEST_TOKEN.to_string(),
                    user_id: 1,
                }],
            }
        } else {
            AuthConfig {
                method: AuthMethod::None,
                tokens: vec![],
            }
        };

        let authenticator: Arc<dyn Authenticator> = match auth.method {
            AuthMethod::None => Arc::new(NoneAuthenticator::new()),
            AuthMethod::Token => Arc::new(TokenAuthenticator::new(auth.tokens.clone())),
        };

        let config = Config {
            auth,
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            database: DatabaseConfig {
                path: db_path.clone(),
            },
            tickets: TicketsConfig {
                per_page: test_config.per_page.unwrap_or(3),
                max_per_page: 100,
            },
            logging: LoggingConfig::default(),
        };

        let state = Arc::new(helpdesk_server::state::AppState::new(
            config,
            authenticator,
            Arc::new(SqliteTicketStore::new(&db_path).expect("Failed to create ticket store")),
            Arc::new(
                SqliteResponseStore::new(&db_path).expect("Failed to create response store"),
            ),
            Arc::new(SqliteUserStore::new(&db_path).expect("Failed to create user store")),
        ));

        let router = helpdesk_server::api::create_router(state);
        let token = test_config.token_auth.then(|| TEST_TOKEN.to_string());

        Self {
            router,
            temp_dir,
            token,
        }
    }

    /// Create a user through the API and return its id.
    pub async fn seed_user(&self, name: &str, email: &str) -> i64 {
        let response = self
            .post("/api/v1/users", json!({"name": name, "email": email}))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "seed user failed: {}", response.body);
        response.body["user"]["id"]
            .as_i64()
            .expect("user id missing")
    }

    /// Create a ticket through the API and return its id.
    pub async fn seed_ticket(&self, user_id: i64, agent_id: i64, status: &str) -> i64 {
        let response = self
            .post("/api/v1/tickets", ticket_payload(user_id, agent_id, status))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "seed ticket failed: {}", response.body);
        response.body["ticket"]["id"]
            .as_i64()
            .expect("ticket id missing")
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body)).await
    }

    /// Send a PATCH request with JSON body.
    pub async fn patch(&self, path: &str, body: Value) -> TestResponse {
        self.request("PATCH", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        self.request_raw("POST", path, body, "application/json", self.token.as_deref())
            .await
    }

    /// Send a GET request with an explicit bearer token (or none).
    pub async fn get_with_token(&self, path: &str, token: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method("GET").uri(path);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn request_raw(
        &self,
        method: &str,
        path: &str,
        body: &str,
        content_type: &str,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", content_type);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        if let Some(ref token) = self.token {
            request_builder = request_builder.header("Authorization", format!("Bearer {}", token));
        }

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body_bytes).into()))
        };

        TestResponse { status, body }
    }
}

/// A valid ticket payload.
pub fn ticket_payload(user_id: i64, agent_id: i64, status: &str) -> Value {
    json!({
        "user_id": user_id,
        "agent_id": agent_id,
        "title": "engine problem",
        "description": "The engine makes a grinding noise on start.",
        "status": status
    })
}

/// Configuration for test fixture.
#[derive(Debug, Clone, Default)]
pub struct TestConfig {
    /// Require the fixture's bearer token on protected routes
    pub token_auth: bool,
    /// Default page size (3 when unset)
    pub per_page: Option<u32>,
}

impl TestConfig {
    /// Create config with token auth enabled.
    pub fn with_token_auth() -> Self {
        Self {
            token_auth: true,
            per_page: None,
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

/// Helper to assert a JSON path equals expected value.
#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json[$path];
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}
