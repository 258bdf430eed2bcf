//! Common test utilities for driving the router in-process.
//!
//! The fixture wires the real SQLite stores (in a temp dir) and a running
//! activity writer behind the same router the binary serves.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use laneboard_core::{
    create_activity_system, ActivityConfig, ActivityStore, ApiKeyAuthenticator, AuthConfig,
    AuthMethod, Authenticator, BoardService, Config, DatabaseConfig, NoneAuthenticator,
    ServerConfig, SqliteActivityStore, SqliteBoardStore,
};
use laneboard_server::state::AppState;

/// Test fixture for HTTP-level tests.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_pipeline_creation() {
///     let fixture = TestFixture::new();
///
///     let response = fixture.post("/api/v1/pipelines", json!({
///         "name": "Sales",
///         "sub_account_id": "sub-1"
///     })).await;
///
///     assert_eq!(response.status, StatusCode::OK);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Temporary directory holding the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Fixture without authentication.
    pub fn new() -> Self {
        Self::with_auth(AuthConfig {
            method: AuthMethod::None,
            api_key: None,
        })
    }

    /// Fixture that requires the given API key.
    pub fn with_api_key(key: &str) -> Self {
        Self::with_auth(AuthConfig {
            method: AuthMethod::ApiKey,
            api_key: Some(key.to_string()),
        })
    }

    fn with_auth(auth: AuthConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let authenticator: Arc<dyn Authenticator> = match (&auth.method, &auth.api_key) {
            (AuthMethod::ApiKey, Some(key)) => Arc::new(ApiKeyAuthenticator::new(key.clone())),
            _ => Arc::new(NoneAuthenticator::new()),
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
            activity: ActivityConfig::default(),
        };

        let board_store =
            Arc::new(SqliteBoardStore::new(&db_path).expect("Failed to create board store"));
        let activity_store: Arc<dyn ActivityStore> = Arc::new(
            SqliteActivityStore::new(&db_path).expect("Failed to create activity store"),
        );

        let (activity_handle, activity_writer) =
            create_activity_system(Arc::clone(&activity_store), 100);
        tokio::spawn(activity_writer.run());

        let state = Arc::new(AppState::new(
            config,
            authenticator,
            BoardService::new(board_store, activity_handle),
            activity_store,
        ));

        Self {
            router: laneboard_server::api::create_router(state),
            temp_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.send("GET", path, None, &[]).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.send("POST", path, Some(body), &[]).await
    }

    /// Send a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.send("PUT", path, Some(body), &[]).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.send("DELETE", path, None, &[]).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.dispatch(request).await
    }

    /// Send a request with extra headers (API key, acting member).
    pub async fn send(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        for (name, value) in headers {
            request_builder = request_builder.header(*name, *value);
        }

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.dispatch(request_builder.body(body).unwrap()).await
    }

    /// Poll the activity endpoint until `total` reaches `expected`.
    ///
    /// The writer persists records asynchronously.
    pub async fn wait_for_activity(&self, query: &str, expected: i64) -> TestResponse {
        let path = format!("/api/v1/activity{}", query);
        let mut response = self.get(&path).await;
        for _ in 0..40 {
            if response.body["total"] == expected {
                break;
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
            response = self.get(&path).await;
        }
        response
    }

    async fn dispatch(&self, request: Request<Body>) -> TestResponse {
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
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
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
