//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with a mock engine and a temporary association store, so the qBittorrent
//! surface can be exercised without a real engine.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use reqwest::Url;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use arrshim_core::{
    testing::MockEngine, AssociationStore, CategoryConfig, Config, DatabaseConfig,
    DownloadEngine, EngineConfig, ServerConfig, SqliteAssociationStore,
};

/// Re-export fixtures for test convenience
pub use arrshim_core::testing::fixtures;

pub const DEFAULT_CATEGORY: &str = "tribler";
pub const DOWNLOAD_DIR: &str = "/downloads";

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_add() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture
///         .post_form("/api/v2/torrents/add", &[("urls", "magnet:?xt=urn:btih:abc")])
///         .await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock engine - control downloads and failures
    pub engine: Arc<MockEngine>,
    /// Association store backed by a file in `temp_dir`
    pub store: Arc<SqliteAssociationStore>,
    /// Temporary directory for the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    /// Parsed JSON body, `Null` if the body is empty or not JSON.
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    /// Create a new test fixture with the default category in place.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            database: DatabaseConfig {
                path: db_path.clone(),
            },
            engine: EngineConfig {
                url: "http://engine.invalid".to_string(),
                api_key: "test-key".to_string(),
                download_dir: DOWNLOAD_DIR.to_string(),
                ..Default::default()
            },
            categories: CategoryConfig {
                default_category: DEFAULT_CATEGORY.to_string(),
            },
            ..Default::default()
        };

        let engine = Arc::new(MockEngine::with_destination(DOWNLOAD_DIR));
        let store = Arc::new(
            SqliteAssociationStore::new(&db_path).expect("Failed to create association store"),
        );
        store
            .add_category(DEFAULT_CATEGORY, DOWNLOAD_DIR)
            .expect("Failed to create default category");

        let state = Arc::new(arrshim_server::state::AppState::new(
            config,
            Arc::clone(&store) as Arc<dyn AssociationStore>,
            Arc::clone(&engine) as Arc<dyn DownloadEngine>,
        ));

        let router = arrshim_server::api::create_router(state);

        Self {
            router,
            engine,
            store,
            temp_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Send a POST request with no body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Send a POST request with a url-encoded form body.
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let mut encoder = Url::parse("http://localhost/").unwrap();
        encoder.query_pairs_mut().extend_pairs(fields);
        let body = encoder.query().unwrap_or_default().to_string();

        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Send a POST request with a multipart form body.
    pub async fn post_multipart(&self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        const BOUNDARY: &str = "arrshim-test-boundary";

        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            ));
        }
        body.push_str(&format!("--{}--\r\n", BOUNDARY));

        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).to_string();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
            text,
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
            $status, $response.status, $response.text
        );
    };
}
