/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - A tempdir-backed file store, so no database is needed
/// - Router construction with the local-dev identity (or a configured
///   provider, for the auth tests)
/// - Request/response helpers working directly against the router

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::Service as _;

use tasktrack_api::app::{build_router, AppState};
use tasktrack_api::config::{ApiConfig, AuthConfig, Config, StorageConfig};
use tasktrack_shared::auth::{AuthUser, EntraVerifier, TokenVerifier};
use tasktrack_shared::store::{DocumentStore, FileStore};

/// Test context containing all necessary resources
pub struct TestContext {
    pub app: axum::Router,
    pub user: AuthUser,
    pub store: Arc<FileStore>,

    // Holds the data file and static dir for the lifetime of the test
    _dir: TempDir,
}

impl TestContext {
    /// Creates a context backed by a fresh file store and local-dev auth.
    pub fn new() -> anyhow::Result<Self> {
        Self::with_verifier(TokenVerifier::LocalDev, AuthConfig::LocalDev)
    }

    /// Creates a context with Entra configured, for the 401 paths. The
    /// tenant is fake, so only requests that fail before any JWKS fetch
    /// belong in these tests.
    pub fn with_entra() -> anyhow::Result<Self> {
        Self::with_verifier(
            TokenVerifier::Entra(EntraVerifier::new("test-tenant", "test-client")),
            AuthConfig::Entra {
                tenant_id: "test-tenant".to_string(),
                client_id: "test-client".to_string(),
            },
        )
    }

    fn with_verifier(verifier: TokenVerifier, auth: AuthConfig) -> anyhow::Result<Self> {
        let dir = tempfile::tempdir()?;

        let static_dir = dir.path().join("public");
        std::fs::create_dir_all(&static_dir)?;
        std::fs::write(
            static_dir.join("index.html"),
            "<!doctype html><title>Tasktrack</title>",
        )?;

        let data_file: PathBuf = dir.path().join("data.json");
        let store = Arc::new(FileStore::open(&data_file)?);

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            storage: StorageConfig::File { path: data_file },
            auth,
            static_dir,
        };

        let state = AppState::new(
            store.clone() as Arc<dyn DocumentStore>,
            Arc::new(verifier),
            config,
        );

        Ok(TestContext {
            app: build_router(state),
            user: AuthUser::local_dev(),
            store,
            _dir: dir,
        })
    }

    /// Sends a request and returns status plus parsed JSON body (or Null
    /// for non-JSON responses such as static files).
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("PUT", uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send("DELETE", uri, None).await
    }

    /// Creates a task through the API and returns its id.
    pub async fn create_task(&self, body: Value) -> String {
        let (status, task) = self.post("/api/tasks", body).await;
        assert_eq!(status, StatusCode::CREATED, "task creation failed: {task}");
        task["id"].as_str().unwrap().to_string()
    }

    /// Creates a folder through the API and returns its id.
    pub async fn create_folder(&self, name: &str) -> String {
        let (status, folder) = self
            .post("/api/folders", serde_json::json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "folder creation failed: {folder}");
        folder["id"].as_str().unwrap().to_string()
    }
}

/// Short pause so consecutive writes land on distinct millisecond
/// timestamps; the wire format truncates below that.
pub async fn tick() {
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
}
