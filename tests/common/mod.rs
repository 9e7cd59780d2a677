#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;

use notes_api::app::{app, AppState};
use notes_api::auth::{issue_dev_token, IdentityCredentials, JwtVerifier};
use notes_api::database::{MemoryNoteStore, NoteStore};

pub const TEST_SECRET: &str = "integration-secret";
pub const TEST_PROJECT: &str = "notes-integration";

/// An in-process server on a free port, backed by the memory store and a
/// shared-secret verifier. Lives as long as the test's runtime.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with_store(Arc::new(MemoryNoteStore::new())).await
    }

    pub async fn spawn_with_store(store: Arc<dyn NoteStore>) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let creds = credentials();
        let verifier = JwtVerifier::with_secret(TEST_SECRET, &creds.issuer(), &creds.audience());
        let router = app(AppState::new(store, Arc::new(verifier)), &[]);

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test port")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let server = Self {
            port,
            base_url,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST /notes as `token`, returning the created note
    pub async fn create_note(&self, token: &str, title: &str, content: &str) -> Result<Value> {
        let res = self
            .client
            .post(self.url("/notes"))
            .bearer_auth(token)
            .json(&serde_json::json!({ "title": title, "content": content }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "create failed: {}", res.status());
        Ok(res.json().await?)
    }

    /// GET /notes as `token`, with an optional search term
    pub async fn list_notes(&self, token: &str, search: Option<&str>) -> Result<Vec<Value>> {
        let mut req = self.client.get(self.url("/notes")).bearer_auth(token);
        if let Some(term) = search {
            req = req.query(&[("search", term)]);
        }
        let res = req.send().await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "list failed: {}", res.status());
        Ok(res.json().await?)
    }
}

pub fn credentials() -> IdentityCredentials {
    serde_json::from_value(serde_json::json!({
        "project_id": TEST_PROJECT,
        "jwt_secret": TEST_SECRET,
    }))
    .expect("static test credentials")
}

/// A valid one-hour bearer token for `user_id`
pub fn token(user_id: &str) -> String {
    issue_dev_token(&credentials(), user_id, None, chrono::Duration::hours(1)).expect("test token")
}

/// Assert the standard error body shape and return its code
pub async fn error_code(res: reqwest::Response) -> Result<String> {
    let body: Value = res.json().await?;
    assert_eq!(body["error"], Value::Bool(true), "not an error body: {}", body);
    assert!(body["message"].is_string(), "missing message: {}", body);
    Ok(body["code"].as_str().unwrap_or_default().to_string())
}
