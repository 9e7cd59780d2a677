use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Note, NotePatch, NoteSummary};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Not authenticated: pass --token or set NOTES_TOKEN")]
    MissingToken,

    #[error("Invalid server URL '{0}'")]
    InvalidServerUrl(String),

    #[error("{message} (HTTP {status}, {code})")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Thin HTTP client over the notes API.
#[derive(Debug, Clone)]
pub struct NotesClient {
    http: Client,
    base_url: url::Url,
    token: Option<String>,
}

impl NotesClient {
    pub fn new(server: &str, token: Option<String>) -> Result<Self, ClientError> {
        let base_url = url::Url::parse(server)
            .map_err(|_| ClientError::InvalidServerUrl(server.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidServerUrl(server.to_string()));
        }

        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            http,
            base_url,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.token.as_deref().ok_or(ClientError::MissingToken)?;
        Ok(request.bearer_auth(token))
    }

    pub async fn health(&self) -> Result<Value, ClientError> {
        let response = self.http.get(self.url("/health")).send().await?;
        decode(response).await
    }

    pub async fn list(&self, search: Option<&str>) -> Result<Vec<NoteSummary>, ClientError> {
        let mut request = self.http.get(self.url("/notes"));
        if let Some(term) = search {
            request = request.query(&[("search", term)]);
        }
        let response = self.authorized(request)?.send().await?;
        decode(response).await
    }

    pub async fn create(&self, title: &str, content: &str) -> Result<Note, ClientError> {
        let request = self
            .http
            .post(self.url("/notes"))
            .json(&json!({ "title": title, "content": content }));
        let response = self.authorized(request)?.send().await?;
        decode(response).await
    }

    pub async fn update(&self, id: &str, patch: &NotePatch) -> Result<(), ClientError> {
        let request = self.http.put(self.url(&note_path(id))).json(patch);
        let response = self.authorized(request)?.send().await?;
        decode::<Value>(response).await.map(|_| ())
    }

    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let request = self.http.delete(self.url(&note_path(id)));
        let response = self.authorized(request)?.send().await?;
        decode::<Value>(response).await.map(|_| ())
    }
}

/// Ids that parse as UUIDs go out in canonical form; anything else is
/// percent-encoded as-is and left for the server to reject.
fn note_path(id: &str) -> String {
    match Uuid::parse_str(id) {
        Ok(uuid) => format!("/notes/{}", uuid),
        Err(_) => {
            let encoded: String = url::form_urlencoded::byte_serialize(id.as_bytes()).collect();
            format!("/notes/{}", encoded)
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    Err(api_error(status.as_u16(), &body))
}

fn api_error(status: u16, body: &str) -> ClientError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|v| v.get(name))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    ClientError::Api {
        status,
        code: field("code").unwrap_or_else(|| "UNKNOWN".to_string()),
        message: field("message").unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("Server returned HTTP {}", status)
            } else {
                body.trim().to_string()
            }
        }),
    }
}
