// src/watch/fetcher.rs
use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::config::AppletConfig;
use crate::watch::category::{Category, CategorySpec, SERVICE_DOMAIN};

/// Why a collection read failed. The orchestrator decides suppress vs report
/// from this, so the variants carry stable string detail rather than the
/// transport library's error types.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    /// Name resolution, refused connection, or timeout. Treated upstream as a
    /// transient network outage.
    #[error("connection failure: {0}")]
    Connect(String),

    /// Any other transport-level failure.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Non-2xx response; auth failures land here as 401/403.
    #[error("HTTP {status} from /{endpoint}.json: {detail}")]
    Status {
        endpoint: &'static str,
        status: u16,
        detail: String,
    },

    /// The body was not the JSON document the endpoint is supposed to serve.
    #[error("unexpected response from /{endpoint}.json: {detail}")]
    Decode {
        endpoint: &'static str,
        detail: String,
    },
}

impl FetchError {
    /// True for the suppressible kind: the cycle logs and moves on instead of
    /// surfacing an error signal.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, FetchError::Connect(_))
    }

    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            FetchError::Connect(err.to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

/// One collection read per category per cycle. No pagination, no retry; the
/// next cycle is the recovery mechanism.
#[async_trait]
pub trait CategoryFetcher: Send + Sync {
    async fn fetch(&self, category: Category) -> std::result::Result<Vec<Value>, FetchError>;
}

/// Authenticated reads against the live service.
pub struct HttpFetcher {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpFetcher {
    pub fn new(cfg: &AppletConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            base_url: format!("https://{}.{SERVICE_DOMAIN}", cfg.subdomain),
            api_key: cfg.api_key.clone(),
        })
    }
}

#[async_trait]
impl CategoryFetcher for HttpFetcher {
    async fn fetch(&self, category: Category) -> std::result::Result<Vec<Value>, FetchError> {
        let spec = category.spec();
        let url = format!("{}/{}.json", self.base_url, spec.endpoint);

        // The service expects `apiKey:xxx` basic auth; the password is filler.
        let resp = self
            .client
            .get(&url)
            .basic_auth(&self.api_key, Some("xxx"))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = resp.status();
        if !status.is_success() {
            let detail = snippet(&resp.text().await.unwrap_or_default());
            return Err(FetchError::Status {
                endpoint: spec.endpoint,
                status: status.as_u16(),
                detail,
            });
        }

        let body: Value = resp.json().await.map_err(|e| FetchError::Decode {
            endpoint: spec.endpoint,
            detail: e.to_string(),
        })?;
        Ok(extract_collection(spec, &body))
    }
}

/// Pull the item array out of a response body. An absent, null, or non-array
/// collection is a successful empty result, logged informationally.
pub fn extract_collection(spec: &CategorySpec, body: &Value) -> Vec<Value> {
    match body.get(spec.collection_key) {
        Some(Value::Array(items)) => items.clone(),
        None | Some(Value::Null) => {
            tracing::info!(endpoint = spec.endpoint, "response has no collection");
            Vec::new()
        }
        Some(_) => {
            tracing::info!(
                endpoint = spec.endpoint,
                key = spec.collection_key,
                "collection is not an array, treating as empty"
            );
            Vec::new()
        }
    }
}

fn snippet(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    if trimmed.len() <= MAX {
        trimmed.to_string()
    } else {
        let mut end = MAX;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &trimmed[..end])
    }
}

/// In-memory fetcher for tests and the demo bin: canned per-category
/// responses, returned fresh on every call.
#[derive(Default)]
pub struct StaticFetcher {
    responses: HashMap<Category, std::result::Result<Vec<Value>, FetchError>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(mut self, category: Category, items: Vec<Value>) -> Self {
        self.responses.insert(category, Ok(items));
        self
    }

    /// Load a full response body (as served by the API) and extract its
    /// collection the same way the HTTP fetcher does.
    pub fn with_body(mut self, category: Category, body: &str) -> Result<Self> {
        let body: Value = serde_json::from_str(body).context("parse fixture body")?;
        let items = extract_collection(category.spec(), &body);
        self.responses.insert(category, Ok(items));
        Ok(self)
    }

    pub fn with_error(mut self, category: Category, err: FetchError) -> Self {
        self.responses.insert(category, Err(err));
        self
    }
}

#[async_trait]
impl CategoryFetcher for StaticFetcher {
    async fn fetch(&self, category: Category) -> std::result::Result<Vec<Value>, FetchError> {
        match self.responses.get(&category) {
            Some(resp) => resp.clone(),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn connectivity_split_matches_policy() {
        assert!(FetchError::Connect("dns".into()).is_connectivity());
        assert!(!FetchError::Transport("body cut short".into()).is_connectivity());
        assert!(!FetchError::Status {
            endpoint: "projects",
            status: 401,
            detail: "bad key".into()
        }
        .is_connectivity());
        assert!(!FetchError::Decode {
            endpoint: "projects",
            detail: "not json".into()
        }
        .is_connectivity());
    }

    #[test]
    fn status_error_names_the_endpoint() {
        let err = FetchError::Status {
            endpoint: "posts",
            status: 401,
            detail: "invalid key".into(),
        };
        assert_eq!(err.to_string(), "HTTP 401 from /posts.json: invalid key");
    }

    #[test]
    fn absent_or_odd_collections_read_as_empty() {
        let spec = Category::Projects.spec();
        assert!(extract_collection(spec, &json!({"STATUS": "OK"})).is_empty());
        assert!(extract_collection(spec, &json!({"projects": null})).is_empty());
        assert!(extract_collection(spec, &json!({"projects": "[]"})).is_empty());
        assert_eq!(
            extract_collection(spec, &json!({"projects": [{"id": "1"}]})).len(),
            1
        );
    }

    #[tokio::test]
    async fn static_fetcher_defaults_to_empty() {
        let fetcher = StaticFetcher::new();
        let items = fetcher.fetch(Category::Milestones).await.unwrap();
        assert!(items.is_empty());
    }
}
