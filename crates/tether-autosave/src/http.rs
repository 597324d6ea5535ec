//! HTTP draft store
//!
//! Wraps a `reqwest::Client` pointed at the task API. Each save is one
//! `POST {base_url}/tasks/{taskId}/save`. Retries are NOT built in: a failed
//! save surfaces to the engine, which waits for the next edit or an explicit
//! save before trying again.

use crate::store::{DraftStore, SaveDraftRequest, SaveReceipt};
use crate::wire::{SaveDraftBody, SaveDraftResponse};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;
use std::time::Duration;
use tether_core::SaveError;

/// Longest response body excerpt kept in a `SaveError::Status`
const BODY_EXCERPT_LEN: usize = 512;

/// Configuration for [`HttpDraftStore`]
#[derive(Debug, Clone)]
pub struct HttpStoreConfig {
    /// Base URL of the task API (e.g. `https://api.example.com/v1`)
    pub base_url: String,
    /// Bearer token sent with every request
    pub api_token: Option<String>,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl HttpStoreConfig {
    /// Create a new configuration with default timeout and no token
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: None,
            timeout_secs: 30,
        }
    }

    /// With bearer token
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// With request timeout
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Draft store backed by the task REST API
#[derive(Debug, Clone)]
pub struct HttpDraftStore {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpDraftStore {
    /// Build the client
    ///
    /// # Errors
    /// `SaveError::InvalidEndpoint` if the base URL or token is malformed,
    /// `SaveError::Transport` if the client cannot be built
    pub fn new(config: HttpStoreConfig) -> Result<Self, SaveError> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| SaveError::InvalidEndpoint(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(SaveError::InvalidEndpoint(format!(
                "{} cannot be used as a base URL",
                config.base_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = &config.api_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| SaveError::InvalidEndpoint("invalid API token characters".into()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| SaveError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Endpoint for one task's save call
    ///
    /// # Errors
    /// `SaveError::InvalidEndpoint` if the base URL cannot take path segments
    pub fn save_url(&self, task_id: &str) -> Result<Url, SaveError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SaveError::InvalidEndpoint(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["tasks", task_id, "save"]);
        Ok(url)
    }
}

#[async_trait]
impl DraftStore for HttpDraftStore {
    async fn save_draft(&self, request: &SaveDraftRequest) -> Result<SaveReceipt, SaveError> {
        let url = self.save_url(request.task_id.as_str())?;
        let body = SaveDraftBody {
            draft_data: &request.draft,
            business_id: request.business_id.as_deref(),
        };

        tracing::debug!(task = %request.task_id, %url, "sending draft save");

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SaveError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SaveError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(SaveError::Status {
                status: status.as_u16(),
                body: excerpt(&text),
            });
        }

        SaveDraftResponse::parse(&text)
    }
}

fn excerpt(body: &str) -> String {
    match body.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
