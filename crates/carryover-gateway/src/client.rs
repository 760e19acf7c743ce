//! reqwest-backed gateway.

use async_trait::async_trait;
use carryover_config::GatewayConfig;
use carryover_protocols::{ContextError, DEFAULT_WORD_LIMIT};
use reqwest::{Client, StatusCode, header};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::backend::ContextBackend;
use crate::error::GatewayError;

/// Fields that may carry the text of a successful response, in priority order.
pub const PAYLOAD_FIELDS: &[&str] = &["summary", "extracted_text", "scraped", "output", "result"];

/// Body of `POST /scrape`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeRequest {
    pub url: String,
    #[serde(default)]
    pub summarize: bool,
    #[serde(default = "default_word_limit")]
    pub word_limit: u32,
}

fn default_word_limit() -> u32 {
    DEFAULT_WORD_LIMIT
}

impl ScrapeRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            summarize: false,
            word_limit: DEFAULT_WORD_LIMIT,
        }
    }

    pub fn with_summarize(mut self, summarize: bool) -> Self {
        self.summarize = summarize;
        self
    }

    pub fn with_word_limit(mut self, word_limit: u32) -> Self {
        self.word_limit = word_limit;
        self
    }
}

#[derive(Debug, Serialize)]
struct SummarizeBody<'a> {
    raw_conversation: &'a str,
}

/// Client for the context service.
#[derive(Debug, Clone)]
pub struct BackendGateway {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl BackendGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| GatewayError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /summarize-conversation`.
    pub async fn request_summary(&self, raw_conversation: &str) -> Result<String, GatewayError> {
        let body = SummarizeBody { raw_conversation };
        self.post_json("/summarize-conversation", &body, "summarize").await
    }

    /// `POST /scrape`.
    pub async fn request_scrape(&self, request: &ScrapeRequest) -> Result<String, GatewayError> {
        self.post_json("/scrape", request, "scrape").await
    }

    fn send_error(&self, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout {
                base_url: self.base_url.clone(),
                timeout_secs: self.timeout_secs,
            }
        } else if err.is_builder() {
            GatewayError::Client(err.to_string())
        } else {
            GatewayError::Unreachable {
                base_url: self.base_url.clone(),
            }
        }
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        operation: &str,
    ) -> Result<String, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!("{} request to {} failed: {}", operation, url, e);
                self.send_error(e)
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| {
                GatewayError::Malformed(format!("{} response body unreadable: {}", operation, e))
            })?;

        let result = classify(status, &text, operation);
        match &result {
            Ok(payload) => info!(
                operation,
                status = status.as_u16(),
                chars = payload.chars().count(),
                "context service answered"
            ),
            Err(e) => warn!(operation, status = status.as_u16(), "context service failed: {}", e),
        }
        result
    }
}

#[async_trait]
impl ContextBackend for BackendGateway {
    async fn summarize(&self, raw_conversation: &str) -> Result<String, ContextError> {
        Ok(self.request_summary(raw_conversation).await?)
    }

    async fn scrape(&self, request: &ScrapeRequest) -> Result<String, ContextError> {
        Ok(self.request_scrape(request).await?)
    }
}

/// Classify a finished HTTP exchange.
pub(crate) fn classify(status: StatusCode, body: &str, operation: &str) -> Result<String, GatewayError> {
    if status.is_server_error() {
        return Err(GatewayError::Server {
            status: status.as_u16(),
            message: server_message(status, body),
        });
    }
    if !status.is_success() {
        return Err(GatewayError::Http {
            status: status.as_u16(),
        });
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|e| GatewayError::Malformed(format!("{} response is not JSON: {}", operation, e)))?;
    if !value.is_object() {
        return Err(GatewayError::Malformed(format!(
            "{} response is not a JSON object",
            operation
        )));
    }

    payload_text(&value)
        .map(str::to_string)
        .ok_or_else(|| GatewayError::Empty(format!("{} returned no text", operation)))
}

/// First non-blank string among [`PAYLOAD_FIELDS`].
fn payload_text(value: &Value) -> Option<&str> {
    PAYLOAD_FIELDS
        .iter()
        .filter_map(|field| value.get(field).and_then(Value::as_str))
        .find(|text| !text.trim().is_empty())
}

/// The server's own explanation (`detail` or `message`), else the raw body.
fn server_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        ["detail", "message"]
            .iter()
            .find_map(|key| v.get(key).and_then(Value::as_str).map(str::to_string))
    });

    match from_json {
        Some(message) => message,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status.canonical_reason().unwrap_or("unknown error").to_string(),
    }
}
