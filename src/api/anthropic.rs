//! HTTP backend for the Anthropic messages endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::{CompletionRequest, CompletionResponse, ANTHROPIC_VERSION};
use crate::core::completion::{CompletionBackend, CompletionError, ExtractionError};
use crate::utils::url::construct_api_url;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";

pub struct AnthropicBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AnthropicBackend {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, api_key))
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn endpoint(&self) -> String {
        construct_api_url(&self.base_url, "messages")
    }
}

/// Add the headers the messages endpoint requires.
pub fn add_auth_headers(request: reqwest::RequestBuilder, api_key: &str) -> reqwest::RequestBuilder {
    request
        .header("x-api-key", api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
}

fn describe_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("Request timed out: {err}")
    } else if err.is_connect() {
        format!("Could not connect: {err}")
    } else {
        format!("Request failed: {err}")
    }
}

/// Read the first text block of a messages reply.
pub fn extract_content_text(raw: &Value) -> Result<String, ExtractionError> {
    let response = CompletionResponse::deserialize(raw)
        .map_err(|err| ExtractionError::new(format!("Malformed response: {err}")))?;
    response
        .content
        .into_iter()
        .find(|block| block.kind.as_deref().is_none_or(|kind| kind == "text"))
        .and_then(|block| block.text)
        .ok_or_else(|| ExtractionError::new("Response did not contain any assistant text"))
}

#[async_trait]
impl CompletionBackend for AnthropicBackend {
    async fn request(&self, payload: &CompletionRequest) -> Result<Value, CompletionError> {
        let url = self.endpoint();
        debug!(%url, "sending messages request");

        let request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json");
        let response = add_auth_headers(request, &self.api_key)
            .json(payload)
            .send()
            .await
            .map_err(|err| CompletionError::transport(describe_transport_error(&err)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| CompletionError::transport(describe_transport_error(&err)))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "completion request rejected");
            return Err(CompletionError::from_http_status(status.as_u16(), &body));
        }

        serde_json::from_str(&body)
            .map_err(|err| CompletionError::bad_response(format!("Response was not JSON: {err}")))
    }

    fn extract_text(&self, raw: &Value) -> Result<String, ExtractionError> {
        extract_content_text(raw)
    }
}
