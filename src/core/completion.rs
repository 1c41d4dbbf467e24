//! Turning a chat history into a single completion round trip.
//!
//! [`CompletionClient`] owns the request shape that is common to every
//! backend (history, token budget, attachment context) and normalizes every
//! failure into a [`CompletionError`]. The vendor specific part, sending the
//! payload and finding the assistant text in the reply, sits behind the
//! [`CompletionBackend`] trait so it can be swapped out in tests.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::api::{summarize_error_body, ChatMessage, CompletionRequest};
use crate::core::message::{Attachment, Message};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionErrorKind {
    /// No response at all: connection, DNS, TLS or timeout failures.
    Transport,
    /// The endpoint rejected the credentials.
    Unauthorized,
    /// The endpoint is throttling requests.
    RateLimited,
    /// A success status whose payload has no assistant text.
    BadResponse,
    /// Every other non-success status.
    ServerError,
}

impl CompletionErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => CompletionErrorKind::Unauthorized,
            429 => CompletionErrorKind::RateLimited,
            _ => CompletionErrorKind::ServerError,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CompletionErrorKind::Transport => "Connection error",
            CompletionErrorKind::Unauthorized => "Unauthorized",
            CompletionErrorKind::RateLimited => "Rate limited",
            CompletionErrorKind::BadResponse => "Unexpected response",
            CompletionErrorKind::ServerError => "Server error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionError {
    pub kind: CompletionErrorKind,
    pub message: String,
}

impl CompletionError {
    pub fn new(kind: CompletionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(CompletionErrorKind::Transport, message)
    }

    pub fn bad_response(message: impl Into<String>) -> Self {
        Self::new(CompletionErrorKind::BadResponse, message)
    }

    /// Classify a non-success HTTP reply, preferring the message in its body.
    pub fn from_http_status(status: u16, body: &str) -> Self {
        let message =
            summarize_error_body(body).unwrap_or_else(|| format!("HTTP error! status: {status}"));
        Self::new(CompletionErrorKind::from_status(status), message)
    }
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.label(), self.message)
    }
}

impl Error for CompletionError {}

/// The reply parsed but did not contain assistant text where expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionError {
    pub reason: String,
}

impl ExtractionError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

impl Error for ExtractionError {}

impl From<ExtractionError> for CompletionError {
    fn from(err: ExtractionError) -> Self {
        CompletionError::bad_response(err.reason)
    }
}

/// Vendor adapter used by [`CompletionClient`].
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Perform exactly one round trip and return the decoded JSON reply.
    async fn request(&self, payload: &CompletionRequest) -> Result<Value, CompletionError>;

    /// Locate the assistant text in a successful reply.
    fn extract_text(&self, raw: &Value) -> Result<String, ExtractionError>;
}

/// Build the system prompt that carries attached files, if there are any.
pub fn attachment_context(attachments: &[Attachment]) -> Option<String> {
    if attachments.is_empty() {
        return None;
    }

    let names = attachments
        .iter()
        .map(|file| file.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let contents = attachments
        .iter()
        .map(|file| format!("{}: {}", file.name, file.content))
        .collect::<Vec<_>>()
        .join("\n");

    Some(format!(
        "The user has provided the following files: {names}.\nFile contents:\n{contents}"
    ))
}

#[derive(Clone)]
pub struct CompletionClient {
    backend: Arc<dyn CompletionBackend>,
    model: String,
    max_tokens: u32,
}

impl CompletionClient {
    pub fn new(backend: Arc<dyn CompletionBackend>, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            backend,
            model: model.into(),
            max_tokens,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn build_request(&self, history: &[Message], attachments: &[Attachment]) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: history.iter().map(ChatMessage::from).collect(),
            system: attachment_context(attachments),
        }
    }

    pub async fn complete(
        &self,
        history: &[Message],
        attachments: &[Attachment],
    ) -> Result<String, CompletionError> {
        let request = self.build_request(history, attachments);
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            attachments = attachments.len(),
            "requesting completion"
        );

        let raw = self.backend.request(&request).await?;
        let text = self.backend.extract_text(&raw)?;
        debug!(chars = text.chars().count(), "completion received");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::ScriptedBackend;

    #[test]
    fn status_codes_map_to_kinds() {
        assert_eq!(CompletionErrorKind::from_status(401), CompletionErrorKind::Unauthorized);
        assert_eq!(CompletionErrorKind::from_status(403), CompletionErrorKind::Unauthorized);
        assert_eq!(CompletionErrorKind::from_status(429), CompletionErrorKind::RateLimited);
        assert_eq!(CompletionErrorKind::from_status(400), CompletionErrorKind::ServerError);
        assert_eq!(CompletionErrorKind::from_status(500), CompletionErrorKind::ServerError);
        assert_eq!(CompletionErrorKind::from_status(529), CompletionErrorKind::ServerError);
    }

    #[test]
    fn http_errors_prefer_body_message() {
        let body = r#"{"type":"error","error":{"type":"rate_limit_error","message":"Slow   down"}}"#;
        let err = CompletionError::from_http_status(429, body);
        assert_eq!(err.kind, CompletionErrorKind::RateLimited);
        assert_eq!(err.message, "Slow down");
    }

    #[test]
    fn http_errors_fall_back_to_status() {
        let err = CompletionError::from_http_status(502, "<html>bad gateway</html>");
        assert_eq!(err.kind, CompletionErrorKind::ServerError);
        assert_eq!(err.message, "HTTP error! status: 502");
    }

    #[test]
    fn no_attachments_means_no_system_prompt() {
        assert_eq!(attachment_context(&[]), None);
    }

    #[test]
    fn attachments_are_listed_then_concatenated() {
        let files = vec![
            Attachment::new("a.txt", "alpha"),
            Attachment::new("b.rs", "fn main() {}\n"),
        ];
        let context = attachment_context(&files).unwrap();
        assert_eq!(
            context,
            "The user has provided the following files: a.txt, b.rs.\nFile contents:\na.txt: alpha\nb.rs: fn main() {}\n"
        );
    }

    #[test]
    fn request_carries_history_verbatim() {
        let backend = Arc::new(ScriptedBackend::new());
        let client = CompletionClient::new(backend, "test-model", 64);
        let history = vec![Message::user("  Hi \n"), Message::assistant("Hello!")];

        let request = client.build_request(&history, &[]);
        assert_eq!(request.model, "test-model");
        assert_eq!(request.max_tokens, 64);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "user");
        assert_eq!(request.messages[0].content, "  Hi \n");
        assert_eq!(request.messages[1].role, "assistant");
        assert!(request.system.is_none());
    }

    #[tokio::test]
    async fn complete_returns_text_untouched() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_text("  spaced reply\n");
        let client = CompletionClient::new(backend.clone(), "m", 16);

        let text = client.complete(&[Message::user("hi")], &[]).await.unwrap();
        assert_eq!(text, "  spaced reply\n");
        assert_eq!(backend.requests().len(), 1);
    }

    #[tokio::test]
    async fn missing_text_is_a_bad_response() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_raw(serde_json::json!({ "content": [] }));
        let client = CompletionClient::new(backend, "m", 16);

        let err = client.complete(&[Message::user("hi")], &[]).await.unwrap_err();
        assert_eq!(err.kind, CompletionErrorKind::BadResponse);
    }

    #[tokio::test]
    async fn backend_errors_pass_through_without_retry() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_error(CompletionError::transport("connection refused"));
        let client = CompletionClient::new(backend.clone(), "m", 16);

        let err = client.complete(&[Message::user("hi")], &[]).await.unwrap_err();
        assert_eq!(err.kind, CompletionErrorKind::Transport);
        assert_eq!(backend.requests().len(), 1);
    }
}
