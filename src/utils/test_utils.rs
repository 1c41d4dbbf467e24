use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::api::anthropic::extract_content_text;
use crate::api::CompletionRequest;
use crate::core::completion::{CompletionBackend, CompletionClient, CompletionError, ExtractionError};
use crate::core::controller::SessionController;
use crate::core::persistence::{ChatPersistence, KeyValueStorage};

/// Backend that replays queued replies in order and records every request.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<Value, CompletionError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_text(&self, text: &str) {
        self.push_raw(json!({ "content": [{ "type": "text", "text": text }] }));
    }

    pub fn push_raw(&self, raw: Value) {
        self.replies.lock().unwrap().push_back(Ok(raw));
    }

    pub fn push_error(&self, err: CompletionError) {
        self.replies.lock().unwrap().push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn request(&self, payload: &CompletionRequest) -> Result<Value, CompletionError> {
        self.requests.lock().unwrap().push(payload.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CompletionError::transport("no scripted reply")))
    }

    fn extract_text(&self, raw: &Value) -> Result<String, ExtractionError> {
        extract_content_text(raw)
    }
}

/// Storage whose writes always fail.
pub struct FailingStorage;

impl KeyValueStorage for FailingStorage {
    fn read(&self, _key: &str) -> io::Result<Option<String>> {
        Ok(None)
    }

    fn write(&self, _key: &str, _value: &str) -> io::Result<()> {
        Err(io::Error::other("disk full"))
    }
}

pub fn create_test_controller(backend: Arc<ScriptedBackend>) -> SessionController {
    create_test_controller_with(backend, ChatPersistence::in_memory())
}

pub fn create_test_controller_with(
    backend: Arc<ScriptedBackend>,
    persistence: ChatPersistence,
) -> SessionController {
    SessionController::new(persistence, CompletionClient::new(backend, "test-model", 256))
}
