use crate::core::chat::{Chat, ChatId};
use crate::core::completion::{CompletionError, CompletionErrorKind};
use crate::core::message::Attachment;
use crate::core::persistence::PersistenceError;
use crate::core::store::ChatStore;

/// Which part of the system produced the error shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Completion(CompletionErrorKind),
    Persistence,
    /// A finished send pointed at a chat that is not in the store.
    MissingChat,
}

/// Transient error text for the status line. Never written to a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorInfo {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            message: message.into(),
        }
    }

    pub fn completion(err: &CompletionError) -> Self {
        Self {
            kind: ErrorKind::Completion(err.kind),
            message: err.to_string(),
        }
    }

    pub fn missing_chat(id: &ChatId) -> Self {
        Self {
            kind: ErrorKind::MissingChat,
            message: format!("The reply was dropped: chat {id} no longer exists."),
        }
    }

    pub fn persistence(err: &PersistenceError) -> Self {
        Self {
            kind: ErrorKind::Persistence,
            message: format!("{err}. Changes may not survive a restart."),
        }
    }
}

/// Everything the running console knows. Owned by the session controller;
/// the UI only ever sees it through a shared reference.
#[derive(Debug, Default)]
pub struct Session {
    pub(crate) chats: ChatStore,
    pub(crate) active_chat_id: Option<ChatId>,
    pub(crate) draft_input: String,
    pub(crate) pending_files: Vec<Attachment>,
    pub(crate) is_sending: bool,
    pub(crate) last_error: Option<ErrorInfo>,
}

impl Session {
    pub fn new(chats: ChatStore) -> Self {
        Self {
            chats,
            ..Default::default()
        }
    }

    pub fn chats(&self) -> &ChatStore {
        &self.chats
    }

    pub fn active_chat_id(&self) -> Option<&ChatId> {
        self.active_chat_id.as_ref()
    }

    pub fn active_chat(&self) -> Option<&Chat> {
        self.active_chat_id
            .as_ref()
            .and_then(|id| self.chats.get(id))
    }

    pub fn draft_input(&self) -> &str {
        &self.draft_input
    }

    pub fn pending_files(&self) -> &[Attachment] {
        &self.pending_files
    }

    pub fn is_sending(&self) -> bool {
        self.is_sending
    }

    pub fn last_error(&self) -> Option<&ErrorInfo> {
        self.last_error.as_ref()
    }

    /// Id of the chat `step` places away from the active one in list order.
    ///
    /// With no active chat, stepping forward starts at the top of the list and
    /// stepping backward at the bottom. Steps are clamped to the list bounds.
    pub fn adjacent_chat_id(&self, step: isize) -> Option<ChatId> {
        let chats = self.chats.chats();
        if chats.is_empty() {
            return None;
        }
        let last = chats.len() as isize - 1;
        let target = match self
            .active_chat_id
            .as_ref()
            .and_then(|id| self.chats.position(id))
        {
            Some(current) => (current as isize + step).clamp(0, last),
            None if step >= 0 => 0,
            None => last,
        };
        Some(chats[target as usize].id.clone())
    }
}
