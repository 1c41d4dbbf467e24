//! Session controller: the only place user actions turn into state changes.
//!
//! A send goes through three steps. [`SessionController::begin_send`] checks
//! the guards, makes sure a chat is active, appends the user's message and
//! saves it straight away. The caller then runs the completion (inline via
//! [`SessionController::send_message`], or on a background task in the
//! terminal UI) and hands the result to [`SessionController::finish_send`],
//! which appends the reply or records the error and returns to idle.

use std::error::Error;
use std::fmt;

use tracing::{debug, info, warn};

use crate::core::chat::ChatId;
use crate::core::completion::{CompletionClient, CompletionError};
use crate::core::config::data::ThemeMode;
use crate::core::message::{Attachment, Message};
use crate::core::persistence::{ChatPersistence, Preferences};
use crate::core::session::{ErrorInfo, Session};
use crate::core::store::{ChatStore, StoreError};


pub const EMPTY_MESSAGE_NOTICE: &str = "Type a message or attach a file before sending.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    /// A completion is in flight; the action was ignored.
    Busy,
    /// Nothing to send.
    Validation(String),
    /// The chat id does not exist.
    NotFound(ChatId),
    /// The completion failed; the user's message stays in the transcript.
    Completion(CompletionError),
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerError::Busy => f.write_str("Still waiting for the previous reply"),
            ControllerError::Validation(message) => f.write_str(message),
            ControllerError::NotFound(id) => write!(f, "chat {id} does not exist"),
            ControllerError::Completion(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ControllerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ControllerError::Completion(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for ControllerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ControllerError::NotFound(id),
        }
    }
}

/// Everything a completion needs, captured when the send began.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCompletion {
    pub chat_id: ChatId,
    pub history: Vec<Message>,
    pub attachments: Vec<Attachment>,
}

pub struct SessionController {
    session: Session,
    persistence: ChatPersistence,
    client: CompletionClient,
    preferences: Preferences,
}

impl SessionController {
    /// Restore saved chats and preferences. No chat is active afterwards.
    pub fn new(persistence: ChatPersistence, client: CompletionClient) -> Self {
        let chats = persistence.load();
        let preferences = persistence.load_preferences();
        info!(chats = chats.len(), "session restored");
        Self {
            session: Session::new(ChatStore::from_chats(chats)),
            persistence,
            client,
            preferences,
        }
    }

    /// Read-only view of the current state.
    pub fn snapshot(&self) -> &Session {
        &self.session
    }

    pub fn completion_client(&self) -> &CompletionClient {
        &self.client
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    fn ensure_idle(&self) -> Result<(), ControllerError> {
        if self.session.is_sending {
            Err(ControllerError::Busy)
        } else {
            Ok(())
        }
    }

    fn persist_chats(&mut self) {
        if let Err(err) = self.persistence.save(self.session.chats.chats()) {
            warn!("{err}");
            self.session.last_error = Some(ErrorInfo::persistence(&err));
        }
    }

    pub fn start_new_chat(&mut self) -> Result<ChatId, ControllerError> {
        self.ensure_idle()?;
        let id = self.session.chats.create_chat().id.clone();
        self.session.active_chat_id = Some(id.clone());
        debug!(chat = %id, "started new chat");
        self.persist_chats();
        Ok(id)
    }

    pub fn select_chat(&mut self, id: &ChatId) -> Result<(), ControllerError> {
        self.ensure_idle()?;
        let id = self.session.chats.select_chat(id)?;
        debug!(chat = %id, "selected chat");
        self.session.active_chat_id = Some(id);
        Ok(())
    }

    pub fn set_draft_input(&mut self, text: impl Into<String>) -> Result<(), ControllerError> {
        self.ensure_idle()?;
        self.session.draft_input = text.into();
        Ok(())
    }

    /// Queue a file for the next message, replacing one with the same name.
    pub fn add_attachment(&mut self, file: Attachment) -> Result<(), ControllerError> {
        self.ensure_idle()?;
        self.session
            .pending_files
            .retain(|existing| existing.name != file.name);
        debug!(name = %file.name, bytes = file.content.len(), "attachment added");
        self.session.pending_files.push(file);
        Ok(())
    }

    /// Drop the queued file called `name`; returns whether one was removed.
    pub fn remove_attachment(&mut self, name: &str) -> Result<bool, ControllerError> {
        self.ensure_idle()?;
        let before = self.session.pending_files.len();
        self.session.pending_files.retain(|file| file.name != name);
        Ok(self.session.pending_files.len() != before)
    }

    pub fn dismiss_error(&mut self) {
        self.session.last_error = None;
    }

    pub fn set_theme(&mut self, theme: ThemeMode) {
        self.preferences.theme = Some(theme);
        if let Err(err) = self.persistence.save_preferences(&self.preferences) {
            warn!("{err}");
            self.session.last_error = Some(ErrorInfo::persistence(&err));
        }
    }

    /// Flip away from the theme currently on screen and remember the choice.
    pub fn toggle_theme(&mut self, current: ThemeMode) -> ThemeMode {
        let next = current.toggled();
        self.set_theme(next);
        next
    }

    /// Make sure there is an active chat, creating and activating one if not.
    fn ensure_active_chat(&mut self) -> ChatId {
        if let Some(id) = self
            .session
            .active_chat_id
            .as_ref()
            .filter(|id| self.session.chats.contains(id))
        {
            return id.clone();
        }
        let id = self.session.chats.create_chat().id.clone();
        debug!(chat = %id, "created chat for first message");
        self.session.active_chat_id = Some(id.clone());
        id
    }

    /// Validate the draft and commit the user's message before any network
    /// traffic happens.
    pub fn begin_send(&mut self) -> Result<PendingCompletion, ControllerError> {
        if self.session.is_sending {
            debug!("send ignored: completion already in flight");
            return Err(ControllerError::Busy);
        }

        let text = self.session.draft_input.clone();
        let attachments = self.session.pending_files.clone();
        if text.trim().is_empty() && attachments.is_empty() {
            self.session.last_error = Some(ErrorInfo::validation(EMPTY_MESSAGE_NOTICE));
            return Err(ControllerError::Validation(EMPTY_MESSAGE_NOTICE.to_string()));
        }

        self.session.last_error = None;
        let content = if text.trim().is_empty() {
            attachment_only_content(&attachments)
        } else {
            text
        };

        let chat_id = self.ensure_active_chat();
        debug_assert!(
            self.session.chats.contains(&chat_id),
            "ensure_active_chat returned an unknown chat"
        );
        let history = self
            .session
            .chats
            .append_message(&chat_id, Message::user(content))?
            .messages
            .clone();
        self.persist_chats();
        self.session.is_sending = true;

        debug!(chat = %chat_id, turns = history.len(), "send started");
        Ok(PendingCompletion {
            chat_id,
            history,
            attachments,
        })
    }

    /// Reconcile a finished completion into the chat it was started from.
    pub fn finish_send(
        &mut self,
        pending: PendingCompletion,
        result: Result<String, CompletionError>,
    ) -> Result<String, ControllerError> {
        let outcome = match result {
            Ok(text) => {
                match self
                    .session
                    .chats
                    .append_message(&pending.chat_id, Message::assistant(text.clone()))
                {
                    Ok(_) => {
                        self.persist_chats();
                        Ok(text)
                    }
                    Err(err) => {
                        warn!(chat = %pending.chat_id, "reply for unknown chat: {err}");
                        self.session.last_error = Some(ErrorInfo::missing_chat(&pending.chat_id));
                        Err(ControllerError::from(err))
                    }
                }
            }
            Err(err) => {
                warn!(kind = ?err.kind, "completion failed: {}", err.message);
                self.session.last_error = Some(ErrorInfo::completion(&err));
                Err(ControllerError::Completion(err))
            }
        };

        self.session.draft_input.clear();
        self.session.pending_files.clear();
        self.session.is_sending = false;
        outcome
    }

    /// Send the current draft and wait for the reply.
    pub async fn send_message(&mut self) -> Result<String, ControllerError> {
        let pending = self.begin_send()?;
        let result = self
            .client
            .complete(&pending.history, &pending.attachments)
            .await;
        self.finish_send(pending, result)
    }
}

/// Transcript text for a message that consists only of attachments.
fn attachment_only_content(attachments: &[Attachment]) -> String {
    let names = attachments
        .iter()
        .map(|file| file.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!("(attached: {names})")
}
