//! In-memory chat collection.
//!
//! The store keeps chats most-recent-first and exposes the only mutations the
//! rest of the application may perform on them: creating a chat and appending
//! a message. Nothing here touches the disk or the network; callers commit the
//! result into the session and persist it.

use std::error::Error;
use std::fmt;

use crate::core::chat::{Chat, ChatId};
use crate::core::message::Message;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound(ChatId),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "chat {id} does not exist"),
        }
    }
}

impl Error for StoreError {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatStore {
    chats: Vec<Chat>,
}

impl ChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap chats loaded from storage, which are already most-recent-first.
    pub fn from_chats(chats: Vec<Chat>) -> Self {
        Self { chats }
    }

    pub fn into_chats(self) -> Vec<Chat> {
        self.chats
    }

    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chat> {
        self.chats.iter()
    }

    pub fn len(&self) -> usize {
        self.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }

    pub fn contains(&self, id: &ChatId) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: &ChatId) -> Option<&Chat> {
        self.chats.iter().find(|chat| &chat.id == id)
    }

    pub fn position(&self, id: &ChatId) -> Option<usize> {
        self.chats.iter().position(|chat| &chat.id == id)
    }

    /// Allocate an empty chat with a fresh id and put it at the front.
    ///
    /// The new chat is not made active; that is the session's decision.
    pub fn create_chat(&mut self) -> &Chat {
        let mut id = ChatId::generate();
        while self.contains(&id) {
            id = ChatId::generate();
        }
        self.chats.insert(0, Chat::new(id));
        &self.chats[0]
    }

    pub fn append_message(&mut self, id: &ChatId, message: Message) -> Result<&Chat, StoreError> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let chat = &mut self.chats[index];
        chat.push(message);
        Ok(chat)
    }

    /// Validate that `id` may become the active chat.
    pub fn select_chat(&self, id: &ChatId) -> Result<ChatId, StoreError> {
        if self.contains(id) {
            Ok(id.clone())
        } else {
            Err(StoreError::NotFound(id.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Role;

    #[test]
    fn create_chat_inserts_most_recent_first() {
        let mut store = ChatStore::new();
        let first = store.create_chat().id.clone();
        let second = store.create_chat().id.clone();

        assert_ne!(first, second);
        let order: Vec<_> = store.iter().map(|chat| chat.id.clone()).collect();
        assert_eq!(order, vec![second, first]);
    }

    #[test]
    fn created_chat_is_empty_and_untitled() {
        let mut store = ChatStore::new();
        let chat = store.create_chat();
        assert!(chat.messages.is_empty());
        assert!(chat.is_untitled());
    }

    #[test]
    fn append_sets_title_only_once() {
        let mut store = ChatStore::new();
        let id = store.create_chat().id.clone();

        store
            .append_message(&id, Message::user("What is the capital of France, roughly?"))
            .unwrap();
        let title = store.get(&id).unwrap().title.clone();
        assert_eq!(title, "What is the capital of France,…");

        store.append_message(&id, Message::assistant("Paris.")).unwrap();
        store.append_message(&id, Message::user("And Spain?")).unwrap();
        assert_eq!(store.get(&id).unwrap().title, title);
    }

    #[test]
    fn appends_preserve_insertion_order() {
        let mut store = ChatStore::new();
        let id = store.create_chat().id.clone();
        let mut lengths = Vec::new();
        for (i, content) in ["a", "b", "c", "d"].iter().enumerate() {
            let message = if i % 2 == 0 {
                Message::user(*content)
            } else {
                Message::assistant(*content)
            };
            lengths.push(store.append_message(&id, message).unwrap().messages.len());
        }

        assert_eq!(lengths, vec![1, 2, 3, 4]);
        let chat = store.get(&id).unwrap();
        let roles: Vec<_> = chat.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
        );
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let mut store = ChatStore::new();
        let missing = ChatId::from("missing");

        assert_eq!(
            store.append_message(&missing, Message::user("hi")),
            Err(StoreError::NotFound(missing.clone()))
        );
        assert_eq!(
            store.select_chat(&missing),
            Err(StoreError::NotFound(missing.clone()))
        );
    }

    #[test]
    fn select_chat_returns_existing_id() {
        let mut store = ChatStore::new();
        let id = store.create_chat().id.clone();
        assert_eq!(store.select_chat(&id), Ok(id));
    }
}
