use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::core::message::Message;

/// Maximum number of characters taken from the first user message for a title.
pub const TITLE_MAX_CHARS: usize = 30;

/// Title shown for chats that have not received a user message yet.
pub const UNTITLED_CHAT: &str = "New Chat";

/// Opaque chat identifier, unique for the lifetime of the stored data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(String);

impl ChatId {
    /// Build a fresh id from the current time and a random suffix.
    pub fn generate() -> Self {
        let mut suffix = [0u8; 4];
        if getrandom::fill(&mut suffix).is_err() {
            // Fall back to the sub-millisecond clock; the store still re-draws on collision.
            suffix = Utc::now().timestamp_subsec_nanos().to_le_bytes();
        }
        Self(format!(
            "{}-{:08x}",
            Utc::now().timestamp_millis(),
            u32::from_le_bytes(suffix)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ChatId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ChatId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One conversation thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: ChatId,
    /// Empty until the first appended message, if it came from the user.
    pub title: String,
    pub messages: Vec<Message>,
}

impl Chat {
    pub fn new(id: ChatId) -> Self {
        Self {
            id,
            title: String::new(),
            messages: Vec::new(),
        }
    }

    pub fn is_untitled(&self) -> bool {
        self.title.is_empty()
    }

    pub fn display_title(&self) -> &str {
        if self.is_untitled() {
            UNTITLED_CHAT
        } else {
            &self.title
        }
    }

    /// Append a message; the title is derived only from a first user message.
    pub(crate) fn push(&mut self, message: Message) {
        if self.messages.is_empty() && message.is_user() {
            self.title = title_from_content(&message.content);
        }
        self.messages.push(message);
    }
}

/// Truncate `content` to [`TITLE_MAX_CHARS`] characters, adding an ellipsis
/// only when something was cut off.
pub fn title_from_content(content: &str) -> String {
    let mut chars = content.chars();
    let mut title: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        title.push('…');
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_content_is_used_verbatim() {
        assert_eq!(title_from_content("Hi"), "Hi");
        assert_eq!(title_from_content(&"a".repeat(30)), "a".repeat(30));
    }

    #[test]
    fn long_content_is_truncated_by_characters() {
        let content = "é".repeat(31);
        let title = title_from_content(&content);
        assert_eq!(title.chars().count(), 31);
        assert!(title.ends_with('…'));
        assert!(title.starts_with(&"é".repeat(30)));
    }

    #[test]
    fn first_assistant_message_leaves_chat_untitled() {
        let mut chat = Chat::new(ChatId::from("c1"));
        chat.push(Message::assistant("Welcome"));
        chat.push(Message::user("Now a user message"));
        assert!(chat.is_untitled());
        assert_eq!(chat.display_title(), UNTITLED_CHAT);
    }

    #[test]
    fn generated_ids_differ() {
        let a = ChatId::generate();
        let b = ChatId::generate();
        assert_ne!(a, b);
    }
}
