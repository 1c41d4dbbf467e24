//! Durable mirror of the chat list.
//!
//! Storage is modelled as a tiny key-value interface so the session never
//! cares whether it is talking to files on disk or to memory. Two keys are
//! used: [`CHATS_KEY`] holds a JSON array of chats and [`PREFERENCES_KEY`]
//! holds display preferences.

use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::core::chat::{Chat, ChatId};
use crate::core::config::data::ThemeMode;
use crate::core::message::{Message, Role};

pub const CHATS_KEY: &str = "chats";
pub const PREFERENCES_KEY: &str = "preferences";

pub trait KeyValueStorage: Send + Sync {
    /// Returns `Ok(None)` when nothing has been stored under `key`.
    fn read(&self, key: &str) -> io::Result<Option<String>>;

    /// Replace the value stored under `key`.
    fn write(&self, key: &str, value: &str) -> io::Result<()>;
}

/// One `<key>.json` file per key inside a directory.
pub struct FileStorage {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| io::Error::other("storage lock poisoned"))?;

        fs::create_dir_all(&self.dir)?;
        let mut temp_file = NamedTempFile::new_in(&self.dir)?;
        temp_file.write_all(value.as_bytes())?;
        temp_file.as_file_mut().sync_all()?;
        temp_file
            .persist(self.path_for(key))
            .map_err(|err| err.error)?;
        Ok(())
    }
}

/// Keeps values for the lifetime of the process only.
#[derive(Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| io::Error::other("storage lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| io::Error::other("storage lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug)]
pub enum PersistenceError {
    Serialize {
        key: &'static str,
        source: serde_json::Error,
    },
    Write {
        key: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Serialize { key, source } => {
                write!(f, "Failed to encode {key}: {source}")
            }
            PersistenceError::Write { key, source } => {
                write!(f, "Failed to save {key}: {source}")
            }
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PersistenceError::Serialize { source, .. } => Some(source),
            PersistenceError::Write { source, .. } => Some(source),
        }
    }
}

/// Display preferences stored next to the chats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeMode>,
}

// Loading goes through these looser shapes so one bad role does not discard
// the whole history.
#[derive(Deserialize)]
struct StoredMessage {
    role: String,
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct StoredChat {
    id: ChatId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    messages: Vec<StoredMessage>,
}

impl From<StoredChat> for Chat {
    fn from(stored: StoredChat) -> Self {
        let messages = stored
            .messages
            .into_iter()
            .filter_map(|message| match Role::try_from(message.role.as_str()) {
                Ok(role) => Some(Message::new(role, message.content)),
                Err(err) => {
                    warn!(chat = %stored.id, "dropping stored message: {err}");
                    None
                }
            })
            .collect();
        Chat {
            id: stored.id,
            title: stored.title,
            messages,
        }
    }
}

pub struct ChatPersistence {
    storage: Box<dyn KeyValueStorage>,
}

impl ChatPersistence {
    pub fn new(storage: Box<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::new()))
    }

    /// Overwrite the stored chat list.
    pub fn save(&self, chats: &[Chat]) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(chats).map_err(|source| PersistenceError::Serialize {
            key: CHATS_KEY,
            source,
        })?;
        self.storage
            .write(CHATS_KEY, &json)
            .map_err(|source| PersistenceError::Write {
                key: CHATS_KEY,
                source,
            })?;
        debug!(chats = chats.len(), "chats saved");
        Ok(())
    }

    /// Last saved chat list; missing or unreadable data yields an empty list.
    pub fn load(&self) -> Vec<Chat> {
        let contents = match self.storage.read(CHATS_KEY) {
            Ok(Some(contents)) => contents,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!("could not read saved chats: {err}");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<StoredChat>>(&contents) {
            Ok(stored) => {
                let mut seen = HashSet::new();
                stored
                    .into_iter()
                    .filter(|chat| {
                        let first = seen.insert(chat.id.clone());
                        if !first {
                            warn!(chat = %chat.id, "dropping stored chat with duplicate id");
                        }
                        first
                    })
                    .map(Chat::from)
                    .collect()
            }
            Err(err) => {
                warn!("ignoring unparsable saved chats: {err}");
                Vec::new()
            }
        }
    }

    pub fn save_preferences(&self, preferences: &Preferences) -> Result<(), PersistenceError> {
        let json =
            serde_json::to_string(preferences).map_err(|source| PersistenceError::Serialize {
                key: PREFERENCES_KEY,
                source,
            })?;
        self.storage
            .write(PREFERENCES_KEY, &json)
            .map_err(|source| PersistenceError::Write {
                key: PREFERENCES_KEY,
                source,
            })
    }

    pub fn load_preferences(&self) -> Preferences {
        match self.storage.read(PREFERENCES_KEY) {
            Ok(Some(contents)) => serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!("ignoring unparsable preferences: {err}");
                Preferences::default()
            }),
            Ok(None) => Preferences::default(),
            Err(err) => {
                warn!("could not read preferences: {err}");
                Preferences::default()
            }
        }
    }
}
