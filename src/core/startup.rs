//! Turning configuration, flags and environment into a ready controller.

use std::env;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::api::anthropic::AnthropicBackend;
use crate::core::completion::CompletionClient;
use crate::core::config::{Config, ConfigError};
use crate::core::controller::SessionController;
use crate::core::persistence::{ChatPersistence, FileStorage};
use crate::utils::url::{is_http_url, normalize_base_url};

pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
pub const BASE_URL_ENV: &str = "ANTHROPIC_BASE_URL";

const MAX_TOKENS_FIXES: &[&str] = &[
    "chat-console --max-tokens 4096                  # Pick a limit for this run",
    "chat-console unset max-tokens                   # Fall back to the default",
];

const TIMEOUT_FIXES: &[&str] = &[
    "chat-console set request-timeout 120            # Seconds to wait for a reply",
    "chat-console unset request-timeout              # Fall back to the default",
];

const QUICK_FIXES: &[&str] = &[
    "export ANTHROPIC_API_KEY=sk-ant-...             # Credentials for the endpoint",
    "chat-console set base-url https://host/v1       # Use another compatible endpoint",
    "chat-console config                             # Show the effective configuration",
];

#[derive(Debug)]
pub struct StartupError {
    message: String,
    quick_fixes: &'static [&'static str],
    exit_code: i32,
}

impl StartupError {
    pub fn missing_api_key() -> Self {
        Self::new(
            format!("❌ {API_KEY_ENV} is not set\n\nExport your API key before starting a chat:\n   export {API_KEY_ENV}=\"your-api-key-here\""),
            QUICK_FIXES,
            2,
        )
    }

    pub fn invalid_base_url(url: &str) -> Self {
        Self::new(
            format!("❌ Base URL must start with http:// or https://, got '{url}'"),
            QUICK_FIXES,
            2,
        )
    }

    pub fn zero_setting(name: &str, fix: &'static [&'static str]) -> Self {
        Self::new(format!("❌ {name} must be greater than zero"), fix, 2)
    }

    pub fn http_client(err: reqwest::Error) -> Self {
        Self::new(format!("❌ Could not set up the HTTP client: {err}"), &[], 1)
    }

    pub fn storage(err: ConfigError) -> Self {
        Self::new(format!("❌ Could not locate chat storage: {err}"), &[], 1)
    }

    fn new(
        message: impl Into<String>,
        quick_fixes: &'static [&'static str],
        exit_code: i32,
    ) -> Self {
        Self {
            message: message.into(),
            quick_fixes,
            exit_code,
        }
    }

    pub fn quick_fixes(&self) -> &'static [&'static str] {
        self.quick_fixes
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Print the message and any quick fixes to stderr.
    pub fn print(&self) {
        eprintln!("{self}");
        if !self.quick_fixes.is_empty() {
            eprintln!();
            eprintln!("💡 Quick fixes:");
            for fix in self.quick_fixes {
                eprintln!("  • {fix}");
            }
        }
    }
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for StartupError {}

/// Values given on the command line; they win over the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
}

/// Everything needed to talk to the completion endpoint.
#[derive(Clone)]
pub struct ConnectionSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub request_timeout: Duration,
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Combine config, flags and the given credential sources.
pub fn resolve_connection(
    config: &Config,
    overrides: &Overrides,
    api_key: Option<String>,
    base_url_override: Option<String>,
) -> Result<ConnectionSettings, StartupError> {
    let api_key = api_key
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .ok_or_else(StartupError::missing_api_key)?;

    let base_url = base_url_override
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| config.base_url_or_default().to_string());
    if !is_http_url(&base_url) {
        return Err(StartupError::invalid_base_url(&base_url));
    }

    let model = overrides
        .model
        .clone()
        .filter(|model| !model.trim().is_empty())
        .unwrap_or_else(|| config.model_or_default().to_string());
    let max_tokens = overrides
        .max_tokens
        .unwrap_or_else(|| config.max_tokens_or_default());
    if max_tokens == 0 {
        return Err(StartupError::zero_setting("max-tokens", MAX_TOKENS_FIXES));
    }
    let request_timeout = config.request_timeout();
    if request_timeout.is_zero() {
        return Err(StartupError::zero_setting("request-timeout", TIMEOUT_FIXES));
    }

    Ok(ConnectionSettings {
        api_key,
        base_url: normalize_base_url(&base_url),
        model,
        max_tokens,
        request_timeout,
    })
}

/// [`resolve_connection`] with credentials taken from the environment.
pub fn resolve_env_connection(
    config: &Config,
    overrides: &Overrides,
) -> Result<ConnectionSettings, StartupError> {
    resolve_connection(
        config,
        overrides,
        env::var(API_KEY_ENV).ok(),
        env::var(BASE_URL_ENV).ok(),
    )
}

/// Chat storage on disk, or in memory for throwaway sessions.
pub fn open_persistence(config: &Config, ephemeral: bool) -> Result<ChatPersistence, StartupError> {
    if ephemeral {
        debug!("using in-memory chat storage");
        return Ok(ChatPersistence::in_memory());
    }
    let dir = config.data_dir().map_err(StartupError::storage)?;
    debug!(dir = %dir.display(), "using file chat storage");
    Ok(ChatPersistence::new(Box::new(FileStorage::new(dir))))
}

pub fn build_controller(
    settings: &ConnectionSettings,
    persistence: ChatPersistence,
) -> Result<SessionController, StartupError> {
    let backend = AnthropicBackend::new(
        settings.base_url.clone(),
        settings.api_key.clone(),
        settings.request_timeout,
    )
    .map_err(StartupError::http_client)?;
    debug!(?settings, "completion client ready");

    let client = CompletionClient::new(
        Arc::new(backend),
        settings.model.clone(),
        settings.max_tokens,
    );
    Ok(SessionController::new(persistence, client))
}
