//! One handler per configuration key.

use std::path::PathBuf;

use crate::cli::settings::error::SettingError;
use crate::cli::settings::SettingHandler;
use crate::core::config::data::{path_display, Config, ThemeMode};
use crate::utils::url::{is_http_url, normalize_base_url};

fn success_set(key: &str, value: &str) -> String {
    format!("✅ Set {key} to: {value}")
}

fn success_unset(key: &str) -> String {
    format!("✅ Unset {key} (will use default)")
}

fn single_value<'a>(
    args: &'a [String],
    hint: &'static str,
    example: &'static str,
) -> Result<&'a str, SettingError> {
    match args {
        [value] if !value.trim().is_empty() => Ok(value.trim()),
        _ => Err(SettingError::MissingArgs { hint, example }),
    }
}

fn parse_positive<T>(key: &'static str, input: &str) -> Result<T, SettingError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match input.parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => Err(SettingError::InvalidValue {
            key,
            input: input.to_string(),
            reason: "expected a whole number greater than zero".to_string(),
        }),
    }
}

/// Handler for the `model` setting.
pub struct ModelHandler;

impl SettingHandler for ModelHandler {
    fn key(&self) -> &'static str {
        "model"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let model = single_value(
            args,
            "To set the default model, give its name:",
            "chat-console set model claude-3-haiku-20240307",
        )?;
        config.model = Some(model.to_string());
        Ok(success_set(self.key(), model))
    }

    fn unset(&self, config: &mut Config) -> String {
        config.model = None;
        success_unset(self.key())
    }
}

/// Handler for the `max-tokens` setting.
pub struct MaxTokensHandler;

impl SettingHandler for MaxTokensHandler {
    fn key(&self) -> &'static str {
        "max-tokens"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let input = single_value(
            args,
            "To cap reply length, give a token count:",
            "chat-console set max-tokens 1024",
        )?;
        let max_tokens: u32 = parse_positive(self.key(), input)?;
        config.max_tokens = Some(max_tokens);
        Ok(success_set(self.key(), &max_tokens.to_string()))
    }

    fn unset(&self, config: &mut Config) -> String {
        config.max_tokens = None;
        success_unset(self.key())
    }
}

/// Handler for the `base-url` setting.
pub struct BaseUrlHandler;

impl SettingHandler for BaseUrlHandler {
    fn key(&self) -> &'static str {
        "base-url"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let input = single_value(
            args,
            "To use another endpoint, give its base URL:",
            "chat-console set base-url https://api.anthropic.com/v1",
        )?;
        if !is_http_url(input) {
            return Err(SettingError::InvalidValue {
                key: self.key(),
                input: input.to_string(),
                reason: "the URL must start with http:// or https://".to_string(),
            });
        }
        let base_url = normalize_base_url(input);
        let message = success_set(self.key(), &base_url);
        config.base_url = Some(base_url);
        Ok(message)
    }

    fn unset(&self, config: &mut Config) -> String {
        config.base_url = None;
        success_unset(self.key())
    }
}

/// Handler for the `theme` setting.
pub struct ThemeHandler;

impl SettingHandler for ThemeHandler {
    fn key(&self) -> &'static str {
        "theme"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let input = single_value(
            args,
            "To set a theme, choose light or dark:",
            "chat-console set theme light",
        )?;
        let theme: ThemeMode = input
            .parse()
            .map_err(|reason| SettingError::InvalidValue {
                key: self.key(),
                input: input.to_string(),
                reason,
            })?;
        config.theme = Some(theme);
        Ok(success_set(self.key(), theme.as_str()))
    }

    fn unset(&self, config: &mut Config) -> String {
        config.theme = None;
        "✅ Unset theme (will follow the terminal)".to_string()
    }
}

/// Handler for the `request-timeout` setting, in seconds.
pub struct RequestTimeoutHandler;

impl SettingHandler for RequestTimeoutHandler {
    fn key(&self) -> &'static str {
        "request-timeout"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let input = single_value(
            args,
            "To change how long a reply may take, give a number of seconds:",
            "chat-console set request-timeout 60",
        )?;
        let secs: u64 = parse_positive(self.key(), input)?;
        config.request_timeout_secs = Some(secs);
        Ok(success_set(self.key(), &format!("{secs}s")))
    }

    fn unset(&self, config: &mut Config) -> String {
        config.request_timeout_secs = None;
        success_unset(self.key())
    }
}

/// Handler for the `data-dir` setting.
pub struct DataDirHandler;

impl SettingHandler for DataDirHandler {
    fn key(&self) -> &'static str {
        "data-dir"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        if args.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: "To move saved chats, give a directory:",
                example: "chat-console set data-dir ~/chats",
            });
        }
        // Paths may contain spaces and arrive split.
        let dir = PathBuf::from(args.join(" "));
        let message = success_set(self.key(), &path_display(&dir));
        config.data_dir = Some(dir);
        Ok(message)
    }

    fn unset(&self, config: &mut Config) -> String {
        config.data_dir = None;
        success_unset(self.key())
    }
}
