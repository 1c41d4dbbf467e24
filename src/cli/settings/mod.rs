//! Settings management for the `set` and `unset` commands.
//!
//! Each configuration key has a [`SettingHandler`] that validates input and
//! applies it to a [`Config`]. The command functions load the config file,
//! run the handler and save the result.

pub mod error;
pub mod handlers;
pub mod registry;
#[cfg(test)]
mod tests;

pub use error::SettingError;
pub use registry::SettingRegistry;

use crate::core::config::data::Config;

/// Trait for handling a configuration setting.
pub trait SettingHandler: Send + Sync {
    /// Returns the configuration key this handler manages.
    fn key(&self) -> &'static str;

    /// Apply `args` (everything after the key) to `config`.
    ///
    /// Returns the success message to display.
    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError>;

    /// Clear the value so the default applies again.
    fn unset(&self, config: &mut Config) -> String;
}

/// Apply `set <key> <args...>` to `config` without touching the disk.
pub fn apply_set(
    registry: &SettingRegistry,
    key: &str,
    args: &[String],
    config: &mut Config,
) -> Result<String, SettingError> {
    let handler = registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;
    handler.set(args, config)
}

/// Apply `unset <key>` to `config` without touching the disk.
pub fn apply_unset(
    registry: &SettingRegistry,
    key: &str,
    config: &mut Config,
) -> Result<String, SettingError> {
    let handler = registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;
    Ok(handler.unset(config))
}

fn load_config() -> Result<Config, SettingError> {
    Config::load().map_err(|err| SettingError::ConfigError(err.to_string()))
}

fn save_config(config: &Config) -> Result<(), SettingError> {
    config
        .save()
        .map_err(|err| SettingError::ConfigError(err.to_string()))
}

/// `set` with no key lists what can be set along with current values.
pub fn run_set(key: Option<&str>, args: &[String]) -> Result<(), SettingError> {
    let mut config = load_config()?;
    let registry = SettingRegistry::new();

    let Some(key) = key else {
        config.print_all();
        println!();
        println!("Available keys: {}", registry.keys_display_order().join(", "));
        return Ok(());
    };

    let message = apply_set(&registry, key, args, &mut config)?;
    save_config(&config)?;
    println!("{message}");
    Ok(())
}

pub fn run_unset(key: &str) -> Result<(), SettingError> {
    let mut config = load_config()?;
    let registry = SettingRegistry::new();
    let message = apply_unset(&registry, key, &mut config)?;
    save_config(&config)?;
    println!("{message}");
    Ok(())
}
