use crate::core::config::data::{path_display, Config};
use crate::core::config::defaults::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT_SECS};

impl Config {
    /// Human readable `key: value` lines, marking values that fall back to defaults.
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::new();
        match &self.model {
            Some(model) => lines.push(format!("model: {model}")),
            None => lines.push(format!("model: {DEFAULT_MODEL} (default)")),
        }
        match self.max_tokens {
            Some(max_tokens) => lines.push(format!("max-tokens: {max_tokens}")),
            None => lines.push(format!("max-tokens: {DEFAULT_MAX_TOKENS} (default)")),
        }
        match &self.base_url {
            Some(base_url) => lines.push(format!("base-url: {base_url}")),
            None => lines.push(format!("base-url: {} (default)", self.base_url_or_default())),
        }
        match self.theme {
            Some(theme) => lines.push(format!("theme: {theme}")),
            None => lines.push("theme: (unset)".to_string()),
        }
        match self.request_timeout_secs {
            Some(secs) => lines.push(format!("request-timeout: {secs}s")),
            None => lines.push(format!(
                "request-timeout: {DEFAULT_REQUEST_TIMEOUT_SECS}s (default)"
            )),
        }
        match &self.data_dir {
            Some(dir) => lines.push(format!("data-dir: {}", path_display(dir))),
            None => lines.push("data-dir: (platform default)".to_string()),
        }
        lines
    }

    pub fn print_all(&self) {
        println!("Current configuration:");
        for line in self.describe() {
            println!("  {line}");
        }
    }
}
