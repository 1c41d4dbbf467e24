//! Registry of setting handlers.

use std::collections::HashMap;

use super::handlers::{
    BaseUrlHandler, DataDirHandler, MaxTokensHandler, ModelHandler, RequestTimeoutHandler,
    ThemeHandler,
};
use super::SettingHandler;

/// Registry of all available setting handlers.
pub struct SettingRegistry {
    handlers: HashMap<&'static str, Box<dyn SettingHandler>>,
    /// Keys in the order `set` lists them.
    display_order: Vec<&'static str>,
}

impl SettingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
            display_order: Vec::new(),
        };

        registry.register(Box::new(ModelHandler));
        registry.register(Box::new(MaxTokensHandler));
        registry.register(Box::new(BaseUrlHandler));
        registry.register(Box::new(ThemeHandler));
        registry.register(Box::new(RequestTimeoutHandler));
        registry.register(Box::new(DataDirHandler));

        registry
    }

    fn register(&mut self, handler: Box<dyn SettingHandler>) {
        let key = handler.key();
        self.display_order.push(key);
        self.handlers.insert(key, handler);
    }

    pub fn get(&self, key: &str) -> Option<&dyn SettingHandler> {
        self.handlers.get(key).map(|h| h.as_ref())
    }

    pub fn keys_display_order(&self) -> &[&'static str] {
        &self.display_order
    }
}

impl Default for SettingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
