pub mod data;
pub mod defaults;
pub mod io;
pub mod printing;


pub use data::{Config, ThemeMode};
pub use io::ConfigError;
