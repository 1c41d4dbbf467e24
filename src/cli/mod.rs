//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod say;
pub mod settings;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::say::run_say;
use crate::cli::settings::{run_set, run_unset};
use crate::core::config::data::{path_display, Config};
use crate::core::startup::{build_controller, open_persistence, resolve_env_connection, Overrides};
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::{init_file_logging, init_stderr_logging};

#[derive(Parser)]
#[command(name = "chat-console")]
#[command(version)]
#[command(about = "A terminal chat console for Anthropic-style completion endpoints")]
#[command(
    long_about = "chat-console is a full-screen terminal chat client. Chats are kept on disk \
and listed most recent first; attach text files to give the model extra context.\n\n\
Environment Variables:\n\
  ANTHROPIC_API_KEY        Your API key (required)\n\
  ANTHROPIC_BASE_URL       Custom API base URL (optional, defaults to https://api.anthropic.com/v1)\n\
  CHAT_CONSOLE_CONFIG_DIR  Directory holding config.toml\n\
  CHAT_CONSOLE_DATA_DIR    Directory holding saved chats\n\n\
Controls:\n\
  Enter             Send the message\n\
  Alt+Enter         Insert a newline\n\
  Ctrl+N            Start a new chat\n\
  Ctrl+Up/Down      Switch to the previous/next chat\n\
  PageUp/PageDown   Scroll the transcript\n\
  Ctrl+T            Toggle light/dark theme\n\
  Esc               Dismiss the error message\n\
  Ctrl+C            Quit the application\n\n\
Commands:\n\
  /new              Start a new chat\n\
  /attach <path>    Attach a text file to the next message\n\
  /detach <name>    Remove a pending attachment\n\
  /theme            Toggle light/dark theme\n\
  /help             Show the command list"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to use instead of the configured one
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Maximum tokens per reply
    #[arg(long, global = true, value_name = "TOKENS")]
    pub max_tokens: Option<u32>,

    /// Write diagnostic logs to the specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Keep chats in memory only; nothing is read from or written to disk
    #[arg(long, global = true)]
    pub ephemeral: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send a single message without starting the interface
    Say {
        /// Attach a text file (repeatable)
        #[arg(short = 'a', long = "attach", value_name = "FILE")]
        attach: Vec<PathBuf>,
        /// The message to send
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Set configuration values, or list them when no key is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Print the effective configuration
    Config,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async_main())
}

fn init_logging(log: Option<&PathBuf>, interactive: bool) -> Result<(), Box<dyn Error>> {
    match log {
        Some(path) => init_file_logging(path),
        None if interactive => Ok(()),
        None => {
            init_stderr_logging();
            Ok(())
        }
    }
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let overrides = args.overrides();
    let command = args.command.unwrap_or(Commands::Chat);
    init_logging(args.log.as_ref(), matches!(command, Commands::Chat))?;

    match command {
        Commands::Chat => {
            let config = Config::load()?;
            let settings = match resolve_env_connection(&config, &overrides) {
                Ok(settings) => settings,
                Err(err) => {
                    err.print();
                    std::process::exit(err.exit_code());
                }
            };
            let controller = match open_persistence(&config, args.ephemeral)
                .and_then(|persistence| build_controller(&settings, persistence))
            {
                Ok(controller) => controller,
                Err(err) => {
                    err.print();
                    std::process::exit(err.exit_code());
                }
            };
            run_chat(controller, &config).await
        }
        Commands::Say { attach, prompt } => run_say(prompt, attach, overrides, args.ephemeral).await,
        Commands::Set { key, value } => {
            if let Err(err) = run_set(key.as_deref(), &value) {
                err.print();
                std::process::exit(err.exit_code());
            }
            Ok(())
        }
        Commands::Unset { key } => {
            if let Err(err) = run_unset(&key) {
                err.print();
                std::process::exit(err.exit_code());
            }
            Ok(())
        }
        Commands::Config => {
            let config = Config::load()?;
            println!("Config file: {}", path_display(Config::get_config_path()?));
            config.print_all();
            if let Ok(dir) = config.data_dir() {
                println!("  chats stored in: {}", path_display(dir));
            }
            Ok(())
        }
    }
}
