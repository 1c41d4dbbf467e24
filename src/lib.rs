//! chat-console is a full-screen terminal chat client for Anthropic-style
//! `/v1/messages` endpoints.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the chat store, the session state machine, completion
//!   requests, persistence, and configuration.
//! - [`ui`] renders the terminal interface and runs the interactive event loop
//!   that drives user input and display updates.
//! - [`commands`] implements slash-command parsing and execution used by the
//!   chat loop.
//! - [`api`] defines the wire payloads and the HTTP backend.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which resolves configuration and dispatches
//! into [`ui::chat_loop`] for interactive sessions.

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
