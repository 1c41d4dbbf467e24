//! Slash commands typed into the input box.
//!
//! Input that does not start with a known `/command` is sent as a message.

mod handlers;
mod registry;

pub use registry::{all_commands, find_command, Command, CommandInvocation};

use crate::ui::chat_app::ChatApp;

pub enum CommandResult {
    Continue,
    ProcessAsMessage(String),
}

pub fn process_input(app: &mut ChatApp, input: &str) -> CommandResult {
    let trimmed = input.trim();

    let Some(rest) = trimmed.strip_prefix('/') else {
        return CommandResult::ProcessAsMessage(input.to_string());
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    if let Some(command) = find_command(command_name) {
        (command.handler)(app, CommandInvocation { args })
    } else {
        CommandResult::ProcessAsMessage(input.to_string())
    }
}
