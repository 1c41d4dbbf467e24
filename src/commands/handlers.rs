use std::path::PathBuf;

use directories::BaseDirs;
use tracing::debug;

use super::registry::CommandInvocation;
use super::CommandResult;
use crate::core::message::Attachment;
use crate::ui::chat_app::ChatApp;
use crate::ui::view_state::Notice;

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(dirs) = BaseDirs::new() {
            return dirs.home_dir().join(rest);
        }
    }
    PathBuf::from(raw)
}

pub(super) fn handle_new(app: &mut ChatApp, _invocation: CommandInvocation<'_>) -> CommandResult {
    app.new_chat();
    CommandResult::Continue
}

pub(super) fn handle_attach(app: &mut ChatApp, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        app.view.notice = Some(Notice::error("Usage: /attach <path>"));
        return CommandResult::Continue;
    }

    let path = expand_home(invocation.args);
    let attachment = match Attachment::from_path(&path) {
        Ok(attachment) => attachment,
        Err(err) => {
            app.view.notice = Some(Notice::error(err.to_string()));
            return CommandResult::Continue;
        }
    };

    let name = attachment.name.clone();
    debug!(name = %name, bytes = attachment.content.len(), "attaching file");
    match app.controller.add_attachment(attachment) {
        Ok(()) => app.view.notice = Some(Notice::info(format!("Attached {name}"))),
        Err(err) => app.report(&err),
    }
    CommandResult::Continue
}

pub(super) fn handle_detach(app: &mut ChatApp, invocation: CommandInvocation<'_>) -> CommandResult {
    let name = invocation.args;
    if name.is_empty() {
        app.view.notice = Some(Notice::error("Usage: /detach <name>"));
        return CommandResult::Continue;
    }

    match app.controller.remove_attachment(name) {
        Ok(true) => app.view.notice = Some(Notice::info(format!("Removed {name}"))),
        Ok(false) => {
            app.view.notice = Some(Notice::error(format!("No pending attachment named {name}")))
        }
        Err(err) => app.report(&err),
    }
    CommandResult::Continue
}

pub(super) fn handle_theme(app: &mut ChatApp, _invocation: CommandInvocation<'_>) -> CommandResult {
    app.toggle_theme();
    CommandResult::Continue
}

pub(super) fn handle_help(app: &mut ChatApp, _invocation: CommandInvocation<'_>) -> CommandResult {
    app.view.show_help = true;
    CommandResult::Continue
}
