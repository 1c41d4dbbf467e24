use super::CommandResult;
use crate::ui::chat_app::ChatApp;

pub type CommandHandler = fn(&mut ChatApp, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub args: &'a str,
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

const COMMANDS: &[Command] = &[
    Command {
        name: "new",
        usage: "/new",
        help: "Start a new chat.",
        handler: super::handlers::handle_new,
    },
    Command {
        name: "attach",
        usage: "/attach <path>",
        help: "Attach a text file to the next message.",
        handler: super::handlers::handle_attach,
    },
    Command {
        name: "detach",
        usage: "/detach <name>",
        help: "Remove a pending attachment.",
        handler: super::handlers::handle_detach,
    },
    Command {
        name: "theme",
        usage: "/theme",
        help: "Toggle the light and dark theme.",
        handler: super::handlers::handle_theme,
    },
    Command {
        name: "help",
        usage: "/help",
        help: "Show keys and commands.",
        handler: super::handlers::handle_help,
    },
];
