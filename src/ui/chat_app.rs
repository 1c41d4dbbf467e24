//! The interactive app: a [`SessionController`] plus everything that only
//! exists on screen.

use tracing::debug;

use crate::commands::{process_input, CommandResult};
use crate::core::completion::CompletionError;
use crate::core::config::data::ThemeMode;
use crate::core::controller::{ControllerError, PendingCompletion, SessionController};
use crate::core::session::Session;
use crate::ui::chat_loop::keybindings::KeyAction;
use crate::ui::theme::Theme;
use crate::ui::view_state::{Notice, ViewState};

const BUSY_NOTICE: &str = "Wait for the reply before doing that.";

pub struct ChatApp {
    pub controller: SessionController,
    pub view: ViewState,
    theme: Theme,
}

impl ChatApp {
    pub fn new(controller: SessionController, theme_mode: ThemeMode) -> Self {
        Self {
            controller,
            view: ViewState::new(),
            theme: Theme::for_mode(theme_mode),
        }
    }

    pub fn session(&self) -> &Session {
        self.controller.snapshot()
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn is_sending(&self) -> bool {
        self.session().is_sending()
    }

    /// Show a controller failure in the notice line. Validation and completion
    /// failures already set `last_error` and are shown from there.
    pub fn report(&mut self, err: &ControllerError) {
        match err {
            ControllerError::Busy => self.view.notice = Some(Notice::error(BUSY_NOTICE)),
            ControllerError::Validation(_) | ControllerError::Completion(_) => {}
            other => self.view.notice = Some(Notice::error(other.to_string())),
        }
    }

    pub fn toggle_theme(&mut self) {
        let mode = self.controller.toggle_theme(self.theme.mode);
        self.theme = Theme::for_mode(mode);
        self.view.notice = Some(Notice::info(format!("Theme: {}", mode.as_str())));
    }

    pub fn new_chat(&mut self) {
        match self.controller.start_new_chat() {
            Ok(_) => {
                self.view.notice = None;
                self.view.follow_tail();
            }
            Err(err) => self.report(&err),
        }
    }

    /// Move the selection up (`-1`) or down (`1`) the chat list.
    pub fn select_adjacent(&mut self, step: isize) {
        let Some(target) = self.session().adjacent_chat_id(step) else {
            return;
        };
        if self.session().active_chat_id() == Some(&target) {
            return;
        }
        match self.controller.select_chat(&target) {
            Ok(()) => self.view.follow_tail(),
            Err(err) => self.report(&err),
        }
    }

    /// Apply one key action. Returns a completion to run when a send started.
    pub fn apply(&mut self, action: KeyAction) -> Option<PendingCompletion> {
        if action.edits_input() && self.is_sending() {
            return None;
        }

        match action {
            KeyAction::Submit => return self.submit_input(),
            KeyAction::InsertNewline => self.view.insert_newline(),
            KeyAction::Edit(input) => self.view.apply_input(input),
            KeyAction::NewChat => self.new_chat(),
            KeyAction::PreviousChat => self.select_adjacent(-1),
            KeyAction::NextChat => self.select_adjacent(1),
            KeyAction::PageUp => self.view.page_up(),
            KeyAction::PageDown => self.view.page_down(),
            KeyAction::ToggleTheme => self.toggle_theme(),
            KeyAction::Dismiss => {
                if self.view.show_help {
                    self.view.show_help = false;
                } else {
                    self.controller.dismiss_error();
                    self.view.notice = None;
                }
            }
            KeyAction::Quit => self.view.quit_requested = true,
        }
        None
    }

    /// Insert pasted text unless a reply is pending.
    pub fn paste(&mut self, text: &str) {
        if !self.is_sending() {
            self.view.insert_str(text);
        }
    }

    /// Run a slash command, or hand the input to the controller as a message.
    pub fn submit_input(&mut self) -> Option<PendingCompletion> {
        if self.is_sending() {
            return None;
        }

        let input = self.view.input();
        let text = match process_input(self, &input) {
            CommandResult::Continue => {
                self.view.clear_input();
                return None;
            }
            CommandResult::ProcessAsMessage(text) => text,
        };

        if let Err(err) = self.controller.set_draft_input(text) {
            self.report(&err);
            return None;
        }
        match self.controller.begin_send() {
            Ok(pending) => {
                debug!(chat = %pending.chat_id, "send started");
                self.view.clear_input();
                self.view.notice = None;
                self.view.follow_tail();
                Some(pending)
            }
            Err(err) => {
                self.report(&err);
                None
            }
        }
    }

    pub fn finish(&mut self, pending: PendingCompletion, result: Result<String, CompletionError>) {
        if let Err(err) = self.controller.finish_send(pending, result) {
            self.report(&err);
        }
        self.view.follow_tail();
    }
}
