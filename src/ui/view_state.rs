//! Screen-only state: the input editor, transcript scrolling and notices.
//! None of it is part of the session and none of it is saved.

use tui_textarea::{Input, TextArea};

const INPUT_PLACEHOLDER: &str = "Type a message, or /help for commands";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

fn empty_textarea() -> TextArea<'static> {
    let mut textarea = TextArea::default();
    textarea.set_placeholder_text(INPUT_PLACEHOLDER);
    textarea
}

#[derive(Debug, Clone)]
pub struct ViewState {
    textarea: TextArea<'static>,
    scroll_offset: usize,
    follow_tail: bool,
    /// Filled in by the renderer after each frame.
    page_height: usize,
    max_scroll: usize,
    pub show_help: bool,
    pub notice: Option<Notice>,
    pub quit_requested: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            textarea: empty_textarea(),
            scroll_offset: 0,
            follow_tail: true,
            page_height: 1,
            max_scroll: 0,
            show_help: false,
            notice: None,
            quit_requested: false,
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The input box contents, lines joined with `\n`.
    pub fn input(&self) -> String {
        self.textarea.lines().join("\n")
    }

    /// Cursor as (row, column) in the input box.
    pub fn cursor(&self) -> (usize, usize) {
        self.textarea.cursor()
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    pub fn textarea_mut(&mut self) -> &mut TextArea<'static> {
        &mut self.textarea
    }

    /// Hand a key to the editor: motion, deletion, undo and typing all live there.
    pub fn apply_input(&mut self, input: Input) {
        self.textarea.input(input);
    }

    pub fn insert_newline(&mut self) {
        self.textarea.insert_newline();
    }

    /// Insert pasted text, normalizing Windows and old Mac line endings.
    pub fn insert_str(&mut self, text: &str) {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        for (idx, line) in normalized.split('\n').enumerate() {
            if idx > 0 {
                self.textarea.insert_newline();
            }
            self.textarea.insert_str(line);
        }
    }

    pub fn clear_input(&mut self) {
        self.textarea = empty_textarea();
    }

    /// Keep the newest transcript rows in view.
    pub fn follow_tail(&mut self) {
        self.follow_tail = true;
    }

    pub fn is_following_tail(&self) -> bool {
        self.follow_tail
    }

    /// Record the transcript geometry of the last frame and return the offset
    /// to render with.
    pub fn update_scroll_bounds(&mut self, total_rows: usize, page_height: usize) -> usize {
        self.page_height = page_height.max(1);
        self.max_scroll = total_rows.saturating_sub(page_height);
        if self.follow_tail {
            self.scroll_offset = self.max_scroll;
        } else {
            self.scroll_offset = self.scroll_offset.min(self.max_scroll);
        }
        self.scroll_offset
    }

    pub fn page_up(&mut self) {
        self.follow_tail = false;
        self.scroll_offset = self.scroll_offset.saturating_sub(self.page_height);
    }

    pub fn page_down(&mut self) {
        self.scroll_offset = (self.scroll_offset + self.page_height).min(self.max_scroll);
        if self.scroll_offset == self.max_scroll {
            self.follow_tail = true;
        }
    }
}
