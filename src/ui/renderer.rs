use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::commands::all_commands;
use crate::core::chat::Chat;
use crate::core::message::Role;
use crate::ui::chat_app::ChatApp;
use crate::ui::theme::Theme;
use crate::ui::view_state::Notice;
use crate::ui::wrap::{fit_width, wrap_text};

const SIDEBAR_WIDTH: u16 = 28;
const MAX_INPUT_ROWS: usize = 6;
const EMPTY_TRANSCRIPT_HINT: &str =
    "Type a message and press Enter to start a new chat. /help lists commands.";
const IDLE_HINT: &str = "Enter send • Alt+Enter newline • Ctrl+N new chat • Ctrl+C quit • /help";

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Assistant => "Assistant",
    }
}

/// Pre-wrapped transcript rows for `chat` at `width` columns.
pub fn build_transcript_lines(chat: Option<&Chat>, theme: &Theme, width: usize) -> Vec<Line<'static>> {
    let Some(chat) = chat.filter(|chat| !chat.messages.is_empty()) else {
        return wrap_text(EMPTY_TRANSCRIPT_HINT, width)
            .into_iter()
            .map(|row| Line::from(Span::styled(row, theme.placeholder_style)))
            .collect();
    };

    let mut lines = Vec::new();
    for (idx, message) in chat.messages.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::default());
        }
        let (label_style, text_style) = match message.role {
            Role::User => (theme.user_label_style, theme.user_text_style),
            Role::Assistant => (theme.assistant_label_style, theme.assistant_text_style),
        };
        lines.push(Line::from(Span::styled(role_label(message.role), label_style)));
        lines.extend(
            wrap_text(&message.content, width)
                .into_iter()
                .map(|row| Line::from(Span::styled(row, text_style))),
        );
    }
    lines
}

/// The status row: an error wins over the sending indicator, which wins over
/// notices and the key hint.
pub fn status_line(app: &ChatApp) -> (String, Style) {
    let theme = app.theme();
    let session = app.session();
    if let Some(err) = session.last_error() {
        return (format!("⚠ {}", err.message), theme.error_style);
    }
    if session.is_sending() {
        return ("Sending…".to_string(), theme.sending_style);
    }
    match &app.view.notice {
        Some(Notice { text, is_error: true }) => (text.clone(), theme.error_style),
        Some(Notice { text, .. }) => (text.clone(), theme.status_style),
        None => (IDLE_HINT.to_string(), theme.status_style),
    }
}

fn attachment_row(app: &ChatApp) -> Option<String> {
    let files = app.session().pending_files();
    if files.is_empty() {
        return None;
    }
    let names: Vec<&str> = files.iter().map(|file| file.name.as_str()).collect();
    Some(format!("📎 {}", names.join(", ")))
}

pub fn ui(f: &mut Frame, app: &mut ChatApp) {
    let area = f.area();
    f.render_widget(
        Block::default().style(Style::default().bg(app.theme().background_color)),
        area,
    );

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(SIDEBAR_WIDTH.min(area.width / 3)),
            Constraint::Min(0),
        ])
        .split(area);

    render_sidebar(f, app, columns[0]);

    let visible_input_rows = app.view.textarea().lines().len().clamp(1, MAX_INPUT_ROWS);
    let attachments = attachment_row(app);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(u16::from(attachments.is_some())),
            Constraint::Length(1),
            Constraint::Length(visible_input_rows as u16 + 2),
        ])
        .split(columns[1]);

    render_transcript(f, app, rows[0]);

    if let Some(text) = attachments {
        let row = fit_width(&text, rows[1].width as usize);
        f.render_widget(
            Paragraph::new(Span::styled(row, app.theme().attachment_style)),
            rows[1],
        );
    }

    let (status, status_style) = status_line(app);
    f.render_widget(
        Paragraph::new(Span::styled(
            fit_width(&status, rows[2].width as usize),
            status_style,
        )),
        rows[2],
    );

    render_input(f, app, rows[3]);

    if app.view.show_help {
        render_help(f, app.theme(), area);
    }
}

fn render_sidebar(f: &mut Frame, app: &ChatApp, area: Rect) {
    let theme = app.theme();
    let session = app.session();
    let text_width = area.width.saturating_sub(2) as usize;

    let items: Vec<ListItem> = session
        .chats()
        .iter()
        .map(|chat| ListItem::new(fit_width(chat.display_title(), text_width)))
        .collect();

    let mut state = ListState::default();
    state.select(
        session
            .active_chat_id()
            .and_then(|id| session.chats().position(id)),
    );

    let list = List::new(items)
        .block(
            Block::default()
                .title(Span::styled("Chats", theme.title_style))
                .borders(Borders::RIGHT)
                .border_style(theme.sidebar_border_style),
        )
        .style(theme.sidebar_item_style)
        .highlight_style(theme.sidebar_active_style)
        .highlight_symbol("› ");
    f.render_stateful_widget(list, area, &mut state);
}

fn render_transcript(f: &mut Frame, app: &mut ChatApp, area: Rect) {
    let width = area.width as usize;
    let page_height = area.height.saturating_sub(1) as usize;

    let (title, lines) = {
        let chat = app.session().active_chat();
        let title = format!(
            "{} • {}",
            chat.map(Chat::display_title).unwrap_or("chat-console"),
            app.controller.completion_client().model()
        );
        (title, build_transcript_lines(chat, app.theme(), width))
    };

    let offset = app.view.update_scroll_bounds(lines.len(), page_height);
    let paragraph = Paragraph::new(lines)
        .block(Block::default().title(Span::styled(
            fit_width(&title, width),
            app.theme().title_style,
        )))
        .scroll((offset.min(u16::MAX as usize) as u16, 0));
    f.render_widget(paragraph, area);
}

fn render_input(f: &mut Frame, app: &mut ChatApp, area: Rect) {
    let theme = app.theme();
    let placeholder_style = theme.placeholder_style;
    let sending = app.session().is_sending();
    let (title, border_style, text_style) = if sending {
        (
            "Waiting for the reply…",
            theme.input_disabled_style,
            theme.input_disabled_style,
        )
    } else {
        ("Message", theme.input_border_style, theme.input_text_style)
    };
    let cursor_style = if sending || app.view.show_help {
        text_style
    } else {
        text_style.add_modifier(Modifier::REVERSED)
    };

    let textarea = app.view.textarea_mut();
    textarea.set_block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    textarea.set_style(text_style);
    textarea.set_cursor_style(cursor_style);
    textarea.set_cursor_line_style(Style::default());
    textarea.set_placeholder_style(placeholder_style);
    f.render_widget(app.view.textarea(), area);
}

fn help_lines(theme: &Theme) -> Vec<Line<'static>> {
    let keys = [
        ("Enter", "Send the message"),
        ("Alt+Enter", "Insert a newline"),
        ("Ctrl+N", "Start a new chat"),
        ("Ctrl+Up/Down", "Previous/next chat"),
        ("PageUp/Down", "Scroll the transcript"),
        ("Ctrl+T", "Toggle light/dark theme"),
        ("Esc", "Close help or dismiss the error"),
        ("Ctrl+C", "Quit"),
    ];

    let mut lines = vec![Line::from(Span::styled("Keys", theme.title_style))];
    for (key, help) in keys {
        lines.push(Line::from(vec![
            Span::styled(format!("  {key:<16}"), theme.user_label_style),
            Span::raw(help),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("Commands", theme.title_style)));
    for command in all_commands() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<16}", command.usage), theme.user_label_style),
            Span::raw(command.help),
        ]));
    }
    lines
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_help(f: &mut Frame, theme: &Theme, area: Rect) {
    let lines = help_lines(theme);
    let popup = centered(area, 64, lines.len() as u16 + 2);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines)
            .style(theme.assistant_text_style.bg(theme.background_color))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("Help (Esc to close)")
                    .borders(Borders::ALL)
                    .border_style(theme.input_border_style),
            ),
        popup,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chat::ChatId;
    use crate::core::config::data::ThemeMode;
    use crate::core::message::{Attachment, Message};
    use crate::utils::test_utils::{create_test_controller, ScriptedBackend};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn app() -> ChatApp {
        ChatApp::new(
            create_test_controller(Arc::new(ScriptedBackend::new())),
            ThemeMode::Dark,
        )
    }

    fn screen_text(app: &mut ChatApp, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn lines_text(lines: &[Line]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn transcript_labels_each_message() {
        let mut chat = Chat::new(ChatId::generate());
        chat.messages.push(Message::user("Hi"));
        chat.messages.push(Message::assistant("Hello there, friend"));

        let lines = build_transcript_lines(Some(&chat), &Theme::dark(), 12);
        assert_eq!(
            lines_text(&lines),
            vec!["You", "Hi", "", "Assistant", "Hello there,", "friend"]
        );
    }

    #[test]
    fn empty_transcript_shows_hint() {
        let lines = build_transcript_lines(None, &Theme::dark(), 200);
        assert_eq!(lines_text(&lines), vec![EMPTY_TRANSCRIPT_HINT]);
    }

    #[test]
    fn status_prefers_errors_then_sending() {
        let mut app = app();
        assert_eq!(status_line(&app).0, IDLE_HINT);

        app.view.notice = Some(Notice::info("Theme: light"));
        assert_eq!(status_line(&app).0, "Theme: light");

        app.controller.set_draft_input("Hi").unwrap();
        let pending = app.controller.begin_send().unwrap();
        assert_eq!(status_line(&app).0, "Sending…");

        app.finish(pending, Err(crate::core::completion::CompletionError::transport("offline")));
        assert!(status_line(&app).0.starts_with('⚠'));
    }

    #[test]
    fn frame_shows_sidebar_transcript_and_attachments() {
        let mut app = app();
        app.controller.set_draft_input("Hi").unwrap();
        let pending = app.controller.begin_send().unwrap();
        app.finish(pending, Ok("Hello!".to_string()));
        app.controller
            .add_attachment(Attachment::new("notes.txt", "x"))
            .unwrap();

        let screen = screen_text(&mut app, 80, 20);
        assert!(screen.contains("Chats"));
        assert!(screen.contains("Hi"));
        assert!(screen.contains("Hello!"));
        assert!(screen.contains("notes.txt"));
        assert!(screen.contains("Message"));
    }

    #[test]
    fn help_overlay_lists_commands() {
        let mut app = app();
        app.view.show_help = true;
        let screen = screen_text(&mut app, 100, 30);
        assert!(screen.contains("/attach <path>"));
        assert!(screen.contains("Ctrl+N"));
    }

    #[test]
    fn multiline_input_grows_the_box() {
        let mut app = app();
        app.view.insert_str("first line\nsecond");
        let screen = screen_text(&mut app, 60, 16);
        assert!(screen.contains("first line"));
        assert!(screen.contains("second"));
    }

    #[test]
    fn empty_input_shows_placeholder() {
        let mut app = app();
        let screen = screen_text(&mut app, 80, 16);
        assert!(screen.contains("Type a message"));
    }

    #[test]
    fn tiny_terminals_do_not_panic() {
        let mut app = app();
        app.view.insert_str("a long draft that will not fit anywhere");
        app.view.show_help = true;
        screen_text(&mut app, 10, 4);
    }
}
