use ratatui::style::{Color, Modifier, Style};

use crate::core::config::data::ThemeMode;

#[derive(Debug, Clone)]
pub struct Theme {
    pub mode: ThemeMode,
    // Overall background color to paint the full frame
    pub background_color: Color,

    // Transcript
    pub user_label_style: Style,
    pub user_text_style: Style,
    pub assistant_label_style: Style,
    pub assistant_text_style: Style,
    pub placeholder_style: Style,

    // Chrome
    pub title_style: Style,
    pub sidebar_border_style: Style,
    pub sidebar_item_style: Style,
    pub sidebar_active_style: Style,
    pub attachment_style: Style,
    pub status_style: Style,
    pub error_style: Style,
    pub sending_style: Style,

    // Input area
    pub input_border_style: Style,
    pub input_text_style: Style,
    pub input_disabled_style: Style,
}

impl Theme {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Theme {
            mode: ThemeMode::Dark,
            background_color: Color::Black,

            user_label_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            assistant_label_style: Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
            assistant_text_style: Style::default().fg(Color::White),
            placeholder_style: Style::default().fg(Color::DarkGray),

            title_style: Style::default().fg(Color::Gray),
            sidebar_border_style: Style::default().fg(Color::DarkGray),
            sidebar_item_style: Style::default().fg(Color::Gray),
            sidebar_active_style: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            attachment_style: Style::default().fg(Color::Yellow),
            status_style: Style::default().fg(Color::DarkGray),
            error_style: Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
            sending_style: Style::default().fg(Color::LightYellow),

            input_border_style: Style::default().fg(Color::Gray),
            input_text_style: Style::default().fg(Color::White),
            input_disabled_style: Style::default().fg(Color::DarkGray),
        }
    }

    pub fn light() -> Self {
        Theme {
            mode: ThemeMode::Light,
            background_color: Color::White,

            user_label_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Blue),
            assistant_label_style: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            assistant_text_style: Style::default().fg(Color::Black),
            placeholder_style: Style::default().fg(Color::Gray),

            title_style: Style::default().fg(Color::DarkGray),
            sidebar_border_style: Style::default().fg(Color::Gray),
            sidebar_item_style: Style::default().fg(Color::DarkGray),
            sidebar_active_style: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            attachment_style: Style::default().fg(Color::Magenta),
            status_style: Style::default().fg(Color::DarkGray),
            error_style: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            sending_style: Style::default().fg(Color::Magenta),

            input_border_style: Style::default().fg(Color::Black),
            input_text_style: Style::default().fg(Color::Black),
            input_disabled_style: Style::default().fg(Color::Gray),
        }
    }
}

/// Pick the starting theme: saved preference, then config, then the OS hint.
pub fn resolve_theme_mode(
    preference: Option<ThemeMode>,
    configured: Option<ThemeMode>,
    detected: Option<ThemeMode>,
) -> ThemeMode {
    preference.or(configured).or(detected).unwrap_or_default()
}
