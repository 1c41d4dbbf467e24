//! Main chat event loop
//!
//! Terminal input arrives over an unbounded channel from a reader task.
//! Completions run on their own tokio task and report back over the same
//! channel, so the loop never waits on the network and always owns the
//! controller.

pub mod keybindings;
mod lifecycle;

use std::error::Error;
use std::time::Duration;

use ratatui::crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc;
use tracing::{debug, info};

use self::keybindings::map_key;
use self::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};
use crate::core::completion::{CompletionClient, CompletionError};
use crate::core::config::data::Config;
use crate::core::controller::{PendingCompletion, SessionController};
use crate::ui::appearance::detect_preferred_theme;
use crate::ui::chat_app::ChatApp;
use crate::ui::renderer::ui;
use crate::ui::theme::resolve_theme_mode;

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
    CompletionFinished {
        pending: PendingCompletion,
        result: Result<String, CompletionError>,
    },
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => continue,
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

/// Run one completion off the loop. The result is always sent back, even
/// when the request fails.
fn spawn_completion(
    client: CompletionClient,
    pending: PendingCompletion,
    event_tx: mpsc::UnboundedSender<UiEvent>,
) {
    tokio::spawn(async move {
        let result = client
            .complete(&pending.history, &pending.attachments)
            .await;
        if event_tx
            .send(UiEvent::CompletionFinished { pending, result })
            .is_err()
        {
            debug!("chat loop closed before the completion finished");
        }
    });
}

fn handle_event(app: &mut ChatApp, event: UiEvent, event_tx: &mpsc::UnboundedSender<UiEvent>) {
    match event {
        UiEvent::Crossterm(Event::Key(key)) if key.kind == KeyEventKind::Press => {
            if let Some(pending) = app.apply(map_key(&key)) {
                let client = app.controller.completion_client().clone();
                spawn_completion(client, pending, event_tx.clone());
            }
        }
        UiEvent::Crossterm(Event::Paste(text)) => app.paste(&text),
        // Resizes and focus changes only need a redraw.
        UiEvent::Crossterm(_) => {}
        UiEvent::CompletionFinished { pending, result } => app.finish(pending, result),
    }
}

async fn event_loop(
    terminal: &mut ChatTerminal,
    app: &mut ChatApp,
    event_tx: &mpsc::UnboundedSender<UiEvent>,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        let Some(event) = event_rx.recv().await else {
            return Ok(());
        };
        handle_event(app, event, event_tx);
        while let Ok(event) = event_rx.try_recv() {
            handle_event(app, event, event_tx);
        }

        if app.view.quit_requested {
            return Ok(());
        }
    }
}

pub async fn run_chat(controller: SessionController, config: &Config) -> Result<(), Box<dyn Error>> {
    let theme_mode = resolve_theme_mode(
        controller.preferences().theme,
        config.theme,
        detect_preferred_theme(),
    );
    info!(
        model = controller.completion_client().model(),
        theme = theme_mode.as_str(),
        "starting chat interface"
    );
    let mut app = ChatApp::new(controller, theme_mode);

    let mut terminal = setup_terminal()?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx.clone());

    let result = event_loop(&mut terminal, &mut app, &event_tx, &mut event_rx).await;

    event_reader_handle.abort();
    restore_terminal(&mut terminal)?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::completion::CompletionErrorKind;
    use crate::core::config::data::ThemeMode;
    use crate::core::session::ErrorKind;
    use crate::utils::test_utils::{create_test_controller, ScriptedBackend};
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::sync::Arc;

    fn press(code: KeyCode) -> UiEvent {
        UiEvent::Crossterm(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn app_with(backend: Arc<ScriptedBackend>) -> ChatApp {
        ChatApp::new(create_test_controller(backend), ThemeMode::Dark)
    }

    #[tokio::test]
    async fn reply_arrives_through_the_channel() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_text("Hello!");
        let mut app = app_with(backend);
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();

        handle_event(&mut app, UiEvent::Crossterm(Event::Paste("Hi".into())), &event_tx);
        handle_event(&mut app, press(KeyCode::Enter), &event_tx);
        assert!(app.is_sending());

        let finished = event_rx.recv().await.expect("completion result");
        handle_event(&mut app, finished, &event_tx);

        assert!(!app.is_sending());
        let chat = app.session().active_chat().unwrap();
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.messages[1].content, "Hello!");
    }

    #[tokio::test]
    async fn failed_completion_still_reports_back() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_error(CompletionError::new(CompletionErrorKind::Unauthorized, "bad key"));
        let mut app = app_with(backend);
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();

        handle_event(&mut app, UiEvent::Crossterm(Event::Paste("Hi".into())), &event_tx);
        handle_event(&mut app, press(KeyCode::Enter), &event_tx);
        let finished = event_rx.recv().await.expect("completion result");
        handle_event(&mut app, finished, &event_tx);

        assert!(!app.is_sending());
        assert_eq!(
            app.session().last_error().map(|err| err.kind),
            Some(ErrorKind::Completion(CompletionErrorKind::Unauthorized))
        );
        assert_eq!(app.session().active_chat().unwrap().messages.len(), 1);
    }

    #[test]
    fn key_releases_are_ignored() {
        let mut app = app_with(Arc::new(ScriptedBackend::new()));
        let (event_tx, _event_rx) = mpsc::unbounded_channel();
        let mut release = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;

        handle_event(&mut app, UiEvent::Crossterm(Event::Key(release)), &event_tx);
        assert_eq!(app.view.input(), "");
        handle_event(&mut app, press(KeyCode::Char('x')), &event_tx);
        assert_eq!(app.view.input(), "x");
    }
}
