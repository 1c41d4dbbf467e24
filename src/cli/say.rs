//! TUI-less "say" command

use std::error::Error;
use std::path::PathBuf;

use crate::core::config::data::Config;
use crate::core::controller::{ControllerError, SessionController};
use crate::core::message::Attachment;
use crate::core::session::ErrorKind;
use crate::core::startup::{build_controller, open_persistence, resolve_env_connection, Overrides};

/// Send one message in a fresh chat and return the reply.
pub async fn say_once(
    controller: &mut SessionController,
    prompt: String,
    attachments: Vec<Attachment>,
) -> Result<String, ControllerError> {
    controller.start_new_chat()?;
    for file in attachments {
        controller.add_attachment(file)?;
    }
    controller.set_draft_input(prompt)?;
    controller.send_message().await
}

pub async fn run_say(
    prompt: Vec<String>,
    attach: Vec<PathBuf>,
    overrides: Overrides,
    ephemeral: bool,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() && attach.is_empty() {
        eprintln!("Usage: chat-console say [--attach FILE]... <prompt>");
        std::process::exit(1);
    }

    let mut attachments = Vec::with_capacity(attach.len());
    for path in &attach {
        match Attachment::from_path(path) {
            Ok(file) => attachments.push(file),
            Err(err) => {
                eprintln!("❌ {err}");
                std::process::exit(1);
            }
        }
    }

    let config = Config::load()?;
    let mut controller = match resolve_env_connection(&config, &overrides)
        .and_then(|settings| build_controller(&settings, open_persistence(&config, ephemeral)?))
    {
        Ok(controller) => controller,
        Err(err) => {
            err.print();
            std::process::exit(err.exit_code());
        }
    };

    match say_once(&mut controller, prompt, attachments).await {
        Ok(reply) => {
            println!("{reply}");
            if let Some(error) = controller
                .snapshot()
                .last_error()
                .filter(|error| error.kind == ErrorKind::Persistence)
            {
                eprintln!("⚠️  {}", error.message);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("❌ Error: {err}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::completion::{CompletionError, CompletionErrorKind};
    use crate::utils::test_utils::{create_test_controller, ScriptedBackend};
    use std::sync::Arc;

    #[tokio::test]
    async fn say_starts_a_new_chat_each_time() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_text("first");
        backend.push_text("second");
        let mut controller = create_test_controller(backend.clone());

        assert_eq!(say_once(&mut controller, "one".into(), vec![]).await.unwrap(), "first");
        assert_eq!(say_once(&mut controller, "two".into(), vec![]).await.unwrap(), "second");

        let session = controller.snapshot();
        assert_eq!(session.chats().len(), 2);
        assert_eq!(session.chats().chats()[0].title, "two");
        assert_eq!(backend.requests()[1].messages.len(), 1);
    }

    #[tokio::test]
    async fn say_sends_attachments_as_context() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_text("summary");
        let mut controller = create_test_controller(backend.clone());

        say_once(
            &mut controller,
            "summarize".into(),
            vec![Attachment::new("notes.md", "# Notes")],
        )
        .await
        .unwrap();

        let system = backend.requests()[0].system.clone().unwrap();
        assert!(system.contains("notes.md: # Notes"));
    }

    #[tokio::test]
    async fn say_reports_completion_errors() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_error(CompletionError::new(
            CompletionErrorKind::Unauthorized,
            "invalid x-api-key",
        ));
        let mut controller = create_test_controller(backend);

        let err = say_once(&mut controller, "hello".into(), vec![])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid x-api-key"));
        assert_eq!(
            controller.snapshot().active_chat().unwrap().messages.len(),
            1
        );
    }
}
