//! Glue code tying the session, save repository and terminal UI together.
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use runtime::{SaveRepository, TrackerSession};

use crate::config::CliConfig;
use crate::event::EventLoop;
use crate::presentation::terminal;
use client_frontend_core::{EventConsumer, Frontend, FrontendConfig, MessageConsumer};

/// Terminal frontend.
///
/// Owns nothing but configuration and the save repository; the session is
/// handed in by [`Frontend::run`] and handed back when the user quits.
pub struct CliFrontend {
    frontend_config: FrontendConfig,
    cli_config: CliConfig,
    repository: Arc<dyn SaveRepository>,
    slot: String,
    autosave: Option<Duration>,
}

impl CliFrontend {
    pub fn new(
        frontend_config: FrontendConfig,
        cli_config: CliConfig,
        repository: Arc<dyn SaveRepository>,
        slot: impl Into<String>,
    ) -> Self {
        Self {
            frontend_config,
            cli_config,
            repository,
            slot: slot.into(),
            autosave: None,
        }
    }

    /// Save the session to its slot periodically while it has unsaved changes.
    pub fn with_autosave(mut self, period: Option<Duration>) -> Self {
        self.autosave = period;
        self
    }
}

#[async_trait(?Send)]
impl Frontend for CliFrontend {
    async fn run(&mut self, session: TrackerSession) -> Result<TrackerSession> {
        tracing::info!("CLI frontend starting...");

        let mut consumer = MessageConsumer::new(&self.frontend_config.messages);
        consumer.message_log_mut().push_text(format!(
            "Tracking {} combatants. Press ? for keys.",
            session.state().population.len()
        ));

        let event_loop = EventLoop::new(
            session,
            Arc::clone(&self.repository),
            consumer,
            self.slot.clone(),
            self.cli_config.clone(),
            self.autosave,
        );

        let mut terminal = terminal::init()?;
        let _guard = terminal::TerminalGuard;

        let (session, _consumer) = event_loop.run(&mut terminal).await?;

        terminal::restore()?;
        tracing::info!("CLI frontend exiting");

        Ok(session)
    }
}
