//! Top-level client wiring a tracker session to a frontend.
//!
//! # Architecture
//!
//! ```text
//! Client (Top-level container)
//!   ├─→ TrackerSession (state, undo history, event bus)
//!   ├─→ SaveRepository (slot storage)
//!   └─→ Frontend (UI layer - CLI, GUI, etc.)
//! ```
//!
//! The frontend borrows nothing: it takes the session for as long as the UI
//! runs and returns it on exit, at which point the client persists any
//! unsaved changes.

mod builder;

pub use builder::ClientBuilder;

// Re-export Frontend trait from client-frontend-core
pub use client_frontend_core::Frontend;

use std::sync::Arc;

use anyhow::{Context, Result};
use runtime::{SaveRepository, TrackerSession};

/// Top-level client container.
///
/// # Lifecycle
///
/// 1. Client::builder() collects the session, storage and frontend
/// 2. Client::run() transfers control to the frontend (blocking)
/// 3. On frontend exit, a dirty session is saved to its slot
pub struct Client {
    session: TrackerSession,
    repository: Arc<dyn SaveRepository>,
    slot: String,
    frontend: Box<dyn Frontend>,
    save_on_exit: bool,
}

impl Client {
    /// Create a new ClientBuilder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Run the frontend until the user quits and return the final session.
    ///
    /// # Errors
    ///
    /// Returns an error if the frontend fails or the exit save fails.
    pub async fn run(self) -> Result<TrackerSession> {
        let Client {
            session,
            repository,
            slot,
            mut frontend,
            save_on_exit,
        } = self;

        let mut session = frontend.run(session).await?;

        if save_on_exit
            && session
                .save_if_dirty(repository.as_ref(), &slot)
                .with_context(|| format!("failed to save session to slot '{slot}'"))?
                .is_some()
        {
            tracing::info!("Saved session to '{}' on exit", slot);
        }

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use runtime::{Command, InMemorySaveRepository, SessionOptions};

    /// Frontend that adds one combatant and quits.
    struct Scripted;

    #[async_trait(?Send)]
    impl Frontend for Scripted {
        async fn run(&mut self, mut session: TrackerSession) -> Result<TrackerSession> {
            session.execute(Command::AddEntity {
                name: "Scripted".into(),
                color: None,
            })?;
            Ok(session)
        }
    }

    #[test]
    fn build_requires_all_layers() {
        let result = Client::builder()
            .session(TrackerSession::new(SessionOptions::default()))
            .frontend(Scripted)
            .build();
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn dirty_session_is_saved_on_exit() {
        let repository = Arc::new(InMemorySaveRepository::new());
        let client = Client::builder()
            .session(TrackerSession::new(SessionOptions::default()))
            .storage(repository.clone(), "table")
            .frontend(Scripted)
            .build()
            .expect("all layers set");

        let session = client.run().await.expect("run");
        assert!(!session.is_dirty());

        let saved = repository.load("table").unwrap().expect("saved on exit");
        assert_eq!(saved.entity_count(), 1);
    }

    #[tokio::test]
    async fn save_on_exit_can_be_disabled() {
        let repository = Arc::new(InMemorySaveRepository::new());
        let client = Client::builder()
            .session(TrackerSession::new(SessionOptions::default()))
            .storage(repository.clone(), "table")
            .frontend(Scripted)
            .save_on_exit(false)
            .build()
            .expect("all layers set");

        let session = client.run().await.expect("run");
        assert!(session.is_dirty());
        assert!(!repository.exists("table"));
    }
}
