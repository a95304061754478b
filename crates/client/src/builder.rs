//! Client builder with dependency injection pattern.

use std::sync::Arc;

use anyhow::{Context, Result};
use runtime::{SaveRepository, TrackerSession};

use crate::{Client, Frontend};

/// Builder for constructing a Client with proper validation.
///
/// # Design Principles
///
/// - **Required fields**: Session, repository and frontend must be provided
/// - **Fail-fast validation**: Missing required fields cause build() to fail
/// - **Fluent API**: Chainable methods for ergonomic construction
#[derive(Default)]
pub struct ClientBuilder {
    session: Option<TrackerSession>,
    repository: Option<Arc<dyn SaveRepository>>,
    slot: Option<String>,
    frontend: Option<Box<dyn Frontend>>,
    save_on_exit: bool,
}

impl ClientBuilder {
    /// Create a new ClientBuilder.
    pub fn new() -> Self {
        Self {
            save_on_exit: true,
            ..Self::default()
        }
    }

    /// Set the session (required).
    ///
    /// It should be constructed via `SessionBuilder` from the `client-bootstrap` crate.
    pub fn session(mut self, session: TrackerSession) -> Self {
        self.session = Some(session);
        self
    }

    /// Set the repository and slot written on exit (required).
    pub fn storage(mut self, repository: Arc<dyn SaveRepository>, slot: impl Into<String>) -> Self {
        self.repository = Some(repository);
        self.slot = Some(slot.into());
        self
    }

    /// Set the frontend (required).
    pub fn frontend(mut self, frontend: impl Frontend + 'static) -> Self {
        self.frontend = Some(Box::new(frontend));
        self
    }

    /// Whether unsaved changes are written to the slot when the frontend exits
    /// (default: true).
    pub fn save_on_exit(mut self, enabled: bool) -> Self {
        self.save_on_exit = enabled;
        self
    }

    /// Build the Client.
    ///
    /// # Errors
    ///
    /// Returns an error if the session, storage or frontend is not set.
    pub fn build(self) -> Result<Client> {
        let session = self
            .session
            .context("Session is required. Use .session() to set it.")?;

        let repository = self
            .repository
            .context("Storage is required. Use .storage() to set it.")?;

        let frontend = self
            .frontend
            .context("Frontend is required. Use .frontend() to set it.")?;

        Ok(Client {
            session,
            repository,
            slot: self.slot.unwrap_or_else(|| "session".to_string()),
            frontend,
            save_on_exit: self.save_on_exit,
        })
    }
}
