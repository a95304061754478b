//! Trait describing a runnable client front-end.
use anyhow::Result;
use async_trait::async_trait;
use runtime::TrackerSession;

/// Frontend abstraction for UI layers.
///
/// The frontend takes ownership of the session for the lifetime of the UI:
/// - Register mirror panels as bus listeners
/// - Subscribe to the broadcast channels for redraws and messages
/// - Turn user input into [`runtime::Command`]s
///
/// Sessions hold their listeners in `Rc`s, so frontends run on a single
/// task and the trait future is not `Send`.
///
/// # Implementations
///
/// - `CliFrontend`: Terminal-based UI (ratatui + crossterm)
#[async_trait(?Send)]
pub trait Frontend {
    /// Run the frontend event loop until the user quits.
    ///
    /// Returns the session so the caller can persist it on the way out.
    ///
    /// # Errors
    ///
    /// Returns an error if the frontend encounters a fatal error.
    async fn run(&mut self, session: TrackerSession) -> Result<TrackerSession>;
}
