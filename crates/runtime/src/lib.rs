//! Session orchestration for the tick tracker.
//!
//! This crate wraps the pure `tracker-core` models in a [`TrackerSession`]
//! that applies user commands, keeps undo history, and announces every change
//! through a causality-aware [`EventBus`]. Save files and the repositories
//! that store them live here as well.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the session and its command set
//! - [`api`] exposes the error types downstream clients interact with
//! - [`events`] provides the topic-based event bus with causality tracking
//! - [`repository`] provides the versioned save format and its stores
pub mod api;
pub mod events;
pub mod repository;
pub mod session;

pub use api::{Result, SessionError};
pub use events::{
    CausalityLog, Event, EventBus, EventId, Listener, ListenerId, RestoreReason, Topic, TopicSet,
    Trace, TrackerEvent,
};
pub use repository::{
    FileSaveRepository, InMemorySaveRepository, RepositoryError, SaveFile, SaveRepository,
    read_save, write_save,
};
pub use session::{Command, CommandOutcome, SessionOptions, TrackerSession};
