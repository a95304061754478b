//! Event handling for the CLI client.
//!
//! This module contains the event loop orchestrator that coordinates session
//! events, user input, autosave and UI updates.

mod handlers;
mod r#loop;

pub use r#loop::EventLoop;
