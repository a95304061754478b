//! Shared bootstrap utilities for client front-ends.
//!
//! Provides configuration loading and session setup (including resuming the
//! autosave slot) that can be reused by the terminal UI or any other
//! front-end crate.
pub mod builder;
pub mod config;

pub use builder::{SessionBuilder, SessionSetup};
pub use config::TrackerConfig;
