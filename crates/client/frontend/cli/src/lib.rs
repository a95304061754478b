//! Terminal UI frontend for the tick tracker.
//!
//! This crate provides a terminal-based user interface for a tracker session.
//! It implements the `client_frontend_core::Frontend` trait.
//!
//! # Architecture
//!
//! CliFrontend is a pure UI layer that:
//! - Takes the session for the lifetime of the UI and hands it back on exit
//! - Registers the roster, timeline and description mirrors as bus listeners
//! - Turns keys into session commands and redraws on broadcast events

mod app;
mod config;
mod event;
mod input;
pub mod logging;
pub mod presentation;
mod state;

pub use app::CliFrontend;
pub use config::CliConfig;

// Re-export for convenience (used in main.rs)
pub use client_frontend_core::FrontendConfig;
