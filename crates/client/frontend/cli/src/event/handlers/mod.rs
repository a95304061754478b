//! Event handler implementations for EventLoop.
//!
//! This module contains handler methods organized by responsibility:
//! - `input`: Keyboard input, prompts and the description editor
//! - `session`: Command execution, undo/redo and save slots
//! - `rendering`: Terminal rendering
//!
//! All handlers are implemented as `impl EventLoop` blocks in separate files.

mod input;
mod rendering;
mod session;
