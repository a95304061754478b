//! Widgets composing the terminal UI.
pub mod details;
pub mod footer;
pub mod header;
pub mod help;
pub mod messages;
pub mod prompt;
pub mod roster;
pub mod save_menu;
pub mod timeline;
