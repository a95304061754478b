//! Cross-frontend primitives for presenting a tracker session.
//!
//! Houses message logging, event formatting, view-model types and the mirror
//! panels (bus listeners that keep a panel's cursor or draft in sync with
//! the session) that both the terminal UI and future graphical clients can
//! reuse.
pub mod config;
pub mod event;
pub mod format;
pub mod frontend;
pub mod message;
pub mod panels;
pub mod view_model;

pub use config::{FrontendConfig, MessageConfig};
pub use event::{EventConsumer, EventImpact, MessageConsumer};
pub use format::describe_event;
pub use frontend::Frontend;
pub use message::{MessageEntry, MessageLevel, MessageLog};
pub use panels::{DescriptionMirror, PanelOrder, SelectionMirror};
pub use view_model::{
    EntityDetails, PresentationMapper, RosterRow, TimelineEntry, TimelineRow, ViewModel,
};
