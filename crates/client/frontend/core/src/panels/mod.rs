//! Panels that mirror shared session state through the event bus.
//!
//! A mirror is a [`runtime::Listener`] holding the view-local copy of some
//! shared value (a list cursor, an edit buffer). Mirrors never mutate the
//! session; when their local value is forced to change they hand back a
//! command, and consult the event's [`runtime::Trace`] so a change is never
//! echoed back to the topic it came from.
mod description;
mod selection;

pub use description::DescriptionMirror;
pub use selection::{PanelOrder, SelectionMirror};
