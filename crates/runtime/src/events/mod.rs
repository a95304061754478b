//! Topic-based event bus with causality tracking.
//!
//! Every event carries the id of the event whose handling produced it, so a
//! listener can ask whether the notification it is handling was (transitively)
//! triggered by a particular kind of change.

mod bus;
mod trace;
mod types;

pub use bus::{EventBus, Listener, ListenerId, Topic, TopicSet};
pub use trace::{CausalityLog, Trace};
pub use types::{Event, EventId, RestoreReason, TrackerEvent};
