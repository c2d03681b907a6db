//! Observability module
//!
//! Logging and the structured event stream used to follow recorder
//! activity.

pub mod events;
pub mod logging;

pub use events::{Event, EventEmitter, StopReason};
pub use logging::{LogFormat, init_logging};
