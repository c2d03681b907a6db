//! Transition records
//!
//! A [`PhaseTransition`] is produced each time a detection makes the
//! recorder call `begin` or `end` on a callback. The recorder returns them
//! from every tick so callers can log or emit them without hooking into
//! the callbacks themselves.

use serde::Serialize;

use crate::trigger::TriggerKey;

use super::Phase;

/// How a trigger completion was recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Detection {
    /// A discrete activation (e.g. an OS hotkey firing).
    Edge,
    /// A whole sequence recorded while the record modifier was held.
    Latched,
}

/// The lifecycle method invoked by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    /// `begin` was called.
    Begin,
    /// `end` was called.
    End,
}

/// Record of one begin/end dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseTransition {
    /// Trigger that completed
    pub trigger: TriggerKey,
    /// Name of the bound callback
    pub callback: String,
    /// Phase before the detection
    pub from: Phase,
    /// Phase after the detection
    pub to: Phase,
    /// Lifecycle method that was invoked
    pub action: LifecycleAction,
    /// How the completion was recognised
    pub detection: Detection,
    /// Tick on which the transition happened
    pub tick: u64,
}
