//! Per-trigger lifecycle phases
//!
//! Every registered trigger carries one [`Phase`]. The cycle is
//! `Begin → Update → End → Begin`, expressed as a pure [`Phase::advance`]
//! over three named variants.
//!
//! - [`Phase`]: the three-state cycle
//! - [`PhaseTransition`]: record of one begin/end dispatch for reporting

pub mod transition;

pub use transition::{Detection, LifecycleAction, PhaseTransition};

use serde::Serialize;

/// Where a trigger's current occurrence stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Phase {
    /// Armed; the next detection starts an occurrence.
    #[default]
    Begin,
    /// Occurrence in progress; `update` runs every tick.
    Update,
    /// Occurrence closing; transient within a single detection.
    End,
}

impl Phase {
    /// Returns the next phase along the cycle.
    #[must_use]
    pub const fn advance(self) -> Self {
        match self {
            Self::Begin => Self::Update,
            Self::Update => Self::End,
            Self::End => Self::Begin,
        }
    }

    /// Returns whether `update` should be dispatched in this phase.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Update)
    }

    /// Lowercase label used in logs and events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Begin => "begin",
            Self::Update => "update",
            Self::End => "end",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_begin() {
        assert_eq!(Phase::default(), Phase::Begin);
    }

    #[test]
    fn test_advance_cycle() {
        assert_eq!(Phase::Begin.advance(), Phase::Update);
        assert_eq!(Phase::Update.advance(), Phase::End);
        assert_eq!(Phase::End.advance(), Phase::Begin);
    }

    #[test]
    fn test_advance_has_period_three() {
        for start in [Phase::Begin, Phase::Update, Phase::End] {
            assert_eq!(start.advance().advance().advance(), start);
        }
    }

    #[test]
    fn test_only_update_is_active() {
        assert!(!Phase::Begin.is_active());
        assert!(Phase::Update.is_active());
        assert!(!Phase::End.is_active());
    }

    #[test]
    fn test_display() {
        assert_eq!(Phase::Update.to_string(), "update");
    }
}
