//! Tick context for the `seqrec` binary
//!
//! The recorder itself is generic over its tick context. The binary and
//! the built-in callbacks use [`TickContext`], produced either from the
//! wall clock ([`TickClock`]) or synthetically for scripted replay.

use std::time::{Duration, Instant};

use serde::Serialize;

/// Context delivered with every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TickContext {
    /// One-based tick counter
    pub index: u64,
    /// Time since the loop started
    pub elapsed: Duration,
}

impl TickContext {
    /// Builds a context for a fixed-rate loop: tick `index` at `interval`.
    #[must_use]
    pub fn synthetic(index: u64, interval: Duration) -> Self {
        let factor = u32::try_from(index).unwrap_or(u32::MAX);
        Self {
            index,
            elapsed: interval.saturating_mul(factor),
        }
    }
}

/// Wall-clock tick source.
#[derive(Debug)]
pub struct TickClock {
    started: Instant,
    index: u64,
}

impl TickClock {
    /// Starts a clock at tick zero.
    #[must_use]
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            index: 0,
        }
    }

    /// Advances to the next tick and returns its context.
    pub fn next_tick(&mut self) -> TickContext {
        self.index += 1;
        TickContext {
            index: self.index,
            elapsed: self.started.elapsed(),
        }
    }
}
