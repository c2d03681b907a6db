//! Built-in callbacks used by the `seqrec` binary.
//!
//! - [`Stopwatch`]: counts updates and reports how long each occurrence ran
//! - [`LogCallback`]: logs each lifecycle call

use std::time::Duration;

use tracing::{info, trace};

use crate::config::schema::{CallbackConfig, CallbackKind};
use crate::tick::TickContext;

use super::LifecycleCallback;

/// Measures each occurrence in ticks and elapsed time.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    name: String,
    started_at: Option<Duration>,
    updates: u64,
    occurrences: u64,
    last_duration: Option<Duration>,
}

impl Stopwatch {
    /// Creates an idle stopwatch.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            started_at: None,
            updates: 0,
            occurrences: 0,
            last_duration: None,
        }
    }

    /// Updates seen in the current (or last) occurrence.
    #[must_use]
    pub const fn updates(&self) -> u64 {
        self.updates
    }

    /// Number of completed occurrences.
    #[must_use]
    pub const fn occurrences(&self) -> u64 {
        self.occurrences
    }

    /// Duration of the last completed occurrence.
    #[must_use]
    pub const fn last_duration(&self) -> Option<Duration> {
        self.last_duration
    }
}

impl LifecycleCallback<TickContext> for Stopwatch {
    fn name(&self) -> &str {
        &self.name
    }

    fn begin(&mut self, ctx: &TickContext) {
        self.started_at = Some(ctx.elapsed);
        self.updates = 0;
    }

    fn update(&mut self, ctx: &TickContext) {
        self.updates += 1;
        trace!(callback = %self.name, tick = ctx.index, elapsed = ?ctx.elapsed, "stopwatch update");
    }

    fn end(&mut self, ctx: &TickContext) {
        let Some(started) = self.started_at.take() else {
            return;
        };
        let ran = ctx.elapsed.saturating_sub(started);
        self.occurrences += 1;
        self.last_duration = Some(ran);
        info!(
            callback = %self.name,
            updates = self.updates,
            ran = %humantime::format_duration(ran),
            "stopwatch stopped"
        );
    }
}

/// Logs every lifecycle call.
#[derive(Debug, Clone)]
pub struct LogCallback {
    name: String,
}

impl LogCallback {
    /// Creates a logging callback.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl LifecycleCallback<TickContext> for LogCallback {
    fn name(&self) -> &str {
        &self.name
    }

    fn begin(&mut self, ctx: &TickContext) {
        info!(callback = %self.name, tick = ctx.index, "begin");
    }

    fn update(&mut self, ctx: &TickContext) {
        trace!(callback = %self.name, tick = ctx.index, "update");
    }

    fn end(&mut self, ctx: &TickContext) {
        info!(callback = %self.name, tick = ctx.index, "end");
    }
}

/// Instantiates the callback described by a configuration entry.
#[must_use]
pub fn from_config(config: &CallbackConfig) -> Box<dyn LifecycleCallback<TickContext>> {
    match config.kind {
        CallbackKind::Stopwatch => Box::new(Stopwatch::new(&config.name)),
        CallbackKind::Log => Box::new(LogCallback::new(&config.name)),
    }
}
