//! Sequence-triggered lifecycle recorder
//!
//! The [`Recorder`] owns the trigger registry, every trigger's phase, the
//! latched-detection accumulation state and the optional background
//! listener. All state changes happen inside [`Recorder::update`], once
//! per tick.
//!
//! # Architecture
//!
//! - [`SequenceLatch`]: recording flag and in-progress sequence
//! - [`Listener`]: background task marshalling signals into the recorder
//! - [`Recorder`]: detection, phase advancement and callback dispatch
//!
//! # Tick protocol
//!
//! 1. Drain signals delivered by the listener into the pending queue.
//! 2. Apply pending signals in order: activations complete their trigger
//!    directly; raw events feed the latch, whose closed windows are matched
//!    against the registry.
//! 3. Abandon a recording window that exceeded its timeout.
//! 4. Call `update` on every trigger in phase `Update` that did not change
//!    phase during this tick.

pub mod latch;
pub mod listener;

pub use latch::{LatchOutcome, SequenceLatch};
pub use listener::{
    ChannelSource, InputSource, LineSource, Listener, SignalSender, signal_channel,
};

use std::collections::VecDeque;

use tracing::{debug, info, trace};

use crate::callback::LifecycleCallback;
use crate::error::RecorderError;
use crate::input::{InputEvent, Signal};
use crate::phase::{Detection, LifecycleAction, Phase, PhaseTransition};
use crate::registry::{RegistryEntry, TriggerRegistry};
use crate::trigger::{Token, TriggerKey};

/// Recorder construction options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecorderOptions {
    /// Token whose hold window records a sequence. Enables latched detection.
    pub record_modifier: Option<Token>,
    /// Abandon a recording window held open longer than this many ticks.
    pub recording_timeout_ticks: Option<u64>,
}

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Tick number (one-based)
    pub tick: u64,
    /// Begin/end dispatches, in the order they happened
    pub transitions: Vec<PhaseTransition>,
    /// Number of `update` calls dispatched
    pub updates: usize,
    /// Closed recording windows that matched no trigger
    pub unmatched: Vec<Vec<Token>>,
    /// Activations naming a trigger that is not registered
    pub unknown_activations: Vec<TriggerKey>,
    /// Recording windows abandoned by the timeout
    pub expired: usize,
}

/// Drives registered callbacks from a stream of input signals.
pub struct Recorder<C> {
    registry: TriggerRegistry<C>,
    latch: Option<SequenceLatch>,
    pending: VecDeque<Signal>,
    listener: Option<Listener>,
    tick: u64,
}

impl<C> Recorder<C> {
    /// Creates a recorder with edge detection only.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(RecorderOptions::default())
    }

    /// Creates a recorder; latched detection is enabled when
    /// `options.record_modifier` is set.
    #[must_use]
    pub fn with_options(options: RecorderOptions) -> Self {
        let latch = options
            .record_modifier
            .map(|modifier| SequenceLatch::new(modifier, options.recording_timeout_ticks));
        Self {
            registry: TriggerRegistry::new(),
            latch,
            pending: VecDeque::new(),
            listener: None,
            tick: 0,
        }
    }

    // ------------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------------

    /// Binds `callback` to `key`.
    ///
    /// Returns `false` and keeps the existing binding if `key` is already
    /// registered.
    pub fn register<B>(&mut self, key: TriggerKey, callback: B) -> bool
    where
        B: LifecycleCallback<C> + 'static,
    {
        let name = callback.name().to_string();
        let registered = self.registry.register(key.clone(), Box::new(callback));
        if registered {
            debug!(trigger = %key, callback = %name, "trigger registered");
        } else {
            debug!(trigger = %key, callback = %name, "trigger already registered");
        }
        registered
    }

    /// Like [`register`](Self::register), reporting a duplicate as an error.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::DuplicateTrigger`] if `key` is already bound.
    pub fn try_register<B>(&mut self, key: TriggerKey, callback: B) -> Result<(), RecorderError>
    where
        B: LifecycleCallback<C> + 'static,
    {
        if self.registry.contains(&key) {
            return Err(RecorderError::DuplicateTrigger(key));
        }
        self.register(key, callback);
        Ok(())
    }

    /// Removes a trigger and its phase. Returns `false` if it was not registered.
    pub fn unregister(&mut self, key: &TriggerKey) -> bool {
        self.registry.unregister(key)
    }

    /// Returns whether `key` is registered.
    #[must_use]
    pub fn is_registered(&self, key: &TriggerKey) -> bool {
        self.registry.contains(key)
    }

    /// Current phase of `key`, if registered.
    #[must_use]
    pub fn phase(&self, key: &TriggerKey) -> Option<Phase> {
        self.registry.phase(key)
    }

    /// Read access to the registry.
    #[must_use]
    pub const fn registry(&self) -> &TriggerRegistry<C> {
        &self.registry
    }

    /// Number of registered triggers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Whether no triggers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.tick
    }

    /// Whether a recording window is currently open.
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.latch.as_ref().is_some_and(SequenceLatch::is_recording)
    }

    // ------------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------------

    /// Queues a signal for the next tick.
    pub fn feed(&mut self, signal: impl Into<Signal>) {
        self.pending.push_back(signal.into());
    }

    /// Queues several signals for the next tick, in order.
    pub fn feed_all<I, S>(&mut self, signals: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<Signal>,
    {
        self.pending.extend(signals.into_iter().map(Into::into));
    }

    /// Queues an edge activation of `key` for the next tick.
    pub fn activate(&mut self, key: TriggerKey) {
        self.pending.push_back(Signal::Activation(key));
    }

    // ------------------------------------------------------------------------
    // Listener lifecycle
    // ------------------------------------------------------------------------

    /// Starts a background listener on `source`.
    ///
    /// A listener that is already running is stopped first; signals it had
    /// delivered stay queued for the next tick. Signals still buffered inside
    /// the old source, such as unread [`ChannelSource`] messages, are dropped
    /// with it.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::NoRuntime`] outside a tokio runtime.
    pub fn start<S: InputSource>(&mut self, source: S) -> Result<(), RecorderError> {
        if self.listener.is_some() {
            debug!("restarting input listener");
            self.stop();
        }
        self.listener = Some(Listener::spawn(source)?);
        info!("input listener started");
        Ok(())
    }

    /// Stops the background listener, if any. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.stop(&mut self.pending);
            info!("input listener stopped");
        }
    }

    /// Whether a listener is attached and still running.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.listener.as_ref().is_some_and(|l| !l.is_finished())
    }

    // ------------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------------

    /// Queues `signals` and runs one tick.
    pub fn tick<I, S>(&mut self, ctx: &C, signals: I) -> TickReport
    where
        I: IntoIterator<Item = S>,
        S: Into<Signal>,
    {
        self.feed_all(signals);
        self.update(ctx)
    }

    /// Runs one tick: applies queued signals, then dispatches `update`.
    pub fn update(&mut self, ctx: &C) -> TickReport {
        self.tick += 1;
        let tick = self.tick;
        let mut report = TickReport {
            tick,
            ..TickReport::default()
        };

        if let Some(listener) = self.listener.as_mut() {
            listener.drain(&mut self.pending);
        }

        while let Some(signal) = self.pending.pop_front() {
            match signal {
                Signal::Activation(key) => self.on_activation(key, ctx, &mut report),
                Signal::Input(event) => self.on_input(&event, ctx, &mut report),
            }
        }

        if let Some(discarded) = self.latch.as_mut().and_then(|l| l.expire(tick)) {
            debug!(tick, recorded = discarded.len(), "recording window timed out");
            report.expired += 1;
        }

        for (key, entry) in self.registry.iter_mut() {
            if entry.phase().is_active() && entry.changed_at() != Some(tick) {
                trace!(trigger = %key, tick, "update");
                entry.callback_mut().update(ctx);
                report.updates += 1;
            }
        }

        report
    }

    fn on_activation(&mut self, key: TriggerKey, ctx: &C, report: &mut TickReport) {
        let Some(entry) = self.registry.get_mut(&key) else {
            debug!(trigger = %key, "activation for unregistered trigger");
            report.unknown_activations.push(key);
            return;
        };
        let transition = complete(&key, entry, ctx, Detection::Edge, self.tick);
        report.transitions.push(transition);
    }

    fn on_input(&mut self, event: &InputEvent, ctx: &C, report: &mut TickReport) {
        let Some(latch) = self.latch.as_mut() else {
            return;
        };
        match latch.observe(event, self.tick) {
            Some(LatchOutcome::Closed(candidate)) => {
                if let Some(entry) = self.registry.get_mut(&candidate) {
                    let transition =
                        complete(&candidate, entry, ctx, Detection::Latched, self.tick);
                    report.transitions.push(transition);
                } else {
                    debug!(sequence = %candidate, "recorded sequence matched no trigger");
                    report.unmatched.push(candidate.tokens().to_vec());
                }
            }
            Some(LatchOutcome::ClosedEmpty) => {
                debug!("recording window closed with no input");
            }
            Some(LatchOutcome::Opened) => trace!(tick = self.tick, "recording started"),
            Some(LatchOutcome::Appended(token)) => trace!(%token, "recorded token"),
            None => {}
        }
    }
}

/// Completes one occurrence step for a detected trigger.
///
/// From `Begin` the callback's `begin` runs and the phase advances to
/// `Update`. From `Update` the phase advances to `End`, `end` runs, and the
/// phase advances once more to `Begin`, re-arming the trigger.
fn complete<C>(
    key: &TriggerKey,
    entry: &mut RegistryEntry<C>,
    ctx: &C,
    detection: Detection,
    tick: u64,
) -> PhaseTransition {
    let from = entry.phase();
    let callback = entry.callback_name().to_string();

    let action = match from {
        Phase::Update => {
            entry.set_phase(from.advance(), tick);
            info!(trigger = %key, callback = %callback, ?detection, "calling end");
            entry.callback_mut().end(ctx);
            entry.set_phase(entry.phase().advance(), tick);
            LifecycleAction::End
        }
        Phase::Begin | Phase::End => {
            let armed = if from == Phase::End { from.advance() } else { from };
            info!(trigger = %key, callback = %callback, ?detection, "calling begin");
            entry.callback_mut().begin(ctx);
            entry.set_phase(armed.advance(), tick);
            LifecycleAction::Begin
        }
    };

    PhaseTransition {
        trigger: key.clone(),
        callback,
        from,
        to: entry.phase(),
        action,
        detection,
        tick,
    }
}

impl<C> Default for Recorder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Drop for Recorder<C> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<C> std::fmt::Debug for Recorder<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recorder")
            .field("triggers", &self.registry.len())
            .field("tick", &self.tick)
            .field("recording", &self.is_recording())
            .field("pending", &self.pending.len())
            .field("listening", &self.is_listening())
            .finish()
    }
}
