//! Live listening
//!
//! Reads signal notation from stdin on a background listener and drives the
//! recorder from a fixed-rate tick loop until input closes or the process
//! is interrupted.

use chrono::Utc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::cli::args::ListenArgs;
use crate::config::{BuiltRecorder, build};
use crate::error::SeqrecError;
use crate::observability::{Event, EventEmitter, StopReason};
use crate::recorder::LineSource;
use crate::tick::TickClock;

/// Runs the live tick loop.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, the events file
/// cannot be created, or the listener fails to start.
pub async fn run(args: &ListenArgs, cancel: CancellationToken) -> Result<(), SeqrecError> {
    let loaded = super::load_config(&args.config)?;
    let BuiltRecorder {
        mut recorder,
        tick_interval,
        ..
    } = build(&loaded.config)?;
    let tick_interval = args.tick_interval.unwrap_or(tick_interval);
    if tick_interval.is_zero() {
        return Err(SeqrecError::Usage(
            "--tick-interval must be greater than zero".to_string(),
        ));
    }

    let emitter = EventEmitter::open(args.events_file.as_deref())?;

    recorder.start(LineSource::stdin())?;
    tracing::info!(
        triggers = recorder.len(),
        interval = %humantime::format_duration(tick_interval),
        "listening on stdin"
    );
    emitter.emit(Event::RecorderStarted {
        timestamp: Utc::now(),
        mode: "listen".to_string(),
        triggers: recorder.len(),
        latched: loaded.config.recorder.record_modifier.is_some(),
    });

    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut clock = TickClock::start();

    let reason = loop {
        tokio::select! {
            () = cancel.cancelled() => break StopReason::Interrupted,
            _ = interval.tick() => {
                // Once the source has finished, everything it sent is already
                // queued and this tick drains it.
                let exhausted = !recorder.is_listening();
                let report = recorder.update(&clock.next_tick());
                emitter.emit_report(&report);
                if exhausted {
                    break StopReason::InputClosed;
                }
            }
        }
    };

    recorder.stop();
    tracing::info!(ticks = recorder.ticks(), ?reason, "recorder stopped");
    emitter.emit(Event::RecorderStopped {
        timestamp: Utc::now(),
        reason,
        ticks: recorder.ticks(),
    });
    Ok(())
}
