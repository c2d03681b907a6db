//! Scripted replay
//!
//! Builds a recorder from a configuration and feeds it a replay script, one
//! synthetic tick per script tick, then prints a summary.

use chrono::Utc;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::cli::args::{OutputFormat, RunArgs};
use crate::config::{BuiltRecorder, build};
use crate::error::SeqrecError;
use crate::observability::{Event, EventEmitter, StopReason};
use crate::phase::LifecycleAction;
use crate::recorder::TickReport;
use crate::script::Script;
use crate::tick::TickContext;

/// Final state of one trigger after a replay.
#[derive(Debug, Serialize)]
struct TriggerSummary {
    trigger: String,
    callback: String,
    phase: String,
}

/// Totals for a replay.
#[derive(Debug, Default, Serialize)]
struct RunSummary {
    ticks: u64,
    begins: usize,
    ends: usize,
    updates: usize,
    unmatched: usize,
    expired: usize,
    unknown_activations: usize,
    triggers: Vec<TriggerSummary>,
}

impl RunSummary {
    fn record(&mut self, report: &TickReport) {
        self.ticks = report.tick;
        for transition in &report.transitions {
            match transition.action {
                LifecycleAction::Begin => self.begins += 1,
                LifecycleAction::End => self.ends += 1,
            }
        }
        self.updates += report.updates;
        self.unmatched += report.unmatched.len();
        self.expired += report.expired;
        self.unknown_activations += report.unknown_activations.len();
    }
}

/// Replays `args.script` against `args.config`.
///
/// # Errors
///
/// Returns an error if the configuration or script cannot be loaded, or the
/// events file cannot be created.
pub fn run(args: &RunArgs, cancel: &CancellationToken) -> Result<(), SeqrecError> {
    let loaded = super::load_config(&args.config)?;
    let BuiltRecorder {
        mut recorder,
        tick_interval,
        ..
    } = build(&loaded.config)?;
    let script = Script::load(&args.script)?;

    let emitter = EventEmitter::open(args.events_file.as_deref())?;

    tracing::info!(
        triggers = recorder.len(),
        ticks = script.len(),
        "replaying script"
    );
    emitter.emit(Event::RecorderStarted {
        timestamp: Utc::now(),
        mode: "replay".to_string(),
        triggers: recorder.len(),
        latched: loaded.config.recorder.record_modifier.is_some(),
    });

    let mut summary = RunSummary::default();
    let mut reason = StopReason::ScriptComplete;
    for signals in script.ticks() {
        if cancel.is_cancelled() {
            reason = StopReason::Interrupted;
            break;
        }
        let ctx = TickContext::synthetic(recorder.ticks() + 1, tick_interval);
        let report = recorder.tick(&ctx, signals.iter().cloned());
        emitter.emit_report(&report);
        summary.record(&report);
    }

    emitter.emit(Event::RecorderStopped {
        timestamp: Utc::now(),
        reason,
        ticks: recorder.ticks(),
    });

    summary.triggers = recorder
        .registry()
        .iter()
        .map(|(key, entry)| TriggerSummary {
            trigger: key.to_string(),
            callback: entry.callback_name().to_string(),
            phase: entry.phase().to_string(),
        })
        .collect();

    print_summary(&summary, args.format)
}

fn print_summary(summary: &RunSummary, format: OutputFormat) -> Result<(), SeqrecError> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(summary)?),
        OutputFormat::Human => {
            println!(
                "{} ticks: {} begin, {} end, {} update, {} unmatched",
                summary.ticks, summary.begins, summary.ends, summary.updates, summary.unmatched
            );
            for trigger in &summary.triggers {
                println!(
                    "  {} ({}): {}",
                    trigger.trigger, trigger.callback, trigger.phase
                );
            }
        }
    }
    Ok(())
}
