//! Structured event stream for `seqrec`.
//!
//! Discrete, typed events emitted while the recorder runs. Events are
//! serialized as newline-delimited JSON (JSONL) and carry a monotonically
//! increasing sequence number.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::phase::{Detection, LifecycleAction, PhaseTransition};
use crate::recorder::TickReport;
use crate::trigger::Token;

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// Why the recorder stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// A replay script ran to its end.
    ScriptComplete,
    /// The input source was exhausted.
    InputClosed,
    /// SIGINT or SIGTERM.
    Interrupted,
}

/// A discrete event emitted during recorder operation.
///
/// Tagged with `"type"` when serialized so consumers can dispatch on kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The recorder is set up and about to process ticks.
    RecorderStarted {
        /// When the recorder started.
        timestamp: DateTime<Utc>,
        /// `"replay"` or `"listen"`.
        mode: String,
        /// Number of registered triggers.
        triggers: usize,
        /// Whether latched detection is enabled.
        latched: bool,
    },

    /// A detection called `begin`.
    OccurrenceBegan {
        /// When the transition happened.
        timestamp: DateTime<Utc>,
        /// Tick of the detection.
        tick: u64,
        /// Trigger that completed.
        trigger: String,
        /// Bound callback name.
        callback: String,
        /// How the completion was recognised.
        detection: Detection,
    },

    /// A detection called `end`.
    OccurrenceEnded {
        /// When the transition happened.
        timestamp: DateTime<Utc>,
        /// Tick of the detection.
        tick: u64,
        /// Trigger that completed.
        trigger: String,
        /// Bound callback name.
        callback: String,
        /// How the completion was recognised.
        detection: Detection,
    },

    /// A recorded sequence matched no trigger.
    SequenceUnmatched {
        /// When the window closed.
        timestamp: DateTime<Utc>,
        /// Tick on which the window closed.
        tick: u64,
        /// Tokens that were recorded.
        tokens: Vec<Token>,
    },

    /// The recorder stopped.
    RecorderStopped {
        /// When the recorder stopped.
        timestamp: DateTime<Utc>,
        /// Why it stopped.
        reason: StopReason,
        /// Ticks processed.
        ticks: u64,
    },
}

impl Event {
    /// Event for a begin/end dispatch.
    #[must_use]
    pub fn from_transition(transition: &PhaseTransition) -> Self {
        let timestamp = Utc::now();
        let trigger = transition.trigger.to_string();
        let callback = transition.callback.clone();
        match transition.action {
            LifecycleAction::Begin => Self::OccurrenceBegan {
                timestamp,
                tick: transition.tick,
                trigger,
                callback,
                detection: transition.detection,
            },
            LifecycleAction::End => Self::OccurrenceEnded {
                timestamp,
                tick: transition.tick,
                trigger,
                callback,
                detection: transition.detection,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Envelope (adds sequence number via serde flatten)
// ---------------------------------------------------------------------------

/// Wraps an [`Event`] with a monotonically increasing sequence number.
#[derive(Debug, Serialize)]
struct EventEnvelope {
    sequence: u64,
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Thread-safe, buffered JSONL event writer.
///
/// Each [`emit`](Self::emit) increments the sequence counter, writes one
/// JSON line and flushes. Serialization or I/O failures are dropped.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

// Box<dyn Write> is not Debug
impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter that writes to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an emitter that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates an emitter that discards all events.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// Creates an emitter that writes to a file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Opens the event sink named on the command line.
    ///
    /// `None` discards events, `-` writes to stderr, anything else is a file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created.
    pub fn open(target: Option<&Path>) -> std::io::Result<Self> {
        match target {
            None => Ok(Self::noop()),
            Some(path) if path.as_os_str() == "-" => Ok(Self::stderr()),
            Some(path) => Self::from_file(path),
        }
    }

    /// Emits an event as a single JSONL line.
    pub fn emit(&self, event: Event) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope {
            sequence: seq,
            event,
        };

        if let Ok(mut w) = self.writer.lock() {
            if let Ok(line) = serde_json::to_string(&envelope) {
                let _ = writeln!(w, "{line}");
                let _ = w.flush();
            }
        }
    }

    /// Emits the transitions and unmatched sequences of one tick.
    pub fn emit_report(&self, report: &TickReport) {
        for transition in &report.transitions {
            self.emit(Event::from_transition(transition));
        }
        for sequence in &report.unmatched {
            self.emit(Event::SequenceUnmatched {
                timestamp: Utc::now(),
                tick: report.tick,
                tokens: sequence.clone(),
            });
        }
    }

    /// Returns the number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex as StdMutex};

    use super::*;
    use crate::phase::Phase;
    use crate::trigger::TriggerKey;

    #[derive(Clone)]
    struct TestWriter(Arc<StdMutex<Vec<u8>>>);

    impl TestWriter {
        fn new() -> Self {
            Self(Arc::new(StdMutex::new(Vec::new())))
        }

        fn lines(&self) -> Vec<serde_json::Value> {
            let buf = self.0.lock().unwrap();
            String::from_utf8_lossy(&buf)
                .lines()
                .map(|l| serde_json::from_str(l).unwrap())
                .collect()
        }
    }

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn transition(action: LifecycleAction) -> PhaseTransition {
        PhaseTransition {
            trigger: TriggerKey::from_tokens(["A", "B"]).unwrap(),
            callback: "Combo".to_string(),
            from: Phase::Begin,
            to: Phase::Update,
            action,
            detection: Detection::Latched,
            tick: 4,
        }
    }

    #[test]
    fn transition_maps_to_occurrence_events() {
        let json = serde_json::to_value(Event::from_transition(&transition(
            LifecycleAction::Begin,
        )))
        .unwrap();
        assert_eq!(json["type"], "OccurrenceBegan");
        assert_eq!(json["trigger"], "A+B");
        assert_eq!(json["detection"], "latched");
        assert_eq!(json["tick"], 4);

        let json =
            serde_json::to_value(Event::from_transition(&transition(LifecycleAction::End)))
                .unwrap();
        assert_eq!(json["type"], "OccurrenceEnded");
    }

    #[test]
    fn emitter_writes_sequenced_jsonl() {
        let tw = TestWriter::new();
        let emitter = EventEmitter::new(Box::new(tw.clone()));
        emitter.emit(Event::RecorderStarted {
            timestamp: Utc::now(),
            mode: "replay".to_string(),
            triggers: 2,
            latched: true,
        });
        emitter.emit(Event::RecorderStopped {
            timestamp: Utc::now(),
            reason: StopReason::ScriptComplete,
            ticks: 10,
        });

        let lines = tw.lines();
        assert_eq!(emitter.event_count(), 2);
        assert_eq!(lines[0]["sequence"], 0);
        assert_eq!(lines[0]["type"], "RecorderStarted");
        assert_eq!(lines[1]["sequence"], 1);
        assert_eq!(lines[1]["reason"], "script_complete");
        assert!(lines[1].get("event").is_none());
    }

    #[test]
    fn open_selects_sink() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");

        let file = EventEmitter::open(Some(&path)).unwrap();
        file.emit(Event::RecorderStopped {
            timestamp: Utc::now(),
            reason: StopReason::InputClosed,
            ticks: 1,
        });
        drop(file);
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"reason\":\"input_closed\""));

        assert!(EventEmitter::open(Some(Path::new("-"))).is_ok());
        assert!(EventEmitter::open(None).is_ok());
        assert!(EventEmitter::open(Some(&dir.path().join("missing/events.jsonl"))).is_err());
    }

    #[test]
    fn emit_report_covers_transitions_and_unmatched() {
        let tw = TestWriter::new();
        let emitter = EventEmitter::new(Box::new(tw.clone()));
        let report = TickReport {
            tick: 4,
            transitions: vec![transition(LifecycleAction::Begin)],
            unmatched: vec![vec![Token::new("X"), Token::new("Y")]],
            ..TickReport::default()
        };
        emitter.emit_report(&report);

        let lines = tw.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["type"], "SequenceUnmatched");
        assert_eq!(lines[1]["tokens"], serde_json::json!(["X", "Y"]));
        assert_eq!(lines[1]["sequence"], 1);
    }
}
