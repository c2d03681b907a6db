//! Background input listener
//!
//! Input sources (OS hotkey hooks, controller readers, stdin) run on their
//! own task and may detect completions at any time. The [`Listener`]
//! forwards their signals into a channel that the recorder drains at tick
//! time, so phase changes and callback calls only ever happen inside
//! [`Recorder::update`](super::Recorder::update).
//!
//! The listener task is cancelled via a [`CancellationToken`] when the
//! listener is stopped or dropped.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::RecorderError;
use crate::input::{InputEvent, Signal, parse_signals};
use crate::trigger::{Token, TriggerKey};

/// An asynchronous producer of signals.
///
/// Returning `None` ends the source; the listener task then exits.
#[async_trait]
pub trait InputSource: Send + 'static {
    /// Waits for the next signal.
    async fn next_signal(&mut self) -> Option<Signal>;
}

/// Handle to a running listener task.
pub struct Listener {
    rx: mpsc::UnboundedReceiver<Signal>,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Listener {
    /// Spawns a task that forwards every signal from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::NoRuntime`] when called outside a tokio
    /// runtime.
    pub fn spawn<S: InputSource>(mut source: S) -> Result<Self, RecorderError> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| RecorderError::NoRuntime)?;
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = runtime.spawn(async move {
            loop {
                tokio::select! {
                    () = token.cancelled() => {
                        debug!("input listener cancelled");
                        break;
                    }
                    signal = source.next_signal() => {
                        let Some(signal) = signal else {
                            debug!("input source exhausted");
                            break;
                        };
                        if tx.send(signal).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Ok(Self { rx, cancel, handle })
    }

    /// Moves every signal delivered so far into `out`. Returns how many.
    pub fn drain(&mut self, out: &mut VecDeque<Signal>) -> usize {
        let mut moved = 0;
        while let Ok(signal) = self.rx.try_recv() {
            out.push_back(signal);
            moved += 1;
        }
        moved
    }

    /// Whether the listener task has exited (source exhausted or cancelled).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancels the task and moves any signals it already delivered into `out`.
    ///
    /// The source is dropped with the task; anything it had not yet yielded
    /// is lost.
    pub fn stop(mut self, out: &mut VecDeque<Signal>) {
        self.cancel.cancel();
        self.drain(out);
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener")
            .field("cancelled", &self.cancel.is_cancelled())
            .field("finished", &self.handle.is_finished())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Channel source
// ============================================================================

/// Sending half of [`signal_channel`]; cloneable and usable from any thread.
#[derive(Debug, Clone)]
pub struct SignalSender {
    tx: mpsc::UnboundedSender<Signal>,
}

impl SignalSender {
    /// Sends a signal. Returns `false` once the source has been dropped.
    pub fn send(&self, signal: impl Into<Signal>) -> bool {
        self.tx.send(signal.into()).is_ok()
    }

    /// Reports a completed trigger.
    pub fn activate(&self, key: TriggerKey) -> bool {
        self.send(key)
    }

    /// Reports a token press.
    pub fn press(&self, token: impl Into<Token>) -> bool {
        self.send(InputEvent::pressed(token))
    }

    /// Reports a token release.
    pub fn release(&self, token: impl Into<Token>) -> bool {
        self.send(InputEvent::released(token))
    }
}

/// Receiving half of [`signal_channel`].
#[derive(Debug)]
pub struct ChannelSource {
    rx: mpsc::UnboundedReceiver<Signal>,
}

#[async_trait]
impl InputSource for ChannelSource {
    async fn next_signal(&mut self) -> Option<Signal> {
        self.rx.recv().await
    }
}

/// Creates a source fed by hand, e.g. from an OS hook callback.
#[must_use]
pub fn signal_channel() -> (SignalSender, ChannelSource) {
    let (tx, rx) = mpsc::unbounded_channel();
    (SignalSender { tx }, ChannelSource { rx })
}

// ============================================================================
// Line source
// ============================================================================

/// Reads whitespace-separated signal notation line by line.
///
/// Unparseable items are logged and skipped; end of input ends the source.
pub struct LineSource<R> {
    lines: Lines<BufReader<R>>,
    pending: VecDeque<Signal>,
}

impl<R: AsyncRead + Unpin + Send + 'static> LineSource<R> {
    /// Wraps an async reader.
    pub fn new(reader: R) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
            pending: VecDeque::new(),
        }
    }
}

impl LineSource<tokio::io::Stdin> {
    /// Reads signals from standard input.
    #[must_use]
    pub fn stdin() -> Self {
        Self::new(tokio::io::stdin())
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send + 'static> InputSource for LineSource<R> {
    async fn next_signal(&mut self) -> Option<Signal> {
        loop {
            if let Some(signal) = self.pending.pop_front() {
                return Some(signal);
            }
            let line = match self.lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return None,
                Err(e) => {
                    warn!(error = %e, "failed to read input line");
                    return None;
                }
            };
            for item in line.split_whitespace() {
                match parse_signals(item) {
                    Ok(signals) => self.pending.extend(signals),
                    Err(e) => warn!(input = item, error = %e, "ignoring input"),
                }
            }
        }
    }
}

impl<R> std::fmt::Debug for LineSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineSource")
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn drain_until(listener: &mut Listener, want: usize) -> VecDeque<Signal> {
        let mut out = VecDeque::new();
        for _ in 0..100 {
            listener.drain(&mut out);
            if out.len() >= want {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        out
    }

    #[test]
    fn spawn_outside_runtime_fails() {
        let (_tx, source) = signal_channel();
        assert!(matches!(
            Listener::spawn(source),
            Err(RecorderError::NoRuntime)
        ));
    }

    #[tokio::test]
    async fn forwards_channel_signals_in_order() {
        let (tx, source) = signal_channel();
        let mut listener = Listener::spawn(source).unwrap();

        assert!(tx.press("Start"));
        assert!(tx.release("A"));
        assert!(tx.activate(TriggerKey::parse_hotkey("<ctrl>+h").unwrap()));

        let out = drain_until(&mut listener, 3).await;
        assert_eq!(
            out.into_iter().collect::<Vec<_>>(),
            vec![
                Signal::Input(InputEvent::pressed("Start")),
                Signal::Input(InputEvent::released("A")),
                Signal::Activation(TriggerKey::parse_hotkey("<ctrl>+h").unwrap()),
            ]
        );
    }

    #[tokio::test]
    async fn stop_cancels_task() {
        let (tx, source) = signal_channel();
        let listener = Listener::spawn(source).unwrap();
        let mut out = VecDeque::new();
        listener.stop(&mut out);

        // The source is dropped with the task; sends start failing.
        for _ in 0..100 {
            if !tx.press("A") {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(!tx.press("A"));
    }

    #[tokio::test]
    async fn line_source_parses_and_skips_garbage() {
        let input: &'static [u8] = b"+Start -A\nbogus -B\n!<ctrl>+h\n";
        let mut source = LineSource::new(input);

        let mut got = Vec::new();
        while let Some(signal) = source.next_signal().await {
            got.push(signal.to_string());
        }
        assert_eq!(got, vec!["+Start", "-A", "-B", "!<ctrl>+h"]);
    }

    #[tokio::test]
    async fn exhausted_source_finishes_listener() {
        let input: &'static [u8] = b"+A\n";
        let mut listener = Listener::spawn(LineSource::new(input)).unwrap();
        let out = drain_until(&mut listener, 1).await;
        assert_eq!(out.len(), 1);

        for _ in 0..100 {
            if listener.is_finished() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(listener.is_finished());
    }
}
