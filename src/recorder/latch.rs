//! Sequence latch for latched detection
//!
//! While the record modifier is held, releases of other tokens are
//! appended to an in-progress sequence. Releasing the modifier closes the
//! window and hands the sequence over for matching. One window yields at
//! most one candidate.

use crate::input::InputEvent;
use crate::trigger::{Token, TriggerKey};

/// What a single event did to the latch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LatchOutcome {
    /// The modifier was pressed and a new window opened.
    Opened,
    /// A token was appended to the open window.
    Appended(Token),
    /// The window closed with a non-empty sequence to match.
    Closed(TriggerKey),
    /// The window closed with nothing recorded.
    ClosedEmpty,
}

/// Accumulation state: the recording flag and the in-progress sequence.
#[derive(Debug, Clone)]
pub struct SequenceLatch {
    modifier: Token,
    timeout_ticks: Option<u64>,
    recording: bool,
    opened_at: u64,
    sequence: Vec<Token>,
}

impl SequenceLatch {
    /// Creates a latch gated by `modifier`, optionally abandoning windows
    /// held open longer than `timeout_ticks`.
    #[must_use]
    pub const fn new(modifier: Token, timeout_ticks: Option<u64>) -> Self {
        Self {
            modifier,
            timeout_ticks,
            recording: false,
            opened_at: 0,
            sequence: Vec::new(),
        }
    }

    /// The record modifier.
    #[must_use]
    pub const fn modifier(&self) -> &Token {
        &self.modifier
    }

    /// Whether a window is open.
    #[must_use]
    pub const fn is_recording(&self) -> bool {
        self.recording
    }

    /// Tokens recorded so far in the open window.
    #[must_use]
    pub fn sequence(&self) -> &[Token] {
        &self.sequence
    }

    /// Feeds one event observed on `tick`.
    pub fn observe(&mut self, event: &InputEvent, tick: u64) -> Option<LatchOutcome> {
        let is_modifier = event.token == self.modifier;

        if !self.recording {
            if is_modifier && event.is_press() {
                self.recording = true;
                self.opened_at = tick;
                self.sequence.clear();
                return Some(LatchOutcome::Opened);
            }
            return None;
        }

        if is_modifier {
            if event.is_press() {
                return None;
            }
            self.recording = false;
            let sequence = std::mem::take(&mut self.sequence);
            return Some(
                TriggerKey::from_tokens(sequence)
                    .map_or(LatchOutcome::ClosedEmpty, LatchOutcome::Closed),
            );
        }

        if event.is_release() {
            self.sequence.push(event.token.clone());
            return Some(LatchOutcome::Appended(event.token.clone()));
        }

        None
    }

    /// Abandons the open window if it has exceeded the timeout as of `tick`.
    ///
    /// Returns the discarded tokens when a window was abandoned.
    pub fn expire(&mut self, tick: u64) -> Option<Vec<Token>> {
        let limit = self.timeout_ticks?;
        if self.recording && tick.saturating_sub(self.opened_at) > limit {
            self.recording = false;
            return Some(std::mem::take(&mut self.sequence));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latch() -> SequenceLatch {
        SequenceLatch::new(Token::new("Start"), None)
    }

    fn feed(latch: &mut SequenceLatch, events: &[InputEvent]) -> Vec<LatchOutcome> {
        events.iter().filter_map(|e| latch.observe(e, 1)).collect()
    }

    #[test]
    fn records_releases_between_modifier_press_and_release() {
        let mut latch = latch();
        let outcomes = feed(
            &mut latch,
            &[
                InputEvent::pressed("Start"),
                InputEvent::pressed("A"),
                InputEvent::released("A"),
                InputEvent::pressed("B"),
                InputEvent::released("B"),
                InputEvent::released("Start"),
            ],
        );

        assert_eq!(
            outcomes.last(),
            Some(&LatchOutcome::Closed(
                TriggerKey::from_tokens(["A", "B"]).unwrap()
            ))
        );
        assert!(!latch.is_recording());
        assert!(latch.sequence().is_empty());
    }

    #[test]
    fn ignores_events_without_modifier() {
        let mut latch = latch();
        let outcomes = feed(
            &mut latch,
            &[InputEvent::released("A"), InputEvent::released("B")],
        );
        assert!(outcomes.is_empty());
        assert!(!latch.is_recording());
    }

    #[test]
    fn stray_modifier_release_is_ignored() {
        let mut latch = latch();
        assert_eq!(latch.observe(&InputEvent::released("Start"), 1), None);
    }

    #[test]
    fn empty_window_closes_empty() {
        let mut latch = latch();
        let outcomes = feed(
            &mut latch,
            &[InputEvent::pressed("Start"), InputEvent::released("Start")],
        );
        assert_eq!(
            outcomes,
            vec![LatchOutcome::Opened, LatchOutcome::ClosedEmpty]
        );
    }

    #[test]
    fn new_window_clears_previous_sequence() {
        let mut latch = latch();
        feed(
            &mut latch,
            &[InputEvent::pressed("Start"), InputEvent::released("A")],
        );
        assert_eq!(latch.sequence(), &[Token::new("A")]);

        // Repeated modifier press inside the window does not reset it.
        latch.observe(&InputEvent::pressed("Start"), 2);
        assert_eq!(latch.sequence(), &[Token::new("A")]);

        latch.observe(&InputEvent::released("Start"), 2);
        latch.observe(&InputEvent::pressed("Start"), 3);
        assert!(latch.sequence().is_empty());
    }

    #[test]
    fn window_expires_after_timeout() {
        let mut latch = SequenceLatch::new(Token::new("Start"), Some(2));
        latch.observe(&InputEvent::pressed("Start"), 10);
        latch.observe(&InputEvent::released("A"), 10);

        assert_eq!(latch.expire(12), None);
        assert_eq!(latch.expire(13), Some(vec![Token::new("A")]));
        assert!(!latch.is_recording());
        assert_eq!(latch.observe(&InputEvent::released("Start"), 13), None);
    }

    #[test]
    fn no_timeout_never_expires() {
        let mut latch = latch();
        latch.observe(&InputEvent::pressed("Start"), 1);
        assert_eq!(latch.expire(u64::MAX), None);
        assert!(latch.is_recording());
    }
}
