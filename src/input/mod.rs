//! Raw input events and signals
//!
//! The recorder consumes [`Signal`]s: either a raw [`InputEvent`] (a token
//! pressed or released) for latched detection, or an activation naming a
//! completed trigger for edge detection.
//!
//! Signals have a compact textual notation used by replay scripts and the
//! stdin listener:
//!
//! | Notation      | Meaning                         |
//! |---------------|---------------------------------|
//! | `+A`          | token `A` pressed               |
//! | `-A`          | token `A` released              |
//! | `!<ctrl>+h`   | hotkey `<ctrl>+h` activated     |

pub mod gamepad;

pub use gamepad::GamepadButton;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::SignalParseError;
use crate::trigger::{Token, TriggerKey};

/// Whether a token went down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Key or button went down.
    Pressed,
    /// Key or button went up.
    Released,
}

/// A discrete press or release of a token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct InputEvent {
    /// Which token changed
    pub token: Token,
    /// Which way it changed
    pub direction: Direction,
}

impl InputEvent {
    /// A press of `token`.
    #[must_use]
    pub fn pressed(token: impl Into<Token>) -> Self {
        Self {
            token: token.into(),
            direction: Direction::Pressed,
        }
    }

    /// A release of `token`.
    #[must_use]
    pub fn released(token: impl Into<Token>) -> Self {
        Self {
            token: token.into(),
            direction: Direction::Released,
        }
    }

    /// Returns whether this is a press.
    #[must_use]
    pub const fn is_press(&self) -> bool {
        matches!(self.direction, Direction::Pressed)
    }

    /// Returns whether this is a release.
    #[must_use]
    pub const fn is_release(&self) -> bool {
        matches!(self.direction, Direction::Released)
    }
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = match self.direction {
            Direction::Pressed => '+',
            Direction::Released => '-',
        };
        write!(f, "{sign}{}", self.token)
    }
}

/// Unit of input delivered to the recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// Raw press/release, consumed by latched detection.
    Input(InputEvent),
    /// A trigger completed, reported by an edge source (e.g. an OS hotkey).
    Activation(TriggerKey),
}

impl From<InputEvent> for Signal {
    fn from(event: InputEvent) -> Self {
        Self::Input(event)
    }
}

impl From<TriggerKey> for Signal {
    fn from(key: TriggerKey) -> Self {
        Self::Activation(key)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(event) => event.fmt(f),
            Self::Activation(key) => write!(f, "!{key}"),
        }
    }
}

impl FromStr for Signal {
    type Err = SignalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let Some(prefix) = chars.next() else {
            return Err(SignalParseError::UnknownPrefix(String::new()));
        };
        let rest = chars.as_str().trim();

        match prefix {
            '+' | '-' => {
                if rest.is_empty() {
                    return Err(SignalParseError::MissingToken(s.to_string()));
                }
                let event = if prefix == '+' {
                    InputEvent::pressed(rest)
                } else {
                    InputEvent::released(rest)
                };
                Ok(Self::Input(event))
            }
            '!' => TriggerKey::parse_hotkey(rest)
                .map(Self::Activation)
                .map_err(|source| SignalParseError::Activation {
                    input: s.to_string(),
                    source,
                }),
            _ => Err(SignalParseError::UnknownPrefix(s.to_string())),
        }
    }
}

/// Parses a whitespace-separated list of signals, e.g. `"+Start -A -Start"`.
///
/// # Errors
///
/// Returns the first notation that fails to parse.
pub fn parse_signals(line: &str) -> Result<Vec<Signal>, SignalParseError> {
    line.split_whitespace().map(str::parse).collect()
}
