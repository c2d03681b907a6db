//! Tokens and trigger keys
//!
//! A [`TriggerKey`] is an ordered sequence of [`Token`]s. Order matters:
//! `A+B` and `B+A` are different triggers. Keys are built either from an
//! explicit token list (controller sequences) or parsed from hotkey
//! notation such as `"<ctrl>+<alt>+a"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TriggerError;

/// Canonical name of a single input token (`"A"`, `"Start"`, `"<ctrl>"`, `"h"`).
///
/// Comparison is exact and case-sensitive.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Creates a new `Token` from a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the token name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// An ordered, non-empty sequence of tokens identifying a trigger.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TriggerKey(Vec<Token>);

impl TriggerKey {
    /// Builds a key from an explicit token sequence.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Empty`] for an empty sequence and
    /// [`TriggerError::EmptyToken`] if any token name is empty.
    pub fn from_tokens<I, T>(tokens: I) -> Result<Self, TriggerError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Token>,
    {
        let tokens: Vec<Token> = tokens.into_iter().map(Into::into).collect();
        if tokens.is_empty() {
            return Err(TriggerError::Empty);
        }
        if let Some(position) = tokens.iter().position(|t| t.as_str().is_empty()) {
            return Err(TriggerError::EmptyToken {
                input: join(&tokens),
                position,
            });
        }
        Ok(Self(tokens))
    }

    /// Parses hotkey notation: `+`-separated segments, each either a
    /// `<name>` special key or a single character. Both forms are
    /// lowercased, so `"<Ctrl>+H"` and `"<ctrl>+h"` are the same key.
    ///
    /// # Errors
    ///
    /// Returns a [`TriggerError`] describing the first malformed segment.
    pub fn parse_hotkey(input: &str) -> Result<Self, TriggerError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(TriggerError::Empty);
        }

        let mut tokens = Vec::new();
        for (position, segment) in trimmed.split('+').enumerate() {
            let segment = segment.trim();
            if segment.is_empty() {
                return Err(TriggerError::EmptyToken {
                    input: input.to_string(),
                    position,
                });
            }

            if let Some(rest) = segment.strip_prefix('<') {
                let name = rest.strip_suffix('>').unwrap_or("");
                if name.is_empty() || name.contains(['<', '>']) {
                    return Err(TriggerError::MalformedSpecial {
                        input: input.to_string(),
                        segment: segment.to_string(),
                    });
                }
                tokens.push(Token::new(format!("<{}>", name.to_lowercase())));
            } else if segment.chars().count() == 1 {
                tokens.push(Token::new(segment.to_lowercase()));
            } else {
                return Err(TriggerError::InvalidKey {
                    input: input.to_string(),
                    segment: segment.to_string(),
                });
            }
        }

        Ok(Self(tokens))
    }

    /// Returns the tokens in order.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.0
    }

    /// Returns the number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; a key holds at least one token.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns whether `token` appears anywhere in the key.
    #[must_use]
    pub fn contains(&self, token: &Token) -> bool {
        self.0.contains(token)
    }
}

impl fmt::Display for TriggerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join(&self.0))
    }
}

impl FromStr for TriggerKey {
    type Err = TriggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hotkey(s)
    }
}

impl<'de> Deserialize<'de> for TriggerKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let tokens = Vec::<Token>::deserialize(deserializer)?;
        Self::from_tokens(tokens).map_err(serde::de::Error::custom)
    }
}

fn join(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(Token::as_str)
        .collect::<Vec<_>>()
        .join("+")
}
