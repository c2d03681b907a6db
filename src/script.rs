//! Deterministic replay scripts
//!
//! A script lists ticks and the signals delivered on each:
//!
//! ```yaml
//! ticks:
//!   - signals: ["+Start", "-A", "-B", "-Start"]
//!   - repeat: 3
//!   - signals: ["!<ctrl>+h"]
//! ```
//!
//! An entry with `repeat: n` expands to `n` ticks; its signals are delivered
//! on the first of them only.

use std::path::Path;

use serde::Deserialize;

use crate::config::ConfigLimits;
use crate::error::{ConfigError, SeqrecError};
use crate::input::{Signal, parse_signals};

/// One script entry as written in YAML.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptTick {
    /// Signal notation delivered on the first tick of this entry
    #[serde(default)]
    pub signals: Vec<String>,

    /// Number of ticks this entry spans
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

const fn default_repeat() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScriptFile {
    #[serde(default)]
    ticks: Vec<ScriptTick>,
}

/// A parsed script: signals per entry plus how many ticks each entry spans.
///
/// Repeats are expanded lazily by [`Script::ticks`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    entries: Vec<(Vec<Signal>, u32)>,
}

impl Script {
    /// Parses the signals of every script entry.
    ///
    /// # Errors
    ///
    /// Returns the first signal notation that fails to parse.
    pub fn from_entries(entries: &[ScriptTick]) -> Result<Self, SeqrecError> {
        let mut parsed = Vec::with_capacity(entries.len());
        for entry in entries {
            let mut signals = Vec::with_capacity(entry.signals.len());
            for notation in &entry.signals {
                signals.extend(parse_signals(notation)?);
            }
            parsed.push((signals, entry.repeat.max(1)));
        }
        Ok(Self { entries: parsed })
    }

    /// Parses a YAML script.
    ///
    /// # Errors
    ///
    /// Returns a parse error for malformed YAML or signal notation.
    pub fn parse(raw: &str, path: &Path) -> Result<Self, SeqrecError> {
        let file: ScriptFile = serde_yaml::from_str(raw).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            line: e.location().map(|l| l.line()),
            message: e.to_string(),
        })?;
        Self::from_entries(&file.ticks)
    }

    /// Reads and parses a YAML script file.
    ///
    /// Files larger than [`ConfigLimits::max_config_size`] are rejected
    /// before they are read.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, `TooLarge` for an
    /// oversized file, or a parse error.
    pub fn load(path: &Path) -> Result<Self, SeqrecError> {
        let limit = ConfigLimits::default().max_config_size;
        let size = std::fs::metadata(path)?.len();
        if size > limit {
            return Err(ConfigError::TooLarge {
                path: path.to_path_buf(),
                size,
                limit,
            }
            .into());
        }
        let raw = std::fs::read_to_string(path)?;
        Self::parse(&raw, path)
    }

    /// Number of ticks the script spans.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.entries
            .iter()
            .map(|(_, repeat)| u64::from(*repeat))
            .sum()
    }

    /// Whether the script has no ticks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Per-tick signal lists, in order.
    pub fn ticks(&self) -> impl Iterator<Item = &[Signal]> {
        self.entries.iter().flat_map(|(signals, repeat)| {
            let quiet = usize::try_from(*repeat - 1).unwrap_or(usize::MAX);
            std::iter::once(signals.as_slice()).chain(std::iter::repeat_n::<&[Signal]>(&[], quiet))
        })
    }
}
