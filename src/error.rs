//! Error types for `seqrec`
//!
//! A small hierarchy: recorder and trigger errors surface from the library
//! API, configuration errors from the loader, and [`SeqrecError`] ties them
//! together for the CLI with an exit code per variant.

use std::path::PathBuf;
use thiserror::Error;

use crate::trigger::TriggerKey;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `seqrec` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Recorder error (duplicate trigger, missing runtime)
    pub const RECORDER_ERROR: i32 = 5;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `seqrec` operations.
#[derive(Debug, Error)]
pub enum SeqrecError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Recorder error
    #[error(transparent)]
    Recorder(#[from] RecorderError),

    /// Trigger key could not be built
    #[error(transparent)]
    Trigger(#[from] TriggerError),

    /// Input signal notation could not be parsed
    #[error(transparent)]
    Signal(#[from] SignalParseError),

    /// Invalid command-line usage
    #[error("usage error: {0}")]
    Usage(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SeqrecError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Json(_) | Self::Yaml(_) => ExitCode::CONFIG_ERROR,
            Self::Recorder(_) => ExitCode::RECORDER_ERROR,
            Self::Trigger(_) | Self::Signal(_) => ExitCode::ERROR,
            Self::Usage(_) => ExitCode::USAGE_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Recorder Errors
// ============================================================================

/// Errors raised by the [`Recorder`](crate::recorder::Recorder) API.
#[derive(Debug, Error)]
pub enum RecorderError {
    /// The trigger key is already bound to a callback
    #[error("trigger '{0}' is already registered")]
    DuplicateTrigger(TriggerKey),

    /// A background listener was started outside a tokio runtime
    #[error("no tokio runtime available to run the input listener")]
    NoRuntime,
}

// ============================================================================
// Trigger Errors
// ============================================================================

/// Errors building a [`TriggerKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriggerError {
    /// The key has no tokens
    #[error("trigger key must contain at least one token")]
    Empty,

    /// A token is empty (e.g. `"<ctrl>++h"`)
    #[error("empty token at position {position} in '{input}'")]
    EmptyToken {
        /// The full input being parsed
        input: String,
        /// Zero-based token position
        position: usize,
    },

    /// A `<name>` segment is malformed
    #[error("malformed special key '{segment}' in '{input}'")]
    MalformedSpecial {
        /// The full input being parsed
        input: String,
        /// The offending segment
        segment: String,
    },

    /// A bare segment longer than one character
    #[error("key '{segment}' in '{input}' must be a single character or <name>")]
    InvalidKey {
        /// The full input being parsed
        input: String,
        /// The offending segment
        segment: String,
    },
}

/// Errors parsing the textual signal notation (`+A`, `-A`, `!<ctrl>+h`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalParseError {
    /// The notation has no recognised prefix
    #[error("unrecognised signal '{0}' (expected +TOKEN, -TOKEN or !HOTKEY)")]
    UnknownPrefix(String),

    /// A press or release without a token name
    #[error("signal '{0}' is missing a token name")]
    MissingToken(String),

    /// The activation hotkey is invalid
    #[error("invalid activation '{input}': {source}")]
    Activation {
        /// The raw notation
        input: String,
        /// Why the hotkey was rejected
        source: TriggerError,
    },
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Configuration validation failed
    #[error("validation failed for {path}")]
    ValidationError {
        /// Path to the configuration file
        path: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },

    /// Referenced configuration file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Configuration file exceeds the size limit
    #[error("{path} is {size} bytes (limit: {limit})")]
    TooLarge {
        /// Path to the configuration file
        path: PathBuf,
        /// Actual size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found during configuration validation.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Path to the problematic field (e.g., "triggers[2].sequence")
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Validation failure that prevents the configuration from being used
    Error,
    /// Potential issue that does not prevent loading
    Warning,
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `seqrec` operations.
pub type Result<T> = std::result::Result<T, SeqrecError>;

// ============================================================================
// Tests
// ============================================================================
