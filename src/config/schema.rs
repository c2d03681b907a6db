//! Configuration schema types
//!
//! These types are deserialized from YAML recorder configuration files.

use serde::{Deserialize, Serialize};

// ============================================================================
// Top-Level Configuration
// ============================================================================

/// Root configuration: recorder settings plus the trigger table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct RecorderConfig {
    /// Recorder settings
    #[serde(default)]
    pub recorder: RecorderSettings,

    /// Trigger definitions, registered in file order
    #[serde(default)]
    pub triggers: Vec<TriggerConfig>,
}

/// Default tick interval for the `listen` loop.
pub const DEFAULT_TICK_INTERVAL: &str = "16ms";

fn default_tick_interval() -> String {
    DEFAULT_TICK_INTERVAL.to_string()
}

/// Recorder-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct RecorderSettings {
    /// Token whose hold window records a sequence; enables latched detection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_modifier: Option<String>,

    /// Abandon a recording window open for more than this many ticks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording_timeout_ticks: Option<u64>,

    /// Tick interval as a humantime duration (`16ms`, `1s`)
    #[serde(default = "default_tick_interval")]
    pub tick_interval: String,
}

impl Default for RecorderSettings {
    fn default() -> Self {
        Self {
            record_modifier: None,
            recording_timeout_ticks: None,
            tick_interval: default_tick_interval(),
        }
    }
}

// ============================================================================
// Triggers
// ============================================================================

/// One trigger binding. Exactly one of `hotkey` or `sequence` must be set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct TriggerConfig {
    /// Hotkey notation for edge detection, e.g. `<ctrl>+h`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotkey: Option<String>,

    /// Token sequence for latched detection, e.g. `[A, B]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<Vec<String>>,

    /// Callback bound to the trigger
    pub callback: CallbackConfig,
}

/// Built-in callback selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct CallbackConfig {
    /// Which built-in callback to instantiate
    pub kind: CallbackKind,

    /// Name reported in logs and events
    pub name: String,
}

/// Built-in callback kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallbackKind {
    /// Counts updates and reports occurrence durations
    Stopwatch,
    /// Logs every lifecycle call
    Log,
}
