//! Configuration validation
//!
//! Validation runs on the deserialized [`RecorderConfig`] and collects ALL
//! issues (it doesn't stop at the first) so users get complete feedback in
//! one pass.

use std::collections::HashSet;

use crate::config::build::{canonical_token, tick_interval, trigger_key};
use crate::config::loader::ConfigLimits;
use crate::config::schema::{RecorderConfig, TriggerConfig};
use crate::error::{Severity, ValidationIssue};
use crate::input::GamepadButton;
use crate::trigger::{Token, TriggerKey};

// ============================================================================
// Public API
// ============================================================================

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Configuration validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a configuration and returns the result.
    pub fn validate(&mut self, config: &RecorderConfig, limits: &ConfigLimits) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_settings(config);
        self.validate_triggers(config);
        self.validate_limits(config, limits);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    // ========================================================================
    // Recorder settings
    // ========================================================================

    fn validate_settings(&mut self, config: &RecorderConfig) {
        let settings = &config.recorder;

        if let Err(e) = tick_interval(settings) {
            self.add_error("recorder.tick_interval", &e.to_string());
        }

        if let Some(modifier) = &settings.record_modifier {
            if modifier.trim().is_empty() {
                self.add_error("recorder.record_modifier", "Record modifier cannot be empty");
            } else {
                self.suggest_button("recorder.record_modifier", modifier);
            }
        }

        if settings.recording_timeout_ticks == Some(0) {
            self.add_error(
                "recorder.recording_timeout_ticks",
                "Recording timeout must be at least one tick",
            );
        }
    }

    // ========================================================================
    // Triggers
    // ========================================================================

    fn validate_triggers(&mut self, config: &RecorderConfig) {
        let modifier = config
            .recorder
            .record_modifier
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .map(|m| Token::new(canonical_token(m)));
        let mut seen: HashSet<TriggerKey> = HashSet::new();

        for (index, trigger) in config.triggers.iter().enumerate() {
            let path = format!("triggers[{index}]");

            if trigger.callback.name.trim().is_empty() {
                self.add_error(
                    &format!("{path}.callback.name"),
                    "Callback name is required and cannot be empty",
                );
            }

            let Some(key) = self.validate_trigger_form(&path, trigger) else {
                continue;
            };

            if trigger.sequence.is_some() {
                self.validate_sequence(&path, &key, modifier.as_ref());
            }

            if !seen.insert(key.clone()) {
                self.add_warning(
                    &path,
                    &format!("Duplicate trigger '{key}'; this entry will be skipped"),
                );
            }
        }
    }

    /// Checks that exactly one of `hotkey`/`sequence` is set and resolves the key.
    fn validate_trigger_form(&mut self, path: &str, trigger: &TriggerConfig) -> Option<TriggerKey> {
        match (&trigger.hotkey, &trigger.sequence) {
            (Some(_), Some(_)) => {
                self.add_error(path, "Trigger cannot have both 'hotkey' and 'sequence'");
                None
            }
            (None, None) => {
                self.add_error(path, "Trigger must have either 'hotkey' or 'sequence'");
                None
            }
            (Some(_), None) => match trigger_key(trigger) {
                Ok(key) => Some(key),
                Err(e) => {
                    self.add_error(&format!("{path}.hotkey"), &format!("Invalid hotkey: {e}"));
                    None
                }
            },
            (None, Some(_)) => match trigger_key(trigger) {
                Ok(key) => Some(key),
                Err(e) => {
                    self.add_error(&format!("{path}.sequence"), &format!("Invalid sequence: {e}"));
                    None
                }
            },
        }
    }

    fn validate_sequence(&mut self, path: &str, key: &TriggerKey, modifier: Option<&Token>) {
        let sequence_path = format!("{path}.sequence");

        match modifier {
            Some(modifier) if key.contains(modifier) => {
                self.add_error(
                    &sequence_path,
                    &format!("Sequence cannot contain the record modifier '{modifier}'"),
                );
            }
            Some(_) => {}
            None => self.add_warning(
                &sequence_path,
                "Sequence trigger has no record modifier configured and can only fire \
                 through activations",
            ),
        }

        for (position, token) in key.tokens().iter().enumerate() {
            self.suggest_button(&format!("{sequence_path}[{position}]"), token.as_str());
        }
    }

    /// Warns when `name` looks like a misspelled gamepad button.
    fn suggest_button(&mut self, path: &str, name: &str) {
        if let Some(suggestion) = suggest_button(name) {
            self.add_warning(
                path,
                &format!("Unknown token '{name}'; did you mean '{suggestion}'?"),
            );
        }
    }

    // ========================================================================
    // Limits
    // ========================================================================

    fn validate_limits(&mut self, config: &RecorderConfig, limits: &ConfigLimits) {
        if config.triggers.len() > limits.max_triggers {
            self.add_error(
                "triggers",
                &format!(
                    "Too many triggers: {} (limit: {})",
                    config.triggers.len(),
                    limits.max_triggers
                ),
            );
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Adds an error to the collection.
    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    /// Adds a warning to the collection.
    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}

/// Suggests a gamepad button name for a token that is close to one.
///
/// Exact button names never get a suggestion. A candidate is offered when
/// its Damerau-Levenshtein distance is at most 2 and smaller than the
/// token's own length, so single-character keys like `c` are left alone.
#[must_use]
pub fn suggest_button(name: &str) -> Option<&'static str> {
    if GamepadButton::from_name(name).is_some() || name.starts_with('<') {
        return None;
    }
    GamepadButton::names()
        .into_iter()
        .map(|candidate| (candidate, strsim::damerau_levenshtein(name, candidate)))
        .filter(|(_, dist)| *dist <= 2 && *dist < name.chars().count())
        .min_by_key(|(_, dist)| *dist)
        .map(|(candidate, _)| candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(yaml: &str) -> ValidationResult {
        let config: RecorderConfig = serde_yaml::from_str(yaml).unwrap();
        Validator::new().validate(&config, &ConfigLimits::default())
    }

    fn messages(issues: &[ValidationIssue]) -> Vec<String> {
        issues.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_valid_config() {
        let result = validate(
            r#"
recorder: { record_modifier: Start }
triggers:
  - hotkey: "<ctrl>+h"
    callback: { kind: stopwatch, name: HelloWorld }
  - sequence: [A, B]
    callback: { kind: log, name: Combo }
"#,
        );
        assert!(result.is_valid(), "{:?}", messages(&result.errors));
        assert!(result.warnings.is_empty(), "{:?}", messages(&result.warnings));
    }

    #[test]
    fn test_both_and_neither() {
        let result = validate(
            r"
triggers:
  - hotkey: a
    sequence: [A]
    callback: { kind: log, name: x }
  - callback: { kind: log, name: y }
",
        );
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[0].path, "triggers[0]");
        assert_eq!(result.errors[1].path, "triggers[1]");
    }

    #[test]
    fn test_bad_hotkey_and_empty_sequence() {
        let result = validate(
            r#"
triggers:
  - hotkey: "<ctrl>+hello"
    callback: { kind: log, name: x }
  - sequence: []
    callback: { kind: log, name: y }
  - sequence: [A, ""]
    callback: { kind: log, name: z }
"#,
        );
        let paths: Vec<&str> = result.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "triggers[0].hotkey",
                "triggers[1].sequence",
                "triggers[2].sequence"
            ]
        );
    }

    #[test]
    fn test_sequence_containing_modifier() {
        let result = validate(
            r"
recorder: { record_modifier: Start }
triggers:
  - sequence: [A, Start]
    callback: { kind: log, name: x }
",
        );
        assert!(result.has_errors());
        assert!(result.errors[0].message.contains("record modifier"));
    }

    #[test]
    fn test_evdev_names_compare_as_canonical_buttons() {
        let result = validate(
            r"
recorder: { record_modifier: BTN_START }
triggers:
  - sequence: [A, B]
    callback: { kind: log, name: x }
  - sequence: [BTN_SOUTH, BTN_EAST]
    callback: { kind: log, name: y }
  - sequence: [X, Start]
    callback: { kind: log, name: z }
",
        );
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path, "triggers[2].sequence");
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].message.contains("Duplicate trigger 'A+B'"));
    }

    #[test]
    fn test_empty_callback_name() {
        let result = validate("triggers:\n  - hotkey: a\n    callback: { kind: log, name: '' }\n");
        assert_eq!(result.errors[0].path, "triggers[0].callback.name");
    }

    #[test]
    fn test_bad_tick_interval() {
        let result = validate("recorder: { tick_interval: fast }\n");
        assert_eq!(result.errors[0].path, "recorder.tick_interval");
    }

    #[test]
    fn test_zero_timeout() {
        let result = validate("recorder: { record_modifier: Start, recording_timeout_ticks: 0 }\n");
        assert_eq!(result.errors[0].path, "recorder.recording_timeout_ticks");
    }

    #[test]
    fn test_duplicate_warning() {
        let result = validate(
            r#"
triggers:
  - hotkey: "<ctrl>+h"
    callback: { kind: log, name: x }
  - hotkey: "<CTRL>+H"
    callback: { kind: log, name: y }
"#,
        );
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].path, "triggers[1]");
    }

    #[test]
    fn test_sequence_without_modifier_warns() {
        let result = validate("triggers:\n  - sequence: [A]\n    callback: { kind: log, name: x }\n");
        assert!(result.is_valid());
        assert_eq!(result.warnings[0].path, "triggers[0].sequence");
    }

    #[test]
    fn test_typo_suggestion() {
        let result = validate(
            r"
recorder: { record_modifier: Strat }
triggers:
  - sequence: [A, Bakc]
    callback: { kind: log, name: x }
",
        );
        assert!(result.is_valid());
        let warnings = messages(&result.warnings);
        assert!(warnings.iter().any(|w| w.contains("did you mean 'Start'")));
        assert!(warnings.iter().any(|w| w.contains("did you mean 'Back'")));
    }

    #[test]
    fn test_suggest_button() {
        assert_eq!(suggest_button("Strat"), Some("Start"));
        assert_eq!(suggest_button("Start"), None);
        assert_eq!(suggest_button("c"), None);
        assert_eq!(suggest_button("<ctrl>"), None);
        assert_eq!(suggest_button("Elephant"), None);
    }

    #[test]
    fn test_trigger_limit() {
        let config: RecorderConfig = serde_yaml::from_str(
            "triggers:\n  - hotkey: a\n    callback: { kind: log, name: x }\n  - hotkey: b\n    callback: { kind: log, name: y }\n",
        )
        .unwrap();
        let limits = ConfigLimits {
            max_triggers: 1,
            ..ConfigLimits::default()
        };
        let result = Validator::new().validate(&config, &limits);
        assert_eq!(result.errors[0].path, "triggers");
    }
}
