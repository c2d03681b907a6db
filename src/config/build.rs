//! Turns a validated [`RecorderConfig`] into a running [`Recorder`].

use std::time::Duration;

use tracing::warn;

use crate::callback::builtin;
use crate::config::schema::{RecorderConfig, RecorderSettings, TriggerConfig};
use crate::error::{ConfigError, TriggerError};
use crate::input::GamepadButton;
use crate::recorder::{Recorder, RecorderOptions};
use crate::tick::TickContext;
use crate::trigger::{Token, TriggerKey};

/// A recorder built from configuration, with its loop settings.
#[derive(Debug)]
pub struct BuiltRecorder {
    /// Recorder with every configured trigger registered
    pub recorder: Recorder<TickContext>,
    /// Interval between ticks
    pub tick_interval: Duration,
    /// Triggers skipped because an earlier entry already bound the same key
    pub skipped: Vec<TriggerKey>,
}

/// Canonical token name for a gamepad button written by its evdev name
/// (`BTN_SOUTH` becomes `A`). Other names pass through unchanged.
#[must_use]
pub fn canonical_token(name: &str) -> &str {
    GamepadButton::from_name(name).map_or(name, |button| button.name())
}

/// Resolves the trigger key of a configuration entry.
///
/// A `hotkey` is parsed with hotkey notation; a `sequence` is taken token by
/// token, with evdev button names mapped to the names input events carry.
/// An entry with neither yields [`TriggerError::Empty`].
///
/// # Errors
///
/// Returns the parse failure for a malformed hotkey or an empty sequence.
pub fn trigger_key(trigger: &TriggerConfig) -> Result<TriggerKey, TriggerError> {
    match (&trigger.hotkey, &trigger.sequence) {
        (Some(hotkey), _) => TriggerKey::parse_hotkey(hotkey),
        (None, Some(sequence)) => {
            TriggerKey::from_tokens(sequence.iter().map(|name| canonical_token(name)))
        }
        (None, None) => Err(TriggerError::Empty),
    }
}

/// Parses the humantime tick interval; zero is rejected.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for an unparseable or zero interval.
pub fn tick_interval(settings: &RecorderSettings) -> Result<Duration, ConfigError> {
    let invalid = |expected: &str| ConfigError::InvalidValue {
        field: "recorder.tick_interval".to_string(),
        value: settings.tick_interval.clone(),
        expected: expected.to_string(),
    };
    let interval = humantime::parse_duration(&settings.tick_interval)
        .map_err(|e| invalid(&format!("a duration such as 16ms ({e})")))?;
    if interval.is_zero() {
        return Err(invalid("a non-zero duration"));
    }
    Ok(interval)
}

/// Recorder options described by the settings block.
#[must_use]
pub fn recorder_options(settings: &RecorderSettings) -> RecorderOptions {
    RecorderOptions {
        record_modifier: settings
            .record_modifier
            .as_deref()
            .map(|name| Token::new(canonical_token(name))),
        recording_timeout_ticks: settings.recording_timeout_ticks,
    }
}

/// Builds a recorder and registers every trigger in file order.
///
/// Duplicate keys keep the first binding; later ones are reported in
/// [`BuiltRecorder::skipped`].
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if the tick interval or a trigger
/// key is invalid. Configurations accepted by the loader never fail here.
pub fn build(config: &RecorderConfig) -> Result<BuiltRecorder, ConfigError> {
    let tick_interval = tick_interval(&config.recorder)?;
    let mut recorder = Recorder::with_options(recorder_options(&config.recorder));
    let mut skipped = Vec::new();

    for (index, trigger) in config.triggers.iter().enumerate() {
        let key = trigger_key(trigger).map_err(|e| ConfigError::InvalidValue {
            field: format!("triggers[{index}]"),
            value: trigger
                .hotkey
                .clone()
                .or_else(|| trigger.sequence.as_ref().map(|s| s.join("+")))
                .unwrap_or_default(),
            expected: e.to_string(),
        })?;
        if !recorder.register(key.clone(), builtin::from_config(&trigger.callback)) {
            warn!(trigger = %key, index, "duplicate trigger skipped");
            skipped.push(key);
        }
    }

    Ok(BuiltRecorder {
        recorder,
        tick_interval,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{CallbackConfig, CallbackKind};
    use crate::phase::Phase;

    fn trigger(hotkey: Option<&str>, sequence: Option<&[&str]>, name: &str) -> TriggerConfig {
        TriggerConfig {
            hotkey: hotkey.map(str::to_string),
            sequence: sequence.map(|s| s.iter().map(|t| (*t).to_string()).collect()),
            callback: CallbackConfig {
                kind: CallbackKind::Log,
                name: name.to_string(),
            },
        }
    }

    #[test]
    fn test_trigger_key_from_hotkey_and_sequence() {
        let key = trigger_key(&trigger(Some("<Ctrl>+H"), None, "a")).unwrap();
        assert_eq!(key.to_string(), "<ctrl>+h");

        let key = trigger_key(&trigger(None, Some(&["A", "B"]), "b")).unwrap();
        assert_eq!(key.to_string(), "A+B");

        assert_eq!(
            trigger_key(&trigger(None, None, "c")),
            Err(TriggerError::Empty)
        );
    }

    #[test]
    fn test_evdev_names_are_canonicalised() {
        let key = trigger_key(&trigger(None, Some(&["BTN_SOUTH", "BTN_EAST", "X"]), "a")).unwrap();
        assert_eq!(key.to_string(), "A+B+X");
        assert_eq!(canonical_token("BTN_START"), "Start");
        assert_eq!(canonical_token("h"), "h");
    }

    #[test]
    fn test_evdev_sequence_matches_raw_gamepad_events() {
        let config = RecorderConfig {
            recorder: RecorderSettings {
                record_modifier: Some("BTN_START".to_string()),
                ..RecorderSettings::default()
            },
            triggers: vec![trigger(None, Some(&["BTN_SOUTH", "BTN_EAST"]), "combo")],
        };
        let mut built = build(&config).unwrap();

        let start = GamepadButton::Start.code();
        let events = [
            (start, 1),
            (GamepadButton::A.code(), 1),
            (GamepadButton::A.code(), 0),
            (GamepadButton::B.code(), 1),
            (GamepadButton::B.code(), 0),
            (start, 0),
        ]
        .into_iter()
        .filter_map(|(code, value)| GamepadButton::event(code, value));

        let ctx = TickContext::synthetic(1, built.tick_interval);
        let report = built.recorder.tick(&ctx, events);
        assert_eq!(report.transitions.len(), 1);

        let key = TriggerKey::from_tokens(["A", "B"]).unwrap();
        assert_eq!(built.recorder.phase(&key), Some(Phase::Update));
    }

    #[test]
    fn test_tick_interval() {
        let mut settings = RecorderSettings::default();
        assert_eq!(tick_interval(&settings).unwrap(), Duration::from_millis(16));

        settings.tick_interval = "0s".to_string();
        assert!(tick_interval(&settings).is_err());

        settings.tick_interval = "soon".to_string();
        assert!(matches!(
            tick_interval(&settings),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_build_registers_in_order_and_skips_duplicates() {
        let config = RecorderConfig {
            recorder: RecorderSettings {
                record_modifier: Some("Start".to_string()),
                ..RecorderSettings::default()
            },
            triggers: vec![
                trigger(Some("<ctrl>+h"), None, "first"),
                trigger(None, Some(&["A", "B"]), "combo"),
                trigger(Some("<CTRL>+H"), None, "second"),
            ],
        };

        let built = build(&config).unwrap();
        assert_eq!(built.recorder.len(), 2);
        assert_eq!(built.skipped.len(), 1);

        let key = TriggerKey::parse_hotkey("<ctrl>+h").unwrap();
        let names: Vec<&str> = built
            .recorder
            .registry()
            .iter()
            .map(|(_, entry)| entry.callback_name())
            .collect();
        assert_eq!(names, vec!["first", "combo"]);
        assert_eq!(built.recorder.phase(&key), Some(Phase::Begin));
    }
}
