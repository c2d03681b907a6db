//! Gamepad button mapping
//!
//! Stable mapping between Linux evdev key codes, evdev constant names and
//! the canonical token names used in trigger sequences (`A`, `B`, `X`, `Y`,
//! `Start`, ...). Raw key events for codes outside the table are ignored.
//!
//! With the `gilrs` feature, gilrs buttons and events convert into the same
//! tokens.

use std::fmt;
use std::str::FromStr;

use crate::trigger::Token;

use super::InputEvent;

/// A mapped controller button (Xbox layout names).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadButton {
    A,
    B,
    X,
    Y,
    LeftBumper,
    RightBumper,
    Back,
    Start,
    Guide,
    LeftStick,
    RightStick,
}

/// `(button, evdev code, canonical name, evdev names)`.
const TABLE: &[(GamepadButton, u16, &str, &[&str])] = &[
    (GamepadButton::A, 0x130, "A", &["BTN_SOUTH", "BTN_A"]),
    (GamepadButton::B, 0x131, "B", &["BTN_EAST", "BTN_B"]),
    (GamepadButton::X, 0x133, "X", &["BTN_NORTH", "BTN_X"]),
    (GamepadButton::Y, 0x134, "Y", &["BTN_WEST", "BTN_Y"]),
    (GamepadButton::LeftBumper, 0x136, "LB", &["BTN_TL"]),
    (GamepadButton::RightBumper, 0x137, "RB", &["BTN_TR"]),
    (GamepadButton::Back, 0x13a, "Back", &["BTN_SELECT"]),
    (GamepadButton::Start, 0x13b, "Start", &["BTN_START"]),
    (GamepadButton::Guide, 0x13c, "Guide", &["BTN_MODE"]),
    (GamepadButton::LeftStick, 0x13d, "LeftStick", &["BTN_THUMBL"]),
    (GamepadButton::RightStick, 0x13e, "RightStick", &["BTN_THUMBR"]),
];

impl GamepadButton {
    /// Every mapped button, in table order.
    #[must_use]
    pub fn all() -> impl Iterator<Item = Self> {
        TABLE.iter().map(|(button, ..)| *button)
    }

    fn row(self) -> &'static (Self, u16, &'static str, &'static [&'static str]) {
        // Every variant has exactly one row.
        TABLE
            .iter()
            .find(|(button, ..)| *button == self)
            .unwrap_or(&TABLE[0])
    }

    /// Linux evdev key code.
    #[must_use]
    pub fn code(self) -> u16 {
        self.row().1
    }

    /// Canonical token name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.row().2
    }

    /// Token for this button.
    #[must_use]
    pub fn token(self) -> Token {
        Token::new(self.name())
    }

    /// Looks up a button by evdev key code.
    #[must_use]
    pub fn from_code(code: u16) -> Option<Self> {
        TABLE
            .iter()
            .find(|(_, c, ..)| *c == code)
            .map(|(button, ..)| *button)
    }

    /// Looks up a button by canonical name or evdev constant name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        TABLE
            .iter()
            .find(|(_, _, canonical, evdev)| *canonical == name || evdev.contains(&name))
            .map(|(button, ..)| *button)
    }

    /// Canonical names of every mapped button.
    #[must_use]
    pub fn names() -> Vec<&'static str> {
        TABLE.iter().map(|(_, _, name, _)| *name).collect()
    }

    /// Converts a raw evdev key event into an [`InputEvent`].
    ///
    /// `value` follows evdev: `1` press, `0` release, `2` autorepeat.
    /// Autorepeat and unmapped codes yield `None`.
    #[must_use]
    pub fn event(code: u16, value: i32) -> Option<InputEvent> {
        let button = Self::from_code(code)?;
        match value {
            1 => Some(InputEvent::pressed(button.token())),
            0 => Some(InputEvent::released(button.token())),
            _ => None,
        }
    }
}

impl fmt::Display for GamepadButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GamepadButton {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown gamepad button '{s}'"))
    }
}

#[cfg(feature = "gilrs")]
mod gilrs_support {
    use gilrs::{Button, EventType};

    use super::GamepadButton;
    use crate::input::InputEvent;

    impl TryFrom<Button> for GamepadButton {
        type Error = Button;

        fn try_from(button: Button) -> Result<Self, Self::Error> {
            match button {
                Button::South => Ok(Self::A),
                Button::East => Ok(Self::B),
                Button::West => Ok(Self::X),
                Button::North => Ok(Self::Y),
                Button::LeftTrigger => Ok(Self::LeftBumper),
                Button::RightTrigger => Ok(Self::RightBumper),
                Button::Select => Ok(Self::Back),
                Button::Start => Ok(Self::Start),
                Button::Mode => Ok(Self::Guide),
                Button::LeftThumb => Ok(Self::LeftStick),
                Button::RightThumb => Ok(Self::RightStick),
                other => Err(other),
            }
        }
    }

    impl GamepadButton {
        /// Converts a gilrs event into an [`InputEvent`], if it is a press or
        /// release of a mapped button.
        #[must_use]
        pub fn from_gilrs_event(event: &EventType) -> Option<InputEvent> {
            match *event {
                EventType::ButtonPressed(button, _) => Self::try_from(button)
                    .ok()
                    .map(|b| InputEvent::pressed(b.token())),
                EventType::ButtonReleased(button, _) => Self::try_from(button)
                    .ok()
                    .map(|b| InputEvent::released(b.token())),
                _ => None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_buttons_are_mapped() {
        for name in ["A", "B", "X", "Y", "Start"] {
            assert!(GamepadButton::from_name(name).is_some(), "{name} missing");
        }
    }

    #[test]
    fn code_name_mapping_is_stable() {
        assert_eq!(GamepadButton::A.code(), 304);
        assert_eq!(GamepadButton::B.code(), 305);
        assert_eq!(GamepadButton::Start.code(), 315);
        assert_eq!(GamepadButton::from_code(315), Some(GamepadButton::Start));
        assert_eq!(GamepadButton::Start.name(), "Start");
    }

    #[test]
    fn mapping_is_bijective() {
        for button in GamepadButton::all() {
            assert_eq!(GamepadButton::from_code(button.code()), Some(button));
            assert_eq!(GamepadButton::from_name(button.name()), Some(button));
        }
    }

    #[test]
    fn evdev_names_resolve() {
        assert_eq!(GamepadButton::from_name("BTN_SOUTH"), Some(GamepadButton::A));
        assert_eq!(GamepadButton::from_name("BTN_START"), Some(GamepadButton::Start));
        assert_eq!("BTN_Y".parse::<GamepadButton>(), Ok(GamepadButton::Y));
        assert!("Strat".parse::<GamepadButton>().is_err());
    }

    #[test]
    fn raw_events_convert() {
        assert_eq!(GamepadButton::event(304, 1), Some(InputEvent::pressed("A")));
        assert_eq!(GamepadButton::event(304, 0), Some(InputEvent::released("A")));
        assert_eq!(GamepadButton::event(304, 2), None);
        assert_eq!(GamepadButton::event(0x2ff, 1), None);
    }
}
