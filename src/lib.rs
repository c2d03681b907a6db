//! `seqrec` - sequence-triggered lifecycle recorder
//!
//! Binds ordered input sequences (controller button combos, keyboard
//! hotkeys) to callbacks with a three-phase lifecycle. The first completion
//! of a trigger calls `begin`, every following tick calls `update`, and the
//! next completion calls `end` and re-arms the trigger.
//!
//! ```
//! use seqrec::callback::LifecycleCallback;
//! use seqrec::input::InputEvent;
//! use seqrec::recorder::{Recorder, RecorderOptions};
//! use seqrec::trigger::{Token, TriggerKey};
//!
//! struct Counter(u32);
//!
//! impl LifecycleCallback<()> for Counter {
//!     fn name(&self) -> &str {
//!         "counter"
//!     }
//!
//!     fn update(&mut self, _ctx: &()) {
//!         self.0 += 1;
//!     }
//! }
//!
//! let mut recorder = Recorder::with_options(RecorderOptions {
//!     record_modifier: Some(Token::new("Start")),
//!     ..RecorderOptions::default()
//! });
//! let key = TriggerKey::from_tokens(["A", "B"]).unwrap();
//! recorder.register(key.clone(), Counter(0));
//!
//! recorder.tick(&(), [
//!     InputEvent::pressed("Start"),
//!     InputEvent::released("A"),
//!     InputEvent::released("B"),
//!     InputEvent::released("Start"),
//! ]);
//! assert!(recorder.phase(&key).is_some_and(|p| p.is_active()));
//! ```

pub mod callback;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod observability;
pub mod phase;
pub mod recorder;
pub mod registry;
pub mod script;
pub mod tick;
pub mod trigger;
