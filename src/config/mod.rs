//! Configuration module
//!
//! Loads and validates recorder configuration files and builds a
//! [`Recorder`](crate::recorder::Recorder) from them.

pub mod build;
pub mod loader;
pub mod schema;
pub mod validation;

pub use build::{BuiltRecorder, build};
pub use loader::{ConfigLimits, ConfigLoader, LoadResult, LoadWarning, LoaderOptions};
pub use schema::*;
pub use validation::{ValidationResult, Validator, suggest_button};
