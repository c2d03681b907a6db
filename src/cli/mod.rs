//! Command-line interface
//!
//! Argument definitions and command handlers for the `seqrec` binary.

pub mod args;
pub mod commands;
