//! Telecom inventory CLI library.
//!
//! Subcommand handlers and output formatting for the `telecom-cli` binary.

pub mod commands;
pub mod output;
