//! `pyticket` - Hierarchical ticket tracker library
//!
//! This crate provides the command-line front end of the `pyticket` tool.
//! The ticket model itself lives in `pyticket_lib`.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - User configuration (editor)
//! - [`editor`] - External editor launch
//! - [`error`] - Error types and handling
//! - [`format`] - Output formatting (list lines, tables, markup)
//! - [`git`] - Working-branch integration
//! - [`logging`] - Tracing subscriber setup

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod format;
pub mod git;
pub mod logging;

pub use error::{CliError, Result};

/// Run the CLI application.
///
/// This is the main entry point called from `main()`.
///
/// # Errors
///
/// Returns an error if command execution fails.
pub fn run() -> anyhow::Result<()> {
    cli::run()
}
