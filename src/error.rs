//! Error types for the `pyticket` command line.
//!
//! Repository failures come from `pyticket_lib` and pass through unchanged;
//! this layer only adds what the command line itself can get wrong.

use std::path::PathBuf;

use pyticket_lib::TicketError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Ticket(#[from] TicketError),

    // === Configuration Errors ===
    #[error("'{key}' is not a valid configuration key")]
    InvalidConfigKey { key: String },

    #[error("invalid configuration file {}: {reason}", path.display())]
    ConfigParse { path: PathBuf, reason: String },

    #[error("cannot locate the pyticket home directory (set PYTICKET_HOME or HOME)")]
    HomeNotFound,

    // === External Tools ===
    #[error("invalid editor command '{command}': {reason}")]
    EditorCommand { command: String, reason: String },

    #[error("editor '{command}' exited with {status}")]
    EditorFailed { command: String, status: String },

    #[error("{} is not a git repository", path.display())]
    NotAGitRepository { path: PathBuf },

    #[error("git {command} failed: {stderr}")]
    Git { command: String, stderr: String },

    // === I/O ===
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
