//! Error types for `pyticket-lib`.
//!
//! Every failure of the ticket repository is a `TicketError`. Each variant
//! renders the message shown to the user, so callers only need `Display`.

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for ticket repository operations.
#[derive(Error, Debug)]
pub enum TicketError {
    // === Repository Errors ===
    /// No `.pyticket` directory under the given root.
    #[error("{} is not a pyticket repository", path.display())]
    NotARepository { path: PathBuf },

    /// `create` was called on a root that already holds a repository.
    #[error("there already exists a pyticket repository at '{}'", path.display())]
    AlreadyInitialized { path: PathBuf },

    // === Ticket Errors ===
    /// Ticket with the given name was not found.
    #[error("ticket '{name}' doesn't exist")]
    TicketNotFound { name: String },

    /// A ticket with this name already exists.
    #[error("ticket '{name}' already exists")]
    TicketExists { name: String },

    /// The dotted parent of a new or renamed ticket is missing.
    #[error("parent ticket '{parent}' doesn't exist")]
    ParentNotFound { parent: String },

    /// A ticket cannot be moved below itself.
    #[error("cannot rename '{name}' to '{new_name}': a ticket cannot become its own descendant")]
    RenameIntoSubtree { name: String, new_name: String },

    /// Closing was refused because a descendant is still opened.
    #[error("trying to close '{name}', but its child '{child}' is opened")]
    OpenedChild { name: String, child: String },

    /// Closed tickets cannot become the working ticket.
    #[error("'{name}' is a closed ticket")]
    ClosedTicket { name: String },

    /// The ticket exists but has no content file.
    #[error("ticket '{name}' has no content")]
    NoContent { name: String },

    // === Validation Errors ===
    /// Name contains characters outside `[A-Za-z0-9-_@.]`, is empty or starts with `-`.
    #[error("'{name}' is not a valid ticket name")]
    InvalidName { name: String },

    /// Tag fails the same charset rule as ticket names.
    #[error("'{tag}' is not a valid tag name")]
    InvalidTag { tag: String },

    /// Status is neither `opened` nor `closed`.
    #[error("'{status}' is not a valid status")]
    InvalidStatus { status: String },

    // === Template Errors ===
    /// Requested template file is missing.
    #[error("template '{name}' doesn't exist")]
    TemplateNotFound { name: String },

    // === Metadata File Errors ===
    /// A text metadata line could not be parsed.
    #[error("malformed ticket line '{line}': {reason}")]
    LineParse { line: String, reason: String },

    /// An entry of the JSON metadata file is invalid.
    #[error("tickets file entry {entry}: {reason}")]
    MetadataParse { entry: usize, reason: String },

    // === Migration Errors ===
    /// The persisted migration counter is not an integer.
    #[error("invalid migration counter '{value}'")]
    MigrationCounter { value: String },

    /// A migration step failed; the counter was not advanced.
    #[error("migration {version} ({name}) failed: {source}")]
    Migration {
        version: usize,
        name: &'static str,
        #[source]
        source: Box<TicketError>,
    },

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TicketError {
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::TicketNotFound { name: name.into() }
    }

    #[must_use]
    pub fn line_parse(line: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LineParse {
            line: line.into(),
            reason: reason.into(),
        }
    }
}

/// Result type using `TicketError`.
pub type Result<T> = std::result::Result<T, TicketError>;
