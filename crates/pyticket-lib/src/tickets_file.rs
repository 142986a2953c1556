//! Tickets metadata file I/O.
//!
//! The file is a JSON array of `MetaTicket` records, written one record per
//! line so diffs stay readable. An empty file is an empty repository.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{Result, TicketError};
use crate::ticket::MetaTicket;

/// Load every ticket record from the tickets file.
///
/// Each record is validated with the same rules as ticket creation.
///
/// # Errors
///
/// Returns `Io` if the file cannot be read, `MetadataParse` if the JSON is
/// malformed, or a validation error for an invalid record.
pub fn load(path: &Path) -> Result<Vec<MetaTicket>> {
    let raw = fs::read_to_string(path)?;
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let values: Vec<serde_json::Value> =
        serde_json::from_str(&raw).map_err(|e| TicketError::MetadataParse {
            entry: 0,
            reason: e.to_string(),
        })?;

    values
        .into_iter()
        .enumerate()
        .map(|(idx, value)| {
            let ticket: MetaTicket =
                serde_json::from_value(value).map_err(|e| TicketError::MetadataParse {
                    entry: idx + 1,
                    reason: e.to_string(),
                })?;
            ticket.validate()?;
            Ok(ticket)
        })
        .collect()
}

/// Replace the tickets file with the given records.
///
/// Writes to a temporary sibling then renames it over the target, so a crash
/// never leaves a half-written file behind.
///
/// # Errors
///
/// Returns `Io` if the file cannot be written.
pub fn save<'a>(path: &Path, tickets: impl IntoIterator<Item = &'a MetaTicket>) -> Result<()> {
    let mut body = String::from("[");
    for (idx, ticket) in tickets.into_iter().enumerate() {
        if idx > 0 {
            body.push(',');
        }
        body.push('\n');
        body.push_str(&serde_json::to_string(ticket)?);
    }
    body.push_str("\n]\n");

    let tmp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&tmp_path)?;
    file.write_all(body.as_bytes())?;
    file.flush()?;
    drop(file);

    fs::rename(&tmp_path, path)?;
    Ok(())
}
