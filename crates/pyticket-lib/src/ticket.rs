//! Ticket metadata.
//!
//! A `MetaTicket` is one record of the tickets file: name, status, tags and
//! modification time. Names and tags share one charset rule.
//!
//! Three persisted shapes exist:
//! - `name status (tag1,tag2)` (text line, pre-mtime repositories)
//! - `name status (tag1,tag2) mtime` (legacy text line)
//! - `{"name", "status", "tags", "mtime"}` JSON records (current)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TicketError};

/// Characters allowed in ticket and tag names besides ASCII alphanumerics.
pub const NAME_PUNCTUATION: &[char] = &['-', '_', '@', '.'];

/// Ticket lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Opened,
    Closed,
}

impl Status {
    pub const ALL: [Self; 2] = [Self::Opened, Self::Closed];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Opened => "opened",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = TicketError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "opened" => Ok(Self::Opened),
            "closed" => Ok(Self::Closed),
            other => Err(TicketError::InvalidStatus {
                status: other.to_string(),
            }),
        }
    }
}

/// True iff `name` is non-empty, does not start with `-`, and only uses
/// `[A-Za-z0-9-_@.]`.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || NAME_PUNCTUATION.contains(&c))
}

/// Tags follow the ticket name rule.
#[must_use]
pub fn is_valid_tag(tag: &str) -> bool {
    is_valid_name(tag)
}

/// True iff `status` is `opened` or `closed`.
#[must_use]
pub fn is_valid_status(status: &str) -> bool {
    status.parse::<Status>().is_ok()
}

/// Ticket metadata record.
///
/// Equality ignores `mtime`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaTicket {
    pub name: String,
    pub status: Status,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Seconds since the epoch of the last content or metadata change.
    #[serde(default)]
    pub mtime: f64,
}

impl PartialEq for MetaTicket {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.status == other.status && self.tags == other.tags
    }
}

impl Eq for MetaTicket {}

impl MetaTicket {
    #[must_use]
    pub fn new(name: impl Into<String>, status: Status, tags: Vec<String>, mtime: f64) -> Self {
        Self {
            name: name.into(),
            status,
            tags,
            mtime,
        }
    }

    /// Check the name and every tag.
    ///
    /// # Errors
    ///
    /// Returns `InvalidName` or `InvalidTag` for the first offending value.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_name(&self.name) {
            return Err(TicketError::InvalidName {
                name: self.name.clone(),
            });
        }
        validate_tags(&self.tags)
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// True if the ticket carries every tag of `required`.
    #[must_use]
    pub fn has_all_tags(&self, required: &[String]) -> bool {
        required.iter().all(|tag| self.has_tag(tag))
    }

    /// Serialize as `name status (tag1,tag2)`.
    #[must_use]
    pub fn to_line(&self) -> String {
        format!("{} {} ({})", self.name, self.status, self.tags.join(","))
    }

    /// Serialize as `name status (tag1,tag2) mtime`.
    #[must_use]
    pub fn to_legacy_line(&self) -> String {
        format!("{} {}", self.to_line(), self.mtime)
    }

    /// Parse a `name status (tags)` line. The result has a zero mtime.
    ///
    /// # Errors
    ///
    /// Returns `LineParse` on a wrong field count or missing parentheses, and
    /// the matching validation error for a bad name, status or tag.
    pub fn parse_line(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split(' ').collect();
        if fields.len() != 3 {
            return Err(TicketError::line_parse(
                line,
                format!("expected 3 fields, found {}", fields.len()),
            ));
        }
        Self::from_fields(line, fields[0], fields[1], fields[2], 0.0)
    }

    /// Parse a `name status (tags) mtime` line.
    ///
    /// # Errors
    ///
    /// Same as [`MetaTicket::parse_line`], plus `LineParse` if the mtime is
    /// not a number.
    pub fn parse_legacy_line(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split(' ').collect();
        if fields.len() != 4 {
            return Err(TicketError::line_parse(
                line,
                format!("expected 4 fields, found {}", fields.len()),
            ));
        }
        let mtime: f64 = fields[3]
            .parse()
            .map_err(|_| TicketError::line_parse(line, format!("invalid mtime '{}'", fields[3])))?;
        Self::from_fields(line, fields[0], fields[1], fields[2], mtime)
    }

    fn from_fields(line: &str, name: &str, status: &str, tags: &str, mtime: f64) -> Result<Self> {
        if !is_valid_name(name) {
            return Err(TicketError::InvalidName {
                name: name.to_string(),
            });
        }
        let status: Status = status.parse()?;
        let inner = tags
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| TicketError::line_parse(line, "tags must be enclosed in parentheses"))?;
        let tags: Vec<String> = if inner.is_empty() {
            Vec::new()
        } else {
            inner.split(',').map(str::to_string).collect()
        };
        validate_tags(&tags)?;
        Ok(Self::new(name, status, tags, mtime))
    }
}

/// Validate every tag of a list.
///
/// # Errors
///
/// Returns `InvalidTag` for the first invalid tag.
pub fn validate_tags<S: AsRef<str>>(tags: &[S]) -> Result<()> {
    match tags.iter().find(|tag| !is_valid_tag(tag.as_ref())) {
        Some(tag) => Err(TicketError::InvalidTag {
            tag: tag.as_ref().to_string(),
        }),
        None => Ok(()),
    }
}
