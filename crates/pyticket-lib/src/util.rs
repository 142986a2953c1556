//! Timestamp and dotted-name helpers.

use chrono::{DateTime, Utc};
use std::time::SystemTime;

// ============================================================================
// Timestamps
// ============================================================================

/// Current time as floating point seconds since the Unix epoch.
#[must_use]
pub fn now_timestamp() -> f64 {
    to_timestamp(Utc::now())
}

/// Convert a UTC datetime to floating point epoch seconds.
#[must_use]
pub fn to_timestamp(time: DateTime<Utc>) -> f64 {
    time.timestamp_micros() as f64 / 1_000_000.0
}

/// Convert a filesystem time (e.g. a content file's mtime) to epoch seconds.
#[must_use]
pub fn system_time_to_timestamp(time: SystemTime) -> f64 {
    to_timestamp(DateTime::<Utc>::from(time))
}

/// Convert epoch seconds back to a UTC datetime.
///
/// Out-of-range values clamp to the epoch.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn from_timestamp(timestamp: f64) -> DateTime<Utc> {
    let micros = (timestamp * 1_000_000.0).round() as i64;
    DateTime::from_timestamp_micros(micros).unwrap_or_default()
}

/// Format epoch seconds as `%m/%d/%Y %H:%M:%S` in UTC.
#[must_use]
pub fn format_timestamp(timestamp: f64) -> String {
    from_timestamp(timestamp)
        .format("%m/%d/%Y %H:%M:%S")
        .to_string()
}

// ============================================================================
// Dotted names
// ============================================================================

/// Name of the parent ticket (the name without its last dot-segment).
///
/// Root tickets have no parent.
#[must_use]
pub fn parent_name(name: &str) -> Option<&str> {
    name.rfind('.').map(|dot| &name[..dot])
}

/// Every ancestor of `name`, nearest first.
pub fn ancestors(name: &str) -> impl Iterator<Item = &str> {
    std::iter::successors(parent_name(name), |current| parent_name(current))
}

/// True if `candidate` is a strict (direct or transitive) descendant of `name`.
#[must_use]
pub fn is_descendant(candidate: &str, name: &str) -> bool {
    candidate.len() > name.len() + 1
        && candidate.starts_with(name)
        && candidate.as_bytes()[name.len()] == b'.'
}

/// True if `candidate` is a direct child of `name`.
#[must_use]
pub fn is_direct_child(candidate: &str, name: &str) -> bool {
    parent_name(candidate) == Some(name)
}

/// Rebase `name` from the `old_root` subtree onto `new_root`.
///
/// `name` must be `old_root` itself or one of its descendants.
#[must_use]
pub fn rebase_name(name: &str, old_root: &str, new_root: &str) -> String {
    format!("{new_root}{}", &name[old_root.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_name() {
        assert_eq!(parent_name("root"), None);
        assert_eq!(parent_name("root.child"), Some("root"));
        assert_eq!(parent_name("a.b.c"), Some("a.b"));
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let chain: Vec<&str> = ancestors("a.b.c.d").collect();
        assert_eq!(chain, vec!["a.b.c", "a.b", "a"]);
        assert_eq!(ancestors("a").count(), 0);
    }

    #[test]
    fn test_is_descendant_requires_dot_boundary() {
        assert!(is_descendant("a.b", "a"));
        assert!(is_descendant("a.b.c", "a"));
        assert!(!is_descendant("ab", "a"));
        assert!(!is_descendant("a", "a"));
        assert!(!is_descendant("a.", "a"));
        assert!(is_direct_child("a.b", "a"));
        assert!(!is_direct_child("a.b.c", "a"));
    }

    #[test]
    fn test_rebase_name() {
        assert_eq!(rebase_name("a", "a", "x"), "x");
        assert_eq!(rebase_name("a.b.c", "a", "x.y"), "x.y.b.c");
    }

    #[test]
    fn test_timestamp_format_is_utc() {
        assert_eq!(format_timestamp(0.0), "01/01/1970 00:00:00");
        assert_eq!(format_timestamp(86_400.5), "01/02/1970 00:00:00");
    }

    #[test]
    fn test_timestamp_roundtrip_keeps_micros() {
        let ts = 1_700_000_000.123_456;
        let back = to_timestamp(from_timestamp(ts));
        assert!((back - ts).abs() < 1e-6);
    }
}
