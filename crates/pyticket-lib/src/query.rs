//! Filter types for ticket listing.

use crate::ticket::{MetaTicket, Status};
use crate::util::is_descendant;

/// Filter options for listing tickets. Filters compose by conjunction.
#[derive(Debug, Clone, Default)]
pub struct ListFilters {
    /// Restrict to this ticket and its descendants.
    pub root: Option<String>,
    pub status: Option<Status>,
    /// Tickets must carry every one of these tags.
    pub tags: Vec<String>,
}

impl ListFilters {
    #[must_use]
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    #[must_use]
    pub const fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// True if `ticket` passes every filter.
    #[must_use]
    pub fn matches(&self, ticket: &MetaTicket) -> bool {
        let in_subtree = self.root.as_deref().is_none_or(|root| {
            root.is_empty() || ticket.name == root || is_descendant(&ticket.name, root)
        });
        in_subtree
            && self.status.is_none_or(|status| ticket.status == status)
            && ticket.has_all_tags(&self.tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_everything() {
        let t = MetaTicket::new("a", Status::Closed, vec![], 0.0);
        assert!(ListFilters::default().matches(&t));
    }

    #[test]
    fn test_conjunction() {
        let t = MetaTicket::new("a.b", Status::Opened, vec!["x".into(), "y".into()], 0.0);
        let filters = ListFilters::default()
            .with_root("a")
            .with_status(Status::Opened)
            .with_tags(["x"]);
        assert!(filters.matches(&t));
        assert!(!filters.clone().with_status(Status::Closed).matches(&t));
        assert!(!filters.clone().with_root("ab").matches(&t));
        assert!(!filters.with_tags(["x", "z"]).matches(&t));
    }
}
