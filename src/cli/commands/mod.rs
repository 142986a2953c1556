//! Command implementations, one module per command.

pub mod completions;
pub mod configure;
pub mod create;
pub mod delete;
pub mod edit;
pub mod init;
pub mod list;
pub mod rename;
pub mod show;
pub mod status;
pub mod table;
pub mod tags;
pub mod version;
pub mod works_on;

use std::path::{Path, PathBuf};

use pyticket_lib::{ListFilters, Repository, Status};

use crate::cli::FilterArgs;
use crate::config::{self, Configuration};
use crate::error::Result;

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Directory holding `.pyticket`.
    pub root: PathBuf,
    pub json: bool,
}

impl CommandContext {
    #[must_use]
    pub fn new(directory: &Path, json: bool) -> Self {
        let root = dunce::canonicalize(directory).unwrap_or_else(|_| directory.to_path_buf());
        Self { root, json }
    }

    /// Open the repository under `root`, migrating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no repository or it cannot be loaded.
    pub fn open_repository(&self) -> Result<Repository> {
        Ok(Repository::open(&self.root)?)
    }

    /// Print `value` as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn print_json<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

/// Editor command from the user configuration.
///
/// # Errors
///
/// Returns an error if the configuration cannot be read.
pub fn configured_editor() -> Result<String> {
    let home = config::pyticket_home_dir()?;
    Ok(Configuration::load(&home)?.editor())
}

/// Build repository list filters from the CLI filter flags.
#[must_use]
pub fn build_filters(root: Option<&str>, args: &FilterArgs) -> ListFilters {
    let mut filters = ListFilters::default().with_tags(args.tags.iter().cloned());
    if let Some(root) = root {
        filters = filters.with_root(root);
    }
    if args.opened {
        filters = filters.with_status(Status::Opened);
    } else if args.closed {
        filters = filters.with_status(Status::Closed);
    }
    filters
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filters() {
        let args = FilterArgs {
            opened: false,
            closed: true,
            tags: vec!["x".to_string()],
        };
        let filters = build_filters(Some("a"), &args);
        assert_eq!(filters.root.as_deref(), Some("a"));
        assert_eq!(filters.status, Some(Status::Closed));
        assert_eq!(filters.tags, vec!["x"]);

        let filters = build_filters(None, &FilterArgs::default());
        assert!(filters.root.is_none());
        assert!(filters.status.is_none());
        assert!(filters.tags.is_empty());
    }
}
