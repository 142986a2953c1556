//! On-disk layout of a repository.
//!
//! ```text
//! <root>/.pyticket/
//!   contents/<ticket-name>
//!   templates/<template-name>
//!   tickets
//!   working
//!   migration
//! ```

use std::path::{Path, PathBuf};

/// Name of the repository directory created under the root.
pub const REPOSITORY_DIR: &str = ".pyticket";

/// Paths of every repository file, derived from one root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
    repository: PathBuf,
}

impl Layout {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let repository = root.join(REPOSITORY_DIR);
        Self { root, repository }
    }

    /// Layout whose repository directory is `repository` itself.
    ///
    /// Migrations operate on the `.pyticket` directory directly.
    #[must_use]
    pub fn from_repository_dir(repository: &Path) -> Self {
        let root = repository
            .parent()
            .map_or_else(|| repository.to_path_buf(), Path::to_path_buf);
        Self {
            root,
            repository: repository.to_path_buf(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn repository(&self) -> &Path {
        &self.repository
    }

    #[must_use]
    pub fn contents(&self) -> PathBuf {
        self.repository.join("contents")
    }

    #[must_use]
    pub fn content(&self, name: &str) -> PathBuf {
        self.contents().join(name)
    }

    #[must_use]
    pub fn templates(&self) -> PathBuf {
        self.repository.join("templates")
    }

    #[must_use]
    pub fn template(&self, name: &str) -> PathBuf {
        self.templates().join(name)
    }

    #[must_use]
    pub fn tickets_file(&self) -> PathBuf {
        self.repository.join("tickets")
    }

    #[must_use]
    pub fn working_file(&self) -> PathBuf {
        self.repository.join("working")
    }

    #[must_use]
    pub fn migration_file(&self) -> PathBuf {
        self.repository.join("migration")
    }

    /// True if the repository directory exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.repository.is_dir()
    }
}
