//! Git working-branch integration.
//!
//! Working on a ticket can switch git to a branch named after it. Pending
//! changes of the branch being left are parked in a marker commit
//! ([`MAGIC`]) and restored when that branch is checked out again.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{CliError, Result};

/// Message of the commit that parks uncommitted changes.
pub const MAGIC: &str = "Bl3ctr3F0r3v3r";

static BRANCH_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\*?\s+(?P<name>.*)$").expect("branch pattern compiles"));

/// Thin wrapper running `git` inside one work tree.
#[derive(Debug, Clone)]
pub struct Git {
    work_dir: PathBuf,
}

impl Git {
    /// Wrap the git repository at `work_dir`.
    ///
    /// # Errors
    ///
    /// Returns `NotAGitRepository` if `work_dir` has no `.git` directory.
    pub fn open(work_dir: impl Into<PathBuf>) -> Result<Self> {
        let work_dir = work_dir.into();
        if !is_git_repository(&work_dir) {
            return Err(CliError::NotAGitRepository { path: work_dir });
        }
        Ok(Self { work_dir })
    }

    /// Wrap `work_dir` without checking it holds a repository (used before `git init`).
    #[must_use]
    pub fn unchecked(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    #[must_use]
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn output(&self, args: &[&str]) -> Result<Output> {
        tracing::trace!("git {}", args.join(" "));
        Ok(Command::new("git")
            .arg("-C")
            .arg(&self.work_dir)
            .args(args)
            .output()?)
    }

    /// Run a git command and return its stdout.
    ///
    /// # Errors
    ///
    /// Returns `Git` with git's stderr if the command fails.
    pub fn call(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args)?;
        if !output.status.success() {
            return Err(CliError::Git {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// # Errors
    ///
    /// Returns `Git` if git fails.
    pub fn add(&self, name: &str) -> Result<()> {
        self.call(&["add", "--", name]).map(drop)
    }

    /// # Errors
    ///
    /// Returns `Git` if git fails.
    pub fn commit(&self, message: &str) -> Result<()> {
        self.call(&["commit", "-m", message]).map(drop)
    }

    /// Subjects of at most `count` commits, newest first.
    ///
    /// A repository without commits has an empty log.
    ///
    /// # Errors
    ///
    /// Returns `Io` if git cannot be run.
    pub fn log(&self, count: usize) -> Result<Vec<String>> {
        let limit = format!("-{count}");
        let output = self.output(&["log", limit.as_str(), "--format=%s"])?;
        if !output.status.success() {
            return Ok(Vec::new());
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect())
    }

    /// Modified files, unstaged first, then staged.
    ///
    /// # Errors
    ///
    /// Returns `Git` if git fails.
    pub fn diff_files(&self) -> Result<Vec<String>> {
        let mut files: Vec<String> = self
            .call(&["diff", "--name-only"])?
            .lines()
            .map(str::to_string)
            .collect();
        files.extend(
            self.call(&["diff", "--cached", "--name-only"])?
                .lines()
                .map(str::to_string),
        );
        Ok(files)
    }

    /// Park every pending change in a [`MAGIC`] commit.
    ///
    /// Returns false when there was nothing to park.
    ///
    /// # Errors
    ///
    /// Returns `Git` if git fails.
    pub fn push_changes(&self) -> Result<bool> {
        let files = self.diff_files()?;
        if files.is_empty() {
            return Ok(false);
        }
        for file in &files {
            self.add(file)?;
        }
        self.commit(MAGIC)?;
        tracing::info!("Parked {} changed file(s)", files.len());
        Ok(true)
    }

    /// Undo the [`MAGIC`] commit at `HEAD`, if there is one.
    ///
    /// Returns true when changes were restored.
    ///
    /// # Errors
    ///
    /// Returns `Git` if git fails.
    pub fn pop_changes(&self) -> Result<bool> {
        let is_magic = self.log(1)?.first().is_some_and(|subject| subject == MAGIC);
        if is_magic {
            self.call(&["reset", "HEAD~"])?;
            tracing::info!("Restored parked changes");
        }
        Ok(is_magic)
    }

    /// The checked out branch (if any) and every local branch.
    ///
    /// # Errors
    ///
    /// Returns `Git` if git fails.
    pub fn branches(&self) -> Result<(Option<String>, Vec<String>)> {
        Ok(parse_branches(&self.call(&["branch"])?))
    }

    /// Check out `name`, creating the branch when it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `Git` if git fails.
    pub fn set_current_branch(&self, name: &str) -> Result<()> {
        let (_, branches) = self.branches()?;
        if branches.iter().any(|branch| branch == name) {
            self.call(&["checkout", name])?;
        } else {
            self.call(&["checkout", "-b", name])?;
        }
        Ok(())
    }

    /// Switch to the branch of `ticket`, carrying pending changes over.
    ///
    /// # Errors
    ///
    /// Returns `Git` if any step fails.
    pub fn work_on(&self, ticket: &str) -> Result<()> {
        self.push_changes()?;
        self.set_current_branch(ticket)?;
        self.pop_changes()?;
        Ok(())
    }
}

#[must_use]
pub fn is_git_repository(directory: &Path) -> bool {
    directory.join(".git").is_dir()
}

fn parse_branches(listing: &str) -> (Option<String>, Vec<String>) {
    let mut current = None;
    let mut branches = Vec::new();
    for line in listing.lines() {
        if let Some(caps) = BRANCH_LINE.captures(line) {
            let name = caps["name"].to_string();
            if line.starts_with('*') {
                current = Some(name.clone());
            }
            branches.push(name);
        }
    }
    (current, branches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn git_available() -> bool {
        Command::new("git").arg("--version").output().is_ok()
    }

    fn init_repo() -> Option<(TempDir, Git)> {
        crate::logging::init_test_logging();
        if !git_available() {
            return None;
        }
        let temp = TempDir::new().unwrap();
        let git = Git::unchecked(temp.path());
        git.call(&["init", "."]).unwrap();
        git.call(&["config", "user.name", "Test"]).unwrap();
        git.call(&["config", "user.email", "test@example.com"]).unwrap();
        git.call(&["config", "commit.gpgsign", "false"]).unwrap();
        let git = Git::open(temp.path()).unwrap();
        Some((temp, git))
    }

    fn commit_file(temp: &TempDir, git: &Git, name: &str, message: &str) {
        fs::write(temp.path().join(name), message).unwrap();
        git.add(name).unwrap();
        git.commit(message).unwrap();
    }

    #[test]
    fn test_parse_branches() {
        let (current, branches) = parse_branches("  feature\n* main\n  bug.1\n");
        assert_eq!(current.as_deref(), Some("main"));
        assert_eq!(branches, vec!["feature", "main", "bug.1"]);
    }

    #[test]
    fn test_open_requires_git_dir() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            Git::open(temp.path()),
            Err(CliError::NotAGitRepository { .. })
        ));
    }

    #[test]
    fn test_commit_and_log() {
        let Some((temp, git)) = init_repo() else {
            return;
        };
        assert!(git.log(1).unwrap().is_empty());
        commit_file(&temp, &git, "a.txt", "first commit");
        commit_file(&temp, &git, "b.txt", "second commit");
        assert_eq!(git.log(5).unwrap(), vec!["second commit", "first commit"]);
    }

    #[test]
    fn test_set_current_branch() {
        let Some((temp, git)) = init_repo() else {
            return;
        };
        commit_file(&temp, &git, "a.txt", "base");
        let (initial, _) = git.branches().unwrap();

        git.set_current_branch("bug1").unwrap();
        git.set_current_branch("bug2").unwrap();
        git.set_current_branch("bug1").unwrap();

        let (current, branches) = git.branches().unwrap();
        assert_eq!(current.as_deref(), Some("bug1"));
        assert!(branches.contains(&"bug2".to_string()));
        assert!(branches.contains(&initial.unwrap()));
    }

    #[test]
    fn test_push_and_pop_changes() {
        let Some((temp, git)) = init_repo() else {
            return;
        };
        commit_file(&temp, &git, "a.txt", "base");
        assert!(!git.push_changes().unwrap());
        assert!(!git.pop_changes().unwrap());

        fs::write(temp.path().join("a.txt"), "changed").unwrap();
        assert!(git.push_changes().unwrap());
        assert_eq!(git.log(1).unwrap(), vec![MAGIC]);
        assert!(git.diff_files().unwrap().is_empty());

        assert!(git.pop_changes().unwrap());
        assert_eq!(git.log(1).unwrap(), vec!["base"]);
        assert_eq!(git.diff_files().unwrap(), vec!["a.txt"]);
    }

    #[test]
    fn test_work_on_carries_changes_per_branch() {
        let Some((temp, git)) = init_repo() else {
            return;
        };
        commit_file(&temp, &git, "a.txt", "base");
        let (initial, _) = git.branches().unwrap();
        let initial = initial.unwrap();

        git.work_on("ticket1").unwrap();
        fs::write(temp.path().join("a.txt"), "ticket1 work").unwrap();

        git.work_on(&initial).unwrap();
        assert_eq!(fs::read_to_string(temp.path().join("a.txt")).unwrap(), "base");

        git.work_on("ticket1").unwrap();
        assert_eq!(
            fs::read_to_string(temp.path().join("a.txt")).unwrap(),
            "ticket1 work"
        );
        assert_eq!(git.branches().unwrap().0.as_deref(), Some("ticket1"));
    }
}
