//! Versioned repository migrations.
//!
//! The repository directory records how many steps of [`MIGRATIONS`] have been
//! applied in its `migration` file (absent file means version 0). Opening a
//! repository runs the remaining steps in order and advances the counter after
//! each one. A failing step aborts the run and leaves the counter at that
//! step, so the next open retries it from scratch.

use std::fs;
use std::path::Path;

use crate::error::{Result, TicketError};
use crate::layout::Layout;
use crate::ticket::{MetaTicket, Status, is_valid_tag};
use crate::tickets_file;
use crate::util::{now_timestamp, system_time_to_timestamp};

/// One forward-only transformation of the repository directory.
pub struct Migration {
    pub name: &'static str,
    pub apply: fn(&Path) -> Result<()>,
}

/// Every migration, oldest first. Index `i` upgrades version `i` to `i + 1`.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        name: "working ticket",
        apply: working_ticket_migration,
    },
    Migration {
        name: "tickets meta file",
        apply: tickets_meta_file_migration,
    },
    Migration {
        name: "tickets mtime",
        apply: tickets_mtime_migration,
    },
    Migration {
        name: "tickets json",
        apply: tickets_json_migration,
    },
];

/// Version of a repository with every migration applied.
#[must_use]
pub const fn latest_version() -> usize {
    MIGRATIONS.len()
}

/// Read the applied migration count of a repository directory.
///
/// # Errors
///
/// Returns `MigrationCounter` if the file does not hold an integer.
pub fn current_version(repository: &Path) -> Result<usize> {
    let path = Layout::from_repository_dir(repository).migration_file();
    if !path.exists() {
        return Ok(0);
    }
    let raw = fs::read_to_string(&path)?;
    raw.trim()
        .parse()
        .map_err(|_| TicketError::MigrationCounter {
            value: raw.trim().to_string(),
        })
}

/// Mark the repository as fully migrated.
///
/// # Errors
///
/// Returns `Io` if the counter cannot be written.
pub fn stamp_latest(repository: &Path) -> Result<()> {
    write_version(repository, latest_version())
}

fn write_version(repository: &Path, version: usize) -> Result<()> {
    let path = Layout::from_repository_dir(repository).migration_file();
    fs::write(path, version.to_string())?;
    Ok(())
}

/// Apply every pending migration in order.
///
/// Returns the number of steps that ran.
///
/// # Errors
///
/// Returns `Migration` wrapping the first failing step's error.
pub fn apply_migrations(repository: &Path) -> Result<usize> {
    let current = current_version(repository)?;
    if current >= latest_version() {
        return Ok(0);
    }

    for (version, migration) in MIGRATIONS.iter().enumerate().skip(current) {
        tracing::info!("Applying {} migration...", migration.name);
        (migration.apply)(repository).map_err(|source| TicketError::Migration {
            version: version + 1,
            name: migration.name,
            source: Box::new(source),
        })?;
        write_version(repository, version + 1)?;
    }

    Ok(latest_version() - current)
}

// ============================================================================
// Steps
// ============================================================================

/// Introduce the working ticket pointer file.
fn working_ticket_migration(repository: &Path) -> Result<()> {
    let path = Layout::from_repository_dir(repository).working_file();
    if !path.exists() {
        fs::write(path, "")?;
    }
    Ok(())
}

/// Tags stored on the last line of a content file as `tags: a b c`.
fn read_content_tags(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    let Some(tag_line) = content.lines().last() else {
        return Ok(Vec::new());
    };
    let Some(rest) = tag_line.strip_prefix("tags:") else {
        return Ok(Vec::new());
    };

    let mut tags = Vec::new();
    for tag in rest.split(|c: char| c.is_whitespace() || c == ',') {
        if tag.is_empty() || tags.iter().any(|t| t == tag) {
            continue;
        }
        if is_valid_tag(tag) {
            tags.push(tag.to_string());
        } else {
            tracing::warn!("Dropping invalid tag '{tag}' from {}", path.display());
        }
    }
    Ok(tags)
}

/// Merge the `opened/` and `closed/` ticket directories into `contents/` and
/// write a text tickets file carrying each ticket's status and tags.
///
/// The tickets file is written before any content moves, so a rerun after a
/// partial failure only rescans what is left in the status directories.
fn tickets_meta_file_migration(repository: &Path) -> Result<()> {
    let layout = Layout::from_repository_dir(repository);
    let contents = layout.contents();
    fs::create_dir_all(&contents)?;

    let tickets_path = layout.tickets_file();
    let mut lines: Vec<String> = if tickets_path.exists() {
        fs::read_to_string(&tickets_path)?
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect()
    } else {
        Vec::new()
    };

    let mut moves = Vec::new();
    for status in Status::ALL {
        let status_dir = repository.join(status.as_str());
        if !status_dir.is_dir() {
            continue;
        }

        let mut entries: Vec<_> = fs::read_dir(&status_dir)?
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .filter(|entry| entry.path().is_file())
            .collect();
        entries.sort_by_key(fs::DirEntry::file_name);

        for entry in entries {
            let name = entry.file_name().to_string_lossy().into_owned();
            let tags = read_content_tags(&entry.path())?;
            let ticket = MetaTicket::new(name.as_str(), status, tags, 0.0);
            ticket.validate()?;

            let known = lines
                .iter()
                .any(|line| line.split_whitespace().next() == Some(name.as_str()));
            if !known {
                lines.push(ticket.to_line());
            }
            moves.push((entry.path(), contents.join(&name)));
        }
    }
    write_lines(&tickets_path, &lines)?;

    for (from, to) in moves {
        fs::rename(from, to)?;
    }
    for status in Status::ALL {
        let status_dir = repository.join(status.as_str());
        if status_dir.is_dir() {
            fs::remove_dir_all(&status_dir)?;
        }
    }
    Ok(())
}

/// Append a modification time to each text line, taken from the content
/// file's mtime (or now when the ticket has no content).
fn tickets_mtime_migration(repository: &Path) -> Result<()> {
    let layout = Layout::from_repository_dir(repository);
    let tickets_path = layout.tickets_file();
    let raw = fs::read_to_string(&tickets_path)?;
    if raw.trim_start().starts_with('[') {
        return Ok(());
    }

    let mut lines = Vec::new();
    for line in raw.lines().filter(|l| !l.trim().is_empty()) {
        if MetaTicket::parse_legacy_line(line).is_ok() {
            lines.push(line.to_string());
            continue;
        }
        let mut ticket = MetaTicket::parse_line(line)?;
        let content = layout.content(&ticket.name);
        ticket.mtime = match fs::metadata(&content).and_then(|m| m.modified()) {
            Ok(modified) => system_time_to_timestamp(modified),
            Err(_) => now_timestamp(),
        };
        lines.push(ticket.to_legacy_line());
    }
    write_lines(&tickets_path, &lines)
}

/// Re-encode the text tickets file as JSON records.
fn tickets_json_migration(repository: &Path) -> Result<()> {
    let tickets_path = Layout::from_repository_dir(repository).tickets_file();
    let raw = fs::read_to_string(&tickets_path)?;
    if raw.trim_start().starts_with('[') {
        return Ok(());
    }

    let tickets = raw
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(MetaTicket::parse_legacy_line)
        .collect::<Result<Vec<_>>>()?;
    tickets_file::save(&tickets_path, &tickets)
}

fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let mut body = String::new();
    for line in lines {
        body.push_str(line);
        body.push('\n');
    }
    fs::write(path, body)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::Repository;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn repo_dir() -> (TempDir, std::path::PathBuf) {
        let temp = TempDir::new().unwrap();
        let repository = temp.path().join(".pyticket");
        fs::create_dir(&repository).unwrap();
        (temp, repository)
    }

    /// Repository as created by the first released layout.
    fn version_zero_repository(repository: &Path) {
        fs::create_dir(repository.join("opened")).unwrap();
        fs::create_dir(repository.join("closed")).unwrap();
        fs::write(repository.join("opened/a"), "# A\n\ntags: bug urgent").unwrap();
        fs::write(repository.join("opened/a.b"), "# B\n").unwrap();
        fs::write(repository.join("closed/c"), "# C\ntags: done,old").unwrap();
        fs::create_dir(repository.join("templates")).unwrap();
    }

    #[test]
    fn test_working_ticket_migration() {
        let (_temp, repository) = repo_dir();
        working_ticket_migration(&repository).unwrap();
        assert!(repository.join("working").is_file());

        fs::write(repository.join("working"), "a").unwrap();
        working_ticket_migration(&repository).unwrap();
        assert_eq!(fs::read_to_string(repository.join("working")).unwrap(), "a");
    }

    #[test]
    fn test_meta_file_migration() {
        let (_temp, repository) = repo_dir();
        version_zero_repository(&repository);

        tickets_meta_file_migration(&repository).unwrap();

        assert!(!repository.join("opened").exists());
        assert!(!repository.join("closed").exists());
        for name in ["a", "a.b", "c"] {
            assert!(repository.join("contents").join(name).is_file());
        }

        let raw = fs::read_to_string(repository.join("tickets")).unwrap();
        let tickets: Vec<MetaTicket> = raw
            .lines()
            .map(|l| MetaTicket::parse_line(l).unwrap())
            .collect();
        assert_eq!(tickets.len(), 3);
        assert!(tickets.contains(&MetaTicket::new(
            "a",
            Status::Opened,
            vec!["bug".into(), "urgent".into()],
            0.0
        )));
        assert!(tickets.contains(&MetaTicket::new("a.b", Status::Opened, vec![], 0.0)));
        assert!(tickets.contains(&MetaTicket::new(
            "c",
            Status::Closed,
            vec!["done".into(), "old".into()],
            0.0
        )));
    }

    #[test]
    fn test_mtime_migration() {
        let (_temp, repository) = repo_dir();
        fs::create_dir(repository.join("contents")).unwrap();
        fs::write(repository.join("contents/a"), "content").unwrap();
        fs::write(repository.join("tickets"), "a opened (x)\nb closed ()\n").unwrap();
        let content_mtime = system_time_to_timestamp(
            fs::metadata(repository.join("contents/a"))
                .unwrap()
                .modified()
                .unwrap(),
        );

        let before = now_timestamp();
        tickets_mtime_migration(&repository).unwrap();

        let raw = fs::read_to_string(repository.join("tickets")).unwrap();
        let tickets: Vec<MetaTicket> = raw
            .lines()
            .map(|l| MetaTicket::parse_legacy_line(l).unwrap())
            .collect();
        assert_eq!(tickets.len(), 2);
        assert!((tickets[0].mtime - content_mtime).abs() < 1e-3);
        assert!(tickets[1].mtime >= before - 1.0);

        // Lines that already carry a timestamp are kept as-is.
        tickets_mtime_migration(&repository).unwrap();
        assert_eq!(fs::read_to_string(repository.join("tickets")).unwrap(), raw);
    }

    #[test]
    fn test_json_migration() {
        let (_temp, repository) = repo_dir();
        fs::write(
            repository.join("tickets"),
            "a opened (x,y) 100.5\na.b closed () 200\n",
        )
        .unwrap();

        tickets_json_migration(&repository).unwrap();

        let tickets = tickets_file::load(&repository.join("tickets")).unwrap();
        assert_eq!(
            tickets,
            vec![
                MetaTicket::new("a", Status::Opened, vec!["x".into(), "y".into()], 0.0),
                MetaTicket::new("a.b", Status::Closed, vec![], 0.0),
            ]
        );
        assert!((tickets[0].mtime - 100.5).abs() < f64::EPSILON);

        tickets_json_migration(&repository).unwrap();
        assert_eq!(tickets_file::load(&repository.join("tickets")).unwrap(), tickets);
    }

    #[test]
    fn test_apply_from_version_zero() {
        let (_temp, repository) = repo_dir();
        version_zero_repository(&repository);

        let applied = apply_migrations(&repository).unwrap();
        assert_eq!(applied, latest_version());
        assert_eq!(current_version(&repository).unwrap(), latest_version());
        assert!(repository.join("working").is_file());

        let tickets = tickets_file::load(&repository.join("tickets")).unwrap();
        assert_eq!(tickets.len(), 3);
        assert!(tickets.iter().all(|t| t.mtime > 0.0));
    }

    #[test]
    fn test_apply_twice_is_a_noop() {
        let (_temp, repository) = repo_dir();
        version_zero_repository(&repository);
        apply_migrations(&repository).unwrap();
        let tickets = fs::read_to_string(repository.join("tickets")).unwrap();

        assert_eq!(apply_migrations(&repository).unwrap(), 0);
        assert_eq!(fs::read_to_string(repository.join("tickets")).unwrap(), tickets);
        assert_eq!(current_version(&repository).unwrap(), latest_version());
    }

    #[test]
    fn test_stamped_repository_skips_pipeline() {
        let (_temp, repository) = repo_dir();
        stamp_latest(&repository).unwrap();
        assert_eq!(apply_migrations(&repository).unwrap(), 0);
        assert!(!repository.join("working").exists());
    }

    #[test]
    fn test_failed_step_does_not_advance_counter() {
        let (_temp, repository) = repo_dir();
        write_version(&repository, 2).unwrap();
        fs::write(repository.join("tickets"), "not a ticket line at all\n").unwrap();

        let err = apply_migrations(&repository).unwrap_err();
        assert!(matches!(err, TicketError::Migration { version: 3, .. }));
        assert_eq!(current_version(&repository).unwrap(), 2);

        fs::create_dir(repository.join("contents")).unwrap();
        fs::write(repository.join("tickets"), "a opened ()\n").unwrap();
        assert_eq!(apply_migrations(&repository).unwrap(), 2);
        assert_eq!(current_version(&repository).unwrap(), latest_version());
    }

    #[test]
    fn test_counter_advances_per_step() {
        let (_temp, repository) = repo_dir();
        write_version(&repository, 1).unwrap();
        fs::write(repository.join("working"), "").unwrap();
        fs::create_dir(repository.join("opened")).unwrap();
        fs::write(repository.join("opened/a"), "# A\n").unwrap();
        // Step 2 keeps existing lines as they are; step 3 rejects this one.
        fs::write(repository.join("tickets"), "b closed () soon\n").unwrap();

        let err = apply_migrations(&repository).unwrap_err();
        assert!(matches!(err, TicketError::Migration { version: 3, .. }));
        assert_eq!(current_version(&repository).unwrap(), 2);
        assert!(repository.join("contents/a").is_file());
    }

    #[test]
    fn test_rerun_after_json_step_recovers() {
        let (_temp, repository) = repo_dir();
        write_version(&repository, 2).unwrap();
        fs::create_dir(repository.join("contents")).unwrap();
        fs::write(repository.join("tickets"), "a opened (x)\n").unwrap();

        // Both steps ran but the counter was never advanced.
        tickets_mtime_migration(&repository).unwrap();
        tickets_json_migration(&repository).unwrap();
        let migrated = fs::read_to_string(repository.join("tickets")).unwrap();

        assert_eq!(apply_migrations(&repository).unwrap(), 2);
        assert_eq!(current_version(&repository).unwrap(), latest_version());
        assert_eq!(fs::read_to_string(repository.join("tickets")).unwrap(), migrated);
        let tickets = tickets_file::load(&repository.join("tickets")).unwrap();
        assert_eq!(
            tickets,
            vec![MetaTicket::new("a", Status::Opened, vec!["x".into()], 0.0)]
        );
    }

    fn entry_names(dir: &Path) -> BTreeSet<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    fn assert_converges_to_fresh_layout(repository: &Path) {
        let fresh = TempDir::new().unwrap();
        let repo = Repository::create(fresh.path()).unwrap();
        assert_eq!(entry_names(repository), entry_names(repo.layout().repository()));

        let raw = fs::read_to_string(repository.join("tickets")).unwrap();
        assert!(raw.trim_start().starts_with('['));
        assert!(!tickets_file::load(&repository.join("tickets")).unwrap().is_empty());
        assert_eq!(current_version(repository).unwrap(), latest_version());
    }

    #[test]
    fn test_converges_from_version_zero() {
        let (_temp, repository) = repo_dir();
        version_zero_repository(&repository);
        apply_migrations(&repository).unwrap();
        assert_converges_to_fresh_layout(&repository);
    }

    #[test]
    fn test_converges_from_version_two() {
        let (_temp, repository) = repo_dir();
        fs::create_dir(repository.join("contents")).unwrap();
        fs::create_dir(repository.join("templates")).unwrap();
        fs::write(repository.join("working"), "a").unwrap();
        fs::write(repository.join("contents/a"), "# A\n").unwrap();
        fs::write(repository.join("tickets"), "a opened (x)\na.b closed ()\n").unwrap();
        write_version(&repository, 2).unwrap();

        apply_migrations(&repository).unwrap();
        assert_converges_to_fresh_layout(&repository);
        assert_eq!(fs::read_to_string(repository.join("working")).unwrap(), "a");
    }

    #[test]
    fn test_converges_from_version_three() {
        let (_temp, repository) = repo_dir();
        fs::create_dir(repository.join("contents")).unwrap();
        fs::create_dir(repository.join("templates")).unwrap();
        fs::write(repository.join("working"), "").unwrap();
        fs::write(repository.join("tickets"), "a opened (x) 12.5\n").unwrap();
        write_version(&repository, 3).unwrap();

        assert_eq!(apply_migrations(&repository).unwrap(), 1);
        assert_converges_to_fresh_layout(&repository);
    }

    #[test]
    fn test_corrupt_counter() {
        let (_temp, repository) = repo_dir();
        fs::write(repository.join("migration"), "four").unwrap();
        assert!(matches!(
            current_version(&repository),
            Err(TicketError::MigrationCounter { .. })
        ));
    }
}
