//! Ticket repository backed by a `.pyticket` directory.
//!
//! Provides the full ticket lifecycle: creation, content, status switches,
//! renames and deletions of whole subtrees, tags, the working ticket pointer,
//! listing and template expansion.
//!
//! Parentage is derived from dotted names, never stored. Every mutating call
//! rewrites the complete tickets file before returning.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, TicketError};
use crate::layout::Layout;
use crate::migration;
use crate::query::ListFilters;
use crate::template;
use crate::ticket::{MetaTicket, Status, is_valid_name, validate_tags};
use crate::tickets_file;
use crate::util::{self, ancestors, is_descendant, is_direct_child, now_timestamp, rebase_name};

pub const DEFAULT_BUG_TEMPLATE: &str = "# Bug $ticket

## Description

## Reproduction

## Solution

tags: bug
";

pub const DEFAULT_FEATURE_TEMPLATE: &str = "# Feature $ticket

## Description

## Design

tags: feature
";

/// Ticket repository.
///
/// Tickets are loaded into memory on `open()`; each mutation persists the
/// whole set back to the tickets file.
#[derive(Debug)]
pub struct Repository {
    layout: Layout,
    tickets: BTreeMap<String, MetaTicket>,
}

impl Repository {
    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Create a new repository under `root`.
    ///
    /// Lays out the contents and templates directories, seeds the `bug` and
    /// `feature` templates, writes an empty working pointer and tickets file,
    /// and stamps the migration counter as current.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyInitialized` if `root` already holds a repository, or
    /// `Io` if the layout cannot be written.
    pub fn create(root: impl AsRef<Path>) -> Result<Self> {
        let layout = Layout::new(root.as_ref());
        if layout.exists() {
            return Err(TicketError::AlreadyInitialized {
                path: layout.repository().to_path_buf(),
            });
        }

        fs::create_dir(layout.repository())?;
        fs::create_dir(layout.contents())?;
        fs::create_dir(layout.templates())?;
        fs::write(layout.template("bug"), DEFAULT_BUG_TEMPLATE)?;
        fs::write(layout.template("feature"), DEFAULT_FEATURE_TEMPLATE)?;
        migration::stamp_latest(layout.repository())?;
        fs::write(layout.working_file(), "")?;
        fs::write(layout.tickets_file(), "")?;

        tracing::info!("Created repository at {}", layout.repository().display());
        Ok(Self {
            layout,
            tickets: BTreeMap::new(),
        })
    }

    /// Open the repository under `root`, applying pending migrations first.
    ///
    /// # Errors
    ///
    /// Returns `NotARepository` if `root` has no `.pyticket` directory,
    /// `Migration` if a migration step fails, or a parse error if the
    /// tickets file is invalid.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let layout = Layout::new(root.as_ref());
        if !layout.exists() {
            return Err(TicketError::NotARepository {
                path: layout.root().to_path_buf(),
            });
        }

        let applied = migration::apply_migrations(layout.repository())?;
        if applied > 0 {
            tracing::info!("Applied {applied} migration(s)");
        }

        let tickets = tickets_file::load(&layout.tickets_file())?
            .into_iter()
            .map(|ticket| (ticket.name.clone(), ticket))
            .collect();

        Ok(Self { layout, tickets })
    }

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    fn save(&self) -> Result<()> {
        tickets_file::save(&self.layout.tickets_file(), self.tickets.values())
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    #[must_use]
    pub fn has_ticket(&self, name: &str) -> bool {
        self.tickets.contains_key(name)
    }

    /// Get a single ticket by name.
    ///
    /// # Errors
    ///
    /// Returns `TicketNotFound` if the ticket doesn't exist.
    pub fn get_ticket(&self, name: &str) -> Result<&MetaTicket> {
        self.tickets
            .get(name)
            .ok_or_else(|| TicketError::not_found(name))
    }

    fn get_ticket_mut(&mut self, name: &str) -> Result<&mut MetaTicket> {
        self.tickets
            .get_mut(name)
            .ok_or_else(|| TicketError::not_found(name))
    }

    /// Every ticket, ordered by name.
    pub fn tickets(&self) -> impl Iterator<Item = &MetaTicket> {
        self.tickets.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Children of `name`: direct ones, or every descendant when `recursive`.
    ///
    /// Children are found by dotted-name prefix, so the result is ordered by
    /// name (parents before their own children).
    #[must_use]
    pub fn ticket_children(&self, name: &str, recursive: bool) -> Vec<&MetaTicket> {
        let prefix = format!("{name}.");
        self.tickets
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter(|(key, _)| recursive || is_direct_child(key, name))
            .map(|(_, ticket)| ticket)
            .collect()
    }

    /// Names of `name` and all its descendants, parents first.
    fn subtree_names(&self, name: &str) -> Vec<String> {
        std::iter::once(name.to_string())
            .chain(
                self.ticket_children(name, true)
                    .into_iter()
                    .map(|t| t.name.clone()),
            )
            .collect()
    }

    // ========================================================================
    // Content
    // ========================================================================

    /// Path of the ticket's content file (which may not exist).
    ///
    /// # Errors
    ///
    /// Returns `TicketNotFound` if the ticket doesn't exist.
    pub fn content_path(&self, name: &str) -> Result<PathBuf> {
        self.get_ticket(name)?;
        Ok(self.layout.content(name))
    }

    /// True if the ticket has a content file.
    ///
    /// # Errors
    ///
    /// Returns `TicketNotFound` if the ticket doesn't exist.
    pub fn has_content(&self, name: &str) -> Result<bool> {
        Ok(self.content_path(name)?.is_file())
    }

    /// Replace the ticket's content and bump its mtime.
    ///
    /// # Errors
    ///
    /// Returns `TicketNotFound` if the ticket doesn't exist, or `Io`.
    pub fn write_ticket_content(&mut self, name: &str, content: &str) -> Result<()> {
        let path = self.content_path(name)?;
        fs::write(path, content)?;
        self.touch_ticket(name)
    }

    /// Read the ticket's content.
    ///
    /// # Errors
    ///
    /// Returns `TicketNotFound` if the ticket doesn't exist, or `NoContent`
    /// if it has no content file.
    pub fn read_ticket_content(&self, name: &str) -> Result<String> {
        let path = self.content_path(name)?;
        if !path.is_file() {
            return Err(TicketError::NoContent {
                name: name.to_string(),
            });
        }
        Ok(fs::read_to_string(path)?)
    }

    /// Set the ticket's mtime to now and persist.
    ///
    /// # Errors
    ///
    /// Returns `TicketNotFound` if the ticket doesn't exist.
    pub fn touch_ticket(&mut self, name: &str) -> Result<()> {
        self.get_ticket_mut(name)?.mtime = now_timestamp();
        self.save()
    }

    // ========================================================================
    // Lifecycle of tickets
    // ========================================================================

    /// Create a new ticket.
    ///
    /// Dots in `name` place the ticket below its parent, which must exist.
    /// When `make_content` is set an empty content file is created too.
    ///
    /// # Errors
    ///
    /// Returns `InvalidName`, `TicketExists`, `ParentNotFound` or
    /// `InvalidTag`.
    pub fn create_ticket(
        &mut self,
        name: &str,
        status: Status,
        tags: &[String],
        make_content: bool,
    ) -> Result<MetaTicket> {
        if !is_valid_name(name) {
            return Err(TicketError::InvalidName {
                name: name.to_string(),
            });
        }
        if self.has_ticket(name) {
            return Err(TicketError::TicketExists {
                name: name.to_string(),
            });
        }
        self.ensure_parent_exists(name)?;
        validate_tags(tags)?;

        let mut unique_tags: Vec<String> = Vec::with_capacity(tags.len());
        for tag in tags {
            if !unique_tags.contains(tag) {
                unique_tags.push(tag.clone());
            }
        }

        let ticket = MetaTicket::new(name, status, unique_tags, now_timestamp());
        self.tickets.insert(name.to_string(), ticket.clone());
        self.save()?;

        if make_content {
            fs::write(self.layout.content(name), "")?;
        }

        tracing::debug!("Created ticket {name}");
        Ok(ticket)
    }

    fn ensure_parent_exists(&self, name: &str) -> Result<()> {
        match util::parent_name(name) {
            Some(parent) if !self.has_ticket(parent) => Err(TicketError::ParentNotFound {
                parent: parent.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Switch the ticket's status.
    ///
    /// Closing requires every descendant to be closed already and releases
    /// the working pointer if it points at this ticket. Reopening also
    /// reopens every closed ancestor.
    ///
    /// # Errors
    ///
    /// Returns `TicketNotFound`, or `OpenedChild` when closing a ticket with
    /// an opened descendant.
    pub fn switch_ticket_status(&mut self, name: &str, status: Status) -> Result<()> {
        self.get_ticket(name)?;
        let now = now_timestamp();

        match status {
            Status::Closed => {
                if let Some(child) = self
                    .ticket_children(name, true)
                    .into_iter()
                    .find(|child| child.status == Status::Opened)
                {
                    return Err(TicketError::OpenedChild {
                        name: name.to_string(),
                        child: child.name.clone(),
                    });
                }
                if self.is_working_ticket(name)? {
                    self.set_working_ticket(None)?;
                }
            }
            Status::Opened => {
                let closed_ancestors: Vec<String> = ancestors(name)
                    .filter(|parent| {
                        self.tickets
                            .get(*parent)
                            .is_some_and(|t| t.status == Status::Closed)
                    })
                    .map(str::to_string)
                    .collect();
                for parent in closed_ancestors {
                    tracing::debug!("Reopening ancestor {parent} of {name}");
                    let ticket = self.get_ticket_mut(&parent)?;
                    ticket.status = Status::Opened;
                    ticket.mtime = now;
                }
            }
        }

        let ticket = self.get_ticket_mut(name)?;
        ticket.status = status;
        ticket.mtime = now;
        self.save()
    }

    /// Rename a ticket and its whole subtree.
    ///
    /// Every descendant keeps its relative name below the new one, content
    /// files move along, and the working pointer follows the rename.
    ///
    /// # Errors
    ///
    /// Returns `TicketNotFound`, `InvalidName`, `TicketExists`,
    /// `ParentNotFound` or `RenameIntoSubtree`.
    pub fn rename_ticket(&mut self, name: &str, new_name: &str) -> Result<()> {
        self.get_ticket(name)?;
        if !is_valid_name(new_name) {
            return Err(TicketError::InvalidName {
                name: new_name.to_string(),
            });
        }
        if self.has_ticket(new_name) {
            return Err(TicketError::TicketExists {
                name: new_name.to_string(),
            });
        }
        if is_descendant(new_name, name) {
            return Err(TicketError::RenameIntoSubtree {
                name: name.to_string(),
                new_name: new_name.to_string(),
            });
        }
        self.ensure_parent_exists(new_name)?;

        let renames: Vec<(String, String)> = self
            .subtree_names(name)
            .into_iter()
            .map(|old| {
                let new = rebase_name(&old, name, new_name);
                (old, new)
            })
            .collect();
        if let Some((_, taken)) = renames.iter().find(|(_, new)| self.has_ticket(new)) {
            return Err(TicketError::TicketExists {
                name: taken.clone(),
            });
        }

        let working = self.working_ticket_name()?;
        let now = now_timestamp();
        for (old, new) in &renames {
            let old_content = self.layout.content(old);
            if old_content.is_file() {
                fs::rename(&old_content, self.layout.content(new))?;
            }
            if let Some(mut ticket) = self.tickets.remove(old) {
                ticket.name.clone_from(new);
                ticket.mtime = now;
                self.tickets.insert(new.clone(), ticket);
            }
            tracing::debug!("Renamed {old} to {new}");
        }

        if let Some(working) = working {
            if let Some((_, new)) = renames.iter().find(|(old, _)| *old == working) {
                self.write_working(new)?;
            }
        }

        self.save()
    }

    /// Delete a ticket and every descendant, with their content files.
    ///
    /// # Errors
    ///
    /// Returns `TicketNotFound` if the ticket doesn't exist.
    pub fn delete_ticket(&mut self, name: &str) -> Result<()> {
        self.get_ticket(name)?;

        let working = self.working_ticket_name()?;
        // Deepest names first so children go before their parents.
        for doomed in self.subtree_names(name).into_iter().rev() {
            let content = self.layout.content(&doomed);
            if content.is_file() {
                fs::remove_file(content)?;
            }
            self.tickets.remove(&doomed);
            if working.as_deref() == Some(doomed.as_str()) {
                self.write_working("")?;
            }
            tracing::debug!("Deleted ticket {doomed}");
        }

        self.save()
    }

    // ========================================================================
    // Tags
    // ========================================================================

    /// Add tags to a ticket; tags already present are ignored.
    ///
    /// # Errors
    ///
    /// Returns `TicketNotFound` or `InvalidTag`.
    pub fn add_tags(&mut self, name: &str, tags: &[String]) -> Result<()> {
        validate_tags(tags)?;
        let ticket = self.get_ticket_mut(name)?;
        for tag in tags {
            if !ticket.has_tag(tag) {
                ticket.tags.push(tag.clone());
            }
        }
        ticket.mtime = now_timestamp();
        self.save()
    }

    /// Remove tags from a ticket; absent tags are ignored.
    ///
    /// # Errors
    ///
    /// Returns `TicketNotFound` if the ticket doesn't exist.
    pub fn remove_tags(&mut self, name: &str, tags: &[String]) -> Result<()> {
        let ticket = self.get_ticket_mut(name)?;
        ticket.tags.retain(|tag| !tags.contains(tag));
        ticket.mtime = now_timestamp();
        self.save()
    }

    // ========================================================================
    // Working ticket
    // ========================================================================

    fn working_ticket_name(&self) -> Result<Option<String>> {
        let path = self.layout.working_file();
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)?;
        let name = raw.trim();
        Ok((!name.is_empty()).then(|| name.to_string()))
    }

    fn write_working(&self, name: &str) -> Result<()> {
        fs::write(self.layout.working_file(), name)?;
        Ok(())
    }

    /// Set (or clear with `None`) the working ticket.
    ///
    /// # Errors
    ///
    /// Returns `TicketNotFound`, or `ClosedTicket` if the ticket is closed.
    pub fn set_working_ticket(&mut self, name: Option<&str>) -> Result<()> {
        let Some(name) = name else {
            return self.write_working("");
        };
        if self.get_ticket(name)?.status == Status::Closed {
            return Err(TicketError::ClosedTicket {
                name: name.to_string(),
            });
        }
        self.write_working(name)
    }

    /// The current working ticket, if any.
    ///
    /// A pointer to a ticket that no longer exists reads as no working ticket.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the pointer file cannot be read.
    pub fn working_ticket(&self) -> Result<Option<&MetaTicket>> {
        Ok(self
            .working_ticket_name()?
            .and_then(|name| self.tickets.get(&name)))
    }

    /// True if `name` is the working ticket.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the pointer file cannot be read.
    pub fn is_working_ticket(&self, name: &str) -> Result<bool> {
        Ok(self.working_ticket_name()?.as_deref() == Some(name))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// List tickets matching every filter, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `TicketNotFound` if the filter root doesn't exist.
    pub fn list_tickets(&self, filters: &ListFilters) -> Result<Vec<&MetaTicket>> {
        if let Some(root) = filters.root.as_deref().filter(|r| !r.is_empty()) {
            self.get_ticket(root)?;
        }
        Ok(self.tickets.values().filter(|t| filters.matches(t)).collect())
    }

    // ========================================================================
    // Templates
    // ========================================================================

    /// Load a template and substitute `values` into it.
    ///
    /// Unknown placeholders are left as they are.
    ///
    /// # Errors
    ///
    /// Returns `TemplateNotFound` if no such template exists.
    pub fn expand_template(&self, template_name: &str, values: &HashMap<&str, &str>) -> Result<String> {
        let path = self.layout.template(template_name);
        if !is_valid_name(template_name) || !path.is_file() {
            return Err(TicketError::TemplateNotFound {
                name: template_name.to_string(),
            });
        }
        let raw = fs::read_to_string(path)?;
        Ok(template::expand(&raw, values))
    }
}
