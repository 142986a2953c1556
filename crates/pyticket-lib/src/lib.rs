//! `pyticket-lib` — Hierarchical ticket repository stored next to a project.
//!
//! Tickets live in a `.pyticket` directory: one metadata file holding every
//! ticket's name, status, tags and mtime, plus one optional markdown content
//! file per ticket. Parentage is encoded in dotted names (`a.b` is a child
//! of `a`).
//!
//! # Quick Start
//!
//! ```no_run
//! use pyticket_lib::{ListFilters, Repository, Status};
//!
//! let mut repo = Repository::create("path/to/project").unwrap();
//!
//! repo.create_ticket("bug1", Status::Opened, &["urgent".to_string()], false).unwrap();
//! repo.create_ticket("bug1.repro", Status::Opened, &[], true).unwrap();
//! repo.write_ticket_content("bug1.repro", "# Steps\n").unwrap();
//!
//! repo.switch_ticket_status("bug1.repro", Status::Closed).unwrap();
//! repo.switch_ticket_status("bug1", Status::Closed).unwrap();
//!
//! let closed = repo
//!     .list_tickets(&ListFilters::default().with_status(Status::Closed))
//!     .unwrap();
//! assert_eq!(closed.len(), 2);
//! ```

pub mod error;
pub mod layout;
pub mod migration;
pub mod query;
pub mod repository;
pub mod template;
pub mod ticket;
pub mod tickets_file;
pub mod util;

pub use error::{Result, TicketError};
pub use layout::Layout;
pub use query::ListFilters;
pub use repository::Repository;
pub use ticket::{MetaTicket, Status};
