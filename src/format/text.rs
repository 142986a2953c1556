//! Plain text list output.
//!
//! ```text
//! opened:
//!   * bug1
//!     bug1.repro
//! closed:
//!     feature2
//! ```

use pyticket_lib::{MetaTicket, Status};

/// One list entry; `*` marks the working ticket.
#[must_use]
pub fn format_list_line(name: &str, working: bool) -> String {
    format!("  {} {}", if working { "*" } else { " " }, name)
}

/// Opened then closed sections, each sorted by name.
#[must_use]
pub fn format_list(tickets: &[&MetaTicket], is_working: impl Fn(&str) -> bool) -> String {
    let mut out = String::new();
    for status in Status::ALL {
        out.push_str(status.as_str());
        out.push_str(":\n");
        let mut section: Vec<&str> = tickets
            .iter()
            .filter(|t| t.status == status)
            .map(|t| t.name.as_str())
            .collect();
        section.sort_unstable();
        for name in section {
            out.push_str(&format_list_line(name, is_working(name)));
            out.push('\n');
        }
    }
    out
}
