//! Output formatting for `pyticket`.
//!
//! Human-readable text by default, JSON records with `--json`:
//! - [`TicketListItem`] - Ticket with its working flag (list/table)
//! - [`TicketDetails`] - Ticket with content and children (show)

mod markup;
mod output;
mod table;
mod text;

pub use markup::render_markup;
pub use output::{TicketDetails, TicketListItem};
pub use table::{TableSort, build_table, render_table, select_rows};
pub use text::format_list;
