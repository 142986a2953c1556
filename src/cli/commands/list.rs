//! List command implementation.
//!
//! Prints opened then closed tickets, each section sorted by name, with the
//! working ticket marked by `*`.

use super::{CommandContext, build_filters};
use crate::cli::ListArgs;
use crate::error::Result;
use crate::format::{TicketListItem, format_list};

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if the repository cannot be opened or the root ticket
/// doesn't exist.
pub fn execute(args: &ListArgs, ctx: &CommandContext) -> Result<()> {
    let repo = ctx.open_repository()?;
    let filters = build_filters(args.name.as_deref(), &args.filters);
    let tickets = repo.list_tickets(&filters)?;
    let working = repo.working_ticket()?.map(|t| t.name.as_str());

    if ctx.json {
        let items: Vec<TicketListItem<'_>> = tickets
            .iter()
            .copied()
            .map(|ticket| TicketListItem {
                ticket,
                working: working == Some(ticket.name.as_str()),
            })
            .collect();
        return ctx.print_json(&items);
    }

    print!("{}", format_list(&tickets, |name| working == Some(name)));
    Ok(())
}
