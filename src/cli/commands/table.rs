use super::{CommandContext, build_filters};
use crate::cli::TableArgs;
use crate::error::Result;
use crate::format::{TableSort, TicketListItem, build_table, render_table, select_rows};

/// Execute the table command.
///
/// # Errors
///
/// Returns an error if the repository cannot be opened or the root ticket
/// doesn't exist.
pub fn execute(args: &TableArgs, ctx: &CommandContext) -> Result<()> {
    let repo = ctx.open_repository()?;
    let filters = build_filters(args.name.as_deref(), &args.filters);
    let tickets = repo.list_tickets(&filters)?;
    let sort = if args.sorted_name {
        TableSort::Name
    } else {
        TableSort::Mtime
    };

    if ctx.json {
        let working = repo.working_ticket()?.map(|t| t.name.as_str());
        let items: Vec<TicketListItem<'_>> = select_rows(&tickets, sort, args.count)
            .into_iter()
            .map(|ticket| TicketListItem {
                ticket,
                working: working == Some(ticket.name.as_str()),
            })
            .collect();
        return ctx.print_json(&items);
    }

    print!("{}", render_table(&build_table(&tickets, sort, args.count)));
    Ok(())
}
