//! Show command implementation.

use std::io::IsTerminal;

use pyticket_lib::util::parent_name;

use super::CommandContext;
use crate::error::Result;
use crate::format::{TicketDetails, render_markup};

/// Execute the show command.
///
/// # Errors
///
/// Returns an error if the ticket doesn't exist or has no content.
pub fn execute(name: &str, ctx: &CommandContext) -> Result<()> {
    let repo = ctx.open_repository()?;
    let ticket = repo.get_ticket(name)?;
    let content = repo.read_ticket_content(name)?;

    if ctx.json {
        let details = TicketDetails {
            ticket,
            working: repo.is_working_ticket(name)?,
            parent: parent_name(name),
            children: repo
                .ticket_children(name, false)
                .into_iter()
                .map(|child| child.name.as_str())
                .collect(),
            content,
        };
        return ctx.print_json(&details);
    }

    print!("{}", render_markup(&content, std::io::stdout().is_terminal()));
    println!();
    Ok(())
}
