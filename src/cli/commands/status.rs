//! Close and reopen commands.

use pyticket_lib::Status;

use super::CommandContext;
use crate::error::Result;

fn switch(name: &str, status: Status, ctx: &CommandContext) -> Result<()> {
    let mut repo = ctx.open_repository()?;
    repo.switch_ticket_status(name, status)?;
    if ctx.json {
        ctx.print_json(repo.get_ticket(name)?)?;
    }
    Ok(())
}

/// Close a ticket. All its children must be closed already.
///
/// # Errors
///
/// Returns an error if the ticket doesn't exist or has an opened child.
pub fn close(name: &str, ctx: &CommandContext) -> Result<()> {
    switch(name, Status::Closed, ctx)
}

/// Reopen a ticket along with its closed parents.
///
/// # Errors
///
/// Returns an error if the ticket doesn't exist.
pub fn reopen(name: &str, ctx: &CommandContext) -> Result<()> {
    switch(name, Status::Opened, ctx)
}
