//! Working ticket commands.

use super::CommandContext;
use crate::cli::WorksOnArgs;
use crate::error::Result;
use crate::git::Git;

/// Make a ticket the working ticket, optionally switching git branches.
///
/// # Errors
///
/// Returns an error if the ticket doesn't exist or is closed, or if the git
/// switch fails.
pub fn execute(args: &WorksOnArgs, ctx: &CommandContext) -> Result<()> {
    let mut repo = ctx.open_repository()?;
    repo.set_working_ticket(Some(&args.name))?;
    if args.git {
        Git::open(&ctx.root)?.work_on(&args.name)?;
    }
    Ok(())
}

/// Clear the working ticket.
///
/// # Errors
///
/// Returns an error if the repository cannot be opened or written.
pub fn release(ctx: &CommandContext) -> Result<()> {
    let mut repo = ctx.open_repository()?;
    repo.set_working_ticket(None)?;
    Ok(())
}
