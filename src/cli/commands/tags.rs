//! Tag commands.

use super::CommandContext;
use crate::cli::TagArgs;
use crate::error::Result;

/// Add tags; tags already present are kept once.
///
/// # Errors
///
/// Returns an error if the ticket doesn't exist or a tag is invalid.
pub fn add(args: &TagArgs, ctx: &CommandContext) -> Result<()> {
    let mut repo = ctx.open_repository()?;
    repo.add_tags(&args.name, &args.tags)?;
    Ok(())
}

/// Remove tags; tags not present are ignored.
///
/// # Errors
///
/// Returns an error if the ticket doesn't exist.
pub fn remove(args: &TagArgs, ctx: &CommandContext) -> Result<()> {
    let mut repo = ctx.open_repository()?;
    repo.remove_tags(&args.name, &args.tags)?;
    Ok(())
}
