use super::CommandContext;
use crate::cli::RenameArgs;
use crate::error::Result;

/// Execute the rename command; children follow their parent.
///
/// # Errors
///
/// Returns an error if the ticket doesn't exist or the new name is taken,
/// invalid, or lacks a parent.
pub fn execute(args: &RenameArgs, ctx: &CommandContext) -> Result<()> {
    let mut repo = ctx.open_repository()?;
    repo.rename_ticket(&args.name, &args.new_name)?;
    Ok(())
}
