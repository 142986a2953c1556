use super::{CommandContext, configured_editor};
use crate::editor;
use crate::error::Result;

/// Execute the edit command: open the editor, then bump the ticket's mtime.
///
/// # Errors
///
/// Returns an error if the ticket doesn't exist or the editor fails.
pub fn execute(name: &str, ctx: &CommandContext) -> Result<()> {
    let mut repo = ctx.open_repository()?;
    let path = repo.content_path(name)?;
    editor::launch_editor(&configured_editor()?, &path)?;
    repo.touch_ticket(name)?;
    Ok(())
}
