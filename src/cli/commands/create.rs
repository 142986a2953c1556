use std::collections::HashMap;

use pyticket_lib::Status;

use super::{CommandContext, configured_editor};
use crate::cli::CreateArgs;
use crate::editor;
use crate::error::Result;

/// Execute the create command.
///
/// The content comes from the template when one is named. Without
/// `--no-edit` the editor is opened on the content afterwards.
///
/// # Errors
///
/// Returns an error if the ticket cannot be created, the template is
/// missing, or the editor fails.
pub fn execute(args: &CreateArgs, ctx: &CommandContext) -> Result<()> {
    let mut repo = ctx.open_repository()?;

    // A missing template must not leave a ticket behind.
    let content = match &args.template {
        Some(template) => {
            let values = HashMap::from([("ticket", args.name.as_str())]);
            Some(repo.expand_template(template, &values)?)
        }
        None => None,
    };

    let ticket = repo.create_ticket(&args.name, Status::Opened, &args.tags, false)?;
    match &content {
        Some(content) => repo.write_ticket_content(&args.name, content)?,
        None if args.no_edit => repo.write_ticket_content(&args.name, "")?,
        None => {}
    }

    if !args.no_edit {
        let path = repo.content_path(&args.name)?;
        editor::launch_editor(&configured_editor()?, &path)?;
    }

    if ctx.json {
        ctx.print_json(repo.get_ticket(&ticket.name)?)?;
    }
    Ok(())
}
