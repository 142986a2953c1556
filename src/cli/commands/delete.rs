//! Delete command implementation.

use std::io::{self, BufRead, Write};

use super::CommandContext;
use crate::cli::DeleteArgs;
use crate::error::Result;

/// Ask a yes/no question; an empty answer means yes.
///
/// # Errors
///
/// Returns an error if the prompt cannot be written or the answer read.
pub fn confirm<R: BufRead, W: Write>(prompt: &str, input: &mut R, output: &mut W) -> Result<bool> {
    write!(output, "{prompt}")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim_end_matches(['\r', '\n']), "" | "y" | "Y"))
}

/// Execute the delete command.
///
/// # Errors
///
/// Returns an error if the ticket doesn't exist or files cannot be removed.
pub fn execute(args: &DeleteArgs, ctx: &CommandContext) -> Result<()> {
    let mut repo = ctx.open_repository()?;
    repo.get_ticket(&args.name)?;

    if !args.force {
        let prompt = format!(
            "Are you sure you want to supress '{}' and all its childs ? [Y/n] ",
            args.name
        );
        if !confirm(&prompt, &mut io::stdin().lock(), &mut io::stdout())? {
            tracing::info!("Kept {}", args.name);
            return Ok(());
        }
    }

    repo.delete_ticket(&args.name)?;
    Ok(())
}
