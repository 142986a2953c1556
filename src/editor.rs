//! External editor launch.

use std::path::Path;
use std::process::Command;

use crate::error::{CliError, Result};

/// Split an editor command line into program and leading arguments.
///
/// # Errors
///
/// Returns `EditorCommand` if the command is empty or has unbalanced quotes.
pub fn parse_editor_command(command: &str) -> Result<(String, Vec<String>)> {
    let mut words = shell_words::split(command).map_err(|e| CliError::EditorCommand {
        command: command.to_string(),
        reason: e.to_string(),
    })?;
    if words.is_empty() {
        return Err(CliError::EditorCommand {
            command: command.to_string(),
            reason: "empty command".to_string(),
        });
    }
    let program = words.remove(0);
    Ok((program, words))
}

/// Run `command` on `path` and wait for the editor to exit.
///
/// # Errors
///
/// Returns `EditorCommand` for an unparsable command, `Io` if the editor
/// cannot be spawned, or `EditorFailed` if it exits unsuccessfully.
pub fn launch_editor(command: &str, path: &Path) -> Result<()> {
    let (program, args) = parse_editor_command(command)?;
    tracing::debug!("Launching {program} on {}", path.display());

    let status = Command::new(&program).args(&args).arg(path).status()?;
    if !status.success() {
        return Err(CliError::EditorFailed {
            command: command.to_string(),
            status: status.to_string(),
        });
    }
    Ok(())
}
