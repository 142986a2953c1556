//! Version command implementation.

use serde::Serialize;

use super::CommandContext;
use crate::error::Result;

#[derive(Serialize)]
struct VersionOutput<'a> {
    version: &'a str,
    build: &'a str,
    repository_format: usize,
}

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(ctx: &CommandContext) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    let build = if cfg!(debug_assertions) {
        "dev"
    } else {
        "release"
    };
    let repository_format = pyticket_lib::migration::latest_version();

    if ctx.json {
        return ctx.print_json(&VersionOutput {
            version,
            build,
            repository_format,
        });
    }

    println!("pyticket version {version} ({build}, repository format {repository_format})");
    Ok(())
}
