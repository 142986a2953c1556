use pyticket_lib::Repository;

use super::CommandContext;
use crate::cli::InitArgs;
use crate::config;
use crate::error::Result;

/// Execute the init command.
///
/// Creates the repository and, on first use, the user configuration.
///
/// # Errors
///
/// Returns an error if a repository already exists or the directory cannot
/// be written.
pub fn execute(args: &InitArgs, ctx: &CommandContext) -> Result<()> {
    let root = args.directory.as_deref().unwrap_or(&ctx.root);
    let repo = Repository::create(root)?;

    match config::resolve_pyticket_home_dir() {
        Some(home) => {
            if config::seed_home(&home)? {
                tracing::info!("Created user configuration in {}", home.display());
            }
        }
        None => tracing::warn!("No home directory found, skipping user configuration"),
    }

    if ctx.json {
        ctx.print_json(&serde_json::json!({
            "repository": repo.layout().repository(),
        }))?;
    } else {
        println!(
            "Initialized pyticket repository in {}",
            repo.layout().repository().display()
        );
    }
    Ok(())
}
