//! Command-line interface for `pyticket`.
//!
//! This module provides the CLI parsing and command routing using clap.

pub mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::logging;

/// `pyticket` - Hierarchical ticket tracker.
#[derive(Parser, Debug)]
#[command(name = "pyticket")]
#[command(
    author,
    version,
    about = "Hierarchical ticket tracker stored next to your project",
    long_about = None,
    after_help = "Ticket names are dotted paths: 'bug1.repro' is a child of 'bug1'."
)]
pub struct Cli {
    /// Repository root (the directory holding .pyticket)
    #[arg(short = 'C', long = "directory", global = true, default_value = ".")]
    pub directory: PathBuf,

    /// Output format: text (default) or json
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Also append JSON logs to this file
    #[arg(long, global = true, env = "PYTICKET_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a pyticket repository
    Init(InitArgs),

    /// Set a user configuration value
    Configure(ConfigureArgs),

    /// Create a new ticket
    Create(CreateArgs),

    /// Edit a ticket's content
    Edit(NameArg),

    /// Show a ticket's content
    Show(NameArg),

    /// List tickets
    List(ListArgs),

    /// Close a ticket
    Close(NameArg),

    /// Reopen a ticket and its closed parents
    Reopen(NameArg),

    /// Delete a ticket and all its children
    Delete(DeleteArgs),

    /// Rename a ticket and all its children
    Rename(RenameArgs),

    /// Add tags to a ticket
    AddTag(TagArgs),

    /// Remove tags from a ticket
    RemoveTag(TagArgs),

    /// Work on a ticket
    WorksOn(WorksOnArgs),

    /// Stop working on the current ticket
    Release,

    /// Show tickets as a table
    Table(TableArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Show version information
    Version,
}

#[derive(Args, Debug)]
pub struct NameArg {
    /// The ticket name
    pub name: String,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// The repository directory (defaults to --directory)
    pub directory: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ConfigureArgs {
    /// Which configuration key to set
    pub key: String,

    /// Key value
    pub value: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// The ticket name
    pub name: String,

    /// The template to fill the content with
    pub template: Option<String>,

    /// Comma separated tags
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Don't launch the editor
    #[arg(long)]
    pub no_edit: bool,
}

/// Status and tag filters shared by list and table.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Only opened tickets
    #[arg(long, conflicts_with = "closed")]
    pub opened: bool,

    /// Only closed tickets
    #[arg(long)]
    pub closed: bool,

    /// Only tickets carrying all these comma separated tags
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// List given ticket and its children
    pub name: Option<String>,

    #[command(flatten)]
    pub filters: FilterArgs,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// The ticket name
    pub name: String,

    /// Don't ask for confirmation
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct RenameArgs {
    /// The ticket name
    pub name: String,

    /// The new ticket name
    pub new_name: String,
}

#[derive(Args, Debug)]
pub struct TagArgs {
    /// The ticket to modify
    pub name: String,

    /// Comma separated tags
    #[arg(value_delimiter = ',', required = true)]
    pub tags: Vec<String>,
}

#[derive(Args, Debug)]
pub struct WorksOnArgs {
    /// The ticket to work on
    pub name: String,

    /// Also switch git to a branch named after the ticket
    #[arg(long)]
    pub git: bool,
}

#[derive(Args, Debug)]
pub struct TableArgs {
    /// Show only this ticket tree
    pub name: Option<String>,

    /// Sort by name instead of last update
    #[arg(long)]
    pub sorted_name: bool,

    /// Show at most this many rows
    #[arg(long)]
    pub count: Option<usize>,

    #[command(flatten)]
    pub filters: FilterArgs,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: Shell,
}

/// Run the CLI.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    let ctx = commands::CommandContext::new(&cli.directory, cli.json);
    tracing::debug!("Running {} in {}", cli.command.name(), ctx.root.display());

    match cli.command {
        Commands::Init(args) => commands::init::execute(&args, &ctx)?,
        Commands::Configure(args) => commands::configure::execute(&args)?,
        Commands::Create(args) => commands::create::execute(&args, &ctx)?,
        Commands::Edit(args) => commands::edit::execute(&args.name, &ctx)?,
        Commands::Show(args) => commands::show::execute(&args.name, &ctx)?,
        Commands::List(args) => commands::list::execute(&args, &ctx)?,
        Commands::Close(args) => commands::status::close(&args.name, &ctx)?,
        Commands::Reopen(args) => commands::status::reopen(&args.name, &ctx)?,
        Commands::Delete(args) => commands::delete::execute(&args, &ctx)?,
        Commands::Rename(args) => commands::rename::execute(&args, &ctx)?,
        Commands::AddTag(args) => commands::tags::add(&args, &ctx)?,
        Commands::RemoveTag(args) => commands::tags::remove(&args, &ctx)?,
        Commands::WorksOn(args) => commands::works_on::execute(&args, &ctx)?,
        Commands::Release => commands::works_on::release(&ctx)?,
        Commands::Table(args) => commands::table::execute(&args, &ctx)?,
        Commands::Completions(args) => commands::completions::execute(args.shell),
        Commands::Version => commands::version::execute(&ctx)?,
    }

    Ok(())
}

impl Commands {
    const fn name(&self) -> &'static str {
        match self {
            Self::Init(_) => "init",
            Self::Configure(_) => "configure",
            Self::Create(_) => "create",
            Self::Edit(_) => "edit",
            Self::Show(_) => "show",
            Self::List(_) => "list",
            Self::Close(_) => "close",
            Self::Reopen(_) => "reopen",
            Self::Delete(_) => "delete",
            Self::Rename(_) => "rename",
            Self::AddTag(_) => "add-tag",
            Self::RemoveTag(_) => "remove-tag",
            Self::WorksOn(_) => "works-on",
            Self::Release => "release",
            Self::Table(_) => "table",
            Self::Completions(_) => "completions",
            Self::Version => "version",
        }
    }
}
