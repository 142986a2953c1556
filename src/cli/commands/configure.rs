use crate::cli::ConfigureArgs;
use crate::config::{self, Configuration};
use crate::error::Result;

/// Execute the configure command.
///
/// # Errors
///
/// Returns an error if the key is not allowed or the configuration cannot
/// be read or written.
pub fn execute(args: &ConfigureArgs) -> Result<()> {
    let home = config::pyticket_home_dir()?;
    let mut config = Configuration::load(&home)?;
    config.set_value(&args.key, args.value.as_str())?;
    config.save(&home)
}
