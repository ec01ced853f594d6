//! `kee rename`: change the vault's display name.

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::Result;

/// Execute the `rename` command.
pub fn execute(cli: &Cli, name: &str) -> Result<()> {
    let mut vault = open_vault(cli)?;
    let old = vault.name().to_string();

    vault.set_name(name)?;
    vault.save()?;

    output::success(&format!("Renamed vault '{old}' to '{}'", vault.name()));
    Ok(())
}
