//! `kee groups`: list the groups of a vault.

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::Result;

/// Execute the `groups` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let vault = open_vault(cli)?;
    output::print_groups_table(vault.groups()?);
    Ok(())
}
