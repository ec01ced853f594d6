//! `kee items`: list the items of one group.

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::Result;

/// Execute the `items` command.
pub fn execute(cli: &Cli, group: &str, reveal: bool) -> Result<()> {
    let vault = open_vault(cli)?;
    output::print_items_table(vault.group(group)?, reveal);
    Ok(())
}
