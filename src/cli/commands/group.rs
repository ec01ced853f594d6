//! `kee group`: add, remove, rename and delete groups.

use crate::cli::output;
use crate::cli::{confirm, open_vault, Cli};
use crate::errors::Result;
use crate::vault::{Group, ItemKind};

/// Execute `group add`.
pub fn execute_add(cli: &Cli, name: &str, kind: &str) -> Result<()> {
    let kind: ItemKind = kind.parse()?;
    let mut vault = open_vault(cli)?;

    vault.add_group(Group::new(name, kind))?;
    vault.save()?;

    output::success(&format!(
        "Added {kind} group '{name}' ({} total)",
        vault.groups()?.len()
    ));
    Ok(())
}

/// Execute `group remove`.
pub fn execute_remove(cli: &Cli, name: &str) -> Result<()> {
    let mut vault = open_vault(cli)?;

    let group = vault.remove_group(name)?;
    vault.save()?;

    output::success(&format!(
        "Removed group '{name}' and its {} item(s)",
        group.len()
    ));
    Ok(())
}

/// Execute `group rename`.
pub fn execute_rename(cli: &Cli, old: &str, new: &str) -> Result<()> {
    let mut vault = open_vault(cli)?;

    vault.rename_group(old, new)?;
    vault.save()?;

    output::success(&format!("Renamed group '{old}' to '{new}'"));
    Ok(())
}

/// Execute `group delete`.
pub fn execute_delete(cli: &Cli, name: &str, force: bool) -> Result<()> {
    if !force && !confirm(&format!("Delete group '{name}' and all of its items?"))? {
        output::info("Cancelled.");
        return Ok(());
    }

    let mut vault = open_vault(cli)?;
    let group = vault.delete_group(name)?;
    vault.save()?;

    output::success(&format!(
        "Deleted group '{name}' ({} item(s))",
        group.len()
    ));
    Ok(())
}
