//! `kee destroy`: delete a vault file for good.

use crate::cli::output;
use crate::cli::{confirm, load_bookmarks, load_settings, open_vault, Cli};
use crate::errors::Result;

/// Execute the `destroy` command.
pub fn execute(cli: &Cli, force: bool) -> Result<()> {
    let vault = open_vault(cli)?;
    let name = vault.name().to_string();
    let location = std::fs::canonicalize(vault.location())?;

    if !force
        && !confirm(&format!(
            "Permanently delete vault '{name}' at {}?",
            location.display()
        ))?
    {
        output::info("Cancelled.");
        return Ok(());
    }

    vault.remove()?;

    let settings = load_settings(cli)?;
    let mut bookmarks = load_bookmarks(cli, &settings)?;
    if bookmarks.contains(&location) {
        bookmarks.remove(&location)?;
        bookmarks.save()?;
    }

    output::success(&format!("Destroyed vault '{name}'"));
    Ok(())
}
