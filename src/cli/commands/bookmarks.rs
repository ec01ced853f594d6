//! `kee bookmarks`: the list of known vaults.

use std::path::{Path, PathBuf};

use comfy_table::{ContentArrangement, Table};

use crate::cli::output;
use crate::cli::{load_bookmarks, load_settings, vault_path, Cli};
use crate::errors::Result;
use crate::vault::Vault;

/// Execute `bookmarks list`.
pub fn execute_list(cli: &Cli) -> Result<()> {
    let settings = load_settings(cli)?;
    let bookmarks = load_bookmarks(cli, &settings)?;

    if bookmarks.entries().is_empty() {
        output::info("No known vaults yet.");
        output::tip("Run `kee create` or `kee bookmarks add <PATH>`.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Location", "Added"]);

    for bookmark in bookmarks.entries() {
        // Metadata is readable without the master key.
        let name = Vault::load(&bookmark.location)
            .map(|vault| vault.name().to_string())
            .unwrap_or_else(|_| "(unavailable)".to_string());
        table.add_row(vec![
            name,
            bookmark.location.display().to_string(),
            bookmark.added_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }

    println!("{table}");
    Ok(())
}

/// Execute `bookmarks add`.
pub fn execute_add(cli: &Cli, path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => vault_path(cli)?,
    };

    // Refuse anything that is not a readable vault.
    let vault = Vault::load(&path)?;
    let location = std::fs::canonicalize(vault.location())?;

    let settings = load_settings(cli)?;
    let mut bookmarks = load_bookmarks(cli, &settings)?;
    if bookmarks.add(location.clone()) {
        bookmarks.save()?;
        output::success(&format!(
            "Remembered vault '{}' at {}",
            vault.name(),
            location.display()
        ));
    } else {
        output::info(&format!("{} is already known.", location.display()));
    }
    Ok(())
}

/// Execute `bookmarks remove`.
pub fn execute_remove(cli: &Cli, path: &Path) -> Result<()> {
    let settings = load_settings(cli)?;
    let mut bookmarks = load_bookmarks(cli, &settings)?;

    let location = resolve(path);
    bookmarks.remove(&location)?;
    bookmarks.save()?;

    output::success(&format!("Forgot {}", location.display()));
    Ok(())
}

/// Bookmarks store canonical paths; a deleted vault can only be matched
/// by the path as given.
fn resolve(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
