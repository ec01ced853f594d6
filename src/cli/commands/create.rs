//! `kee create`: create a new vault and remember it.

use crate::cli::output;
use crate::cli::{
    load_bookmarks, load_settings, prompt_new_master_key, vault_path, Cli, MASTER_KEY_ENV,
};
use crate::errors::{KeeError, Result};
use crate::vault::{Strategies, Vault};

/// Execute the `create` command.
pub fn execute(
    cli: &Cli,
    name: Option<&str>,
    hasher: Option<&str>,
    cipher: Option<&str>,
    encoder: Option<&str>,
) -> Result<()> {
    let path = vault_path(cli)?;

    // Fail before prompting for a key.
    if path.exists() {
        return Err(KeeError::VaultAlreadyExists(path));
    }

    let settings = load_settings(cli)?;
    let strategies = Strategies::from_ids(
        hasher.unwrap_or(settings.hasher.as_str()),
        cipher.unwrap_or(settings.cipher.as_str()),
        encoder.unwrap_or(settings.encoder.as_str()),
    )?;

    let name = match name {
        Some(n) => n.to_string(),
        None => path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Vault".to_string()),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let key = prompt_new_master_key(MASTER_KEY_ENV)?;
    let vault = Vault::create(&path, &name, key.as_str(), strategies)?;

    let mut bookmarks = load_bookmarks(cli, &settings)?;
    let location = std::fs::canonicalize(vault.location())?;
    if bookmarks.add(location) {
        bookmarks.save()?;
    }

    output::success(&format!(
        "Created vault '{}' at {} ({} / {} / {})",
        vault.name(),
        vault.location().display(),
        strategies.hasher.id(),
        strategies.cipher.id(),
        strategies.encoder.id(),
    ));
    output::tip("Add a group: kee group add <NAME> <password|card|identity>");

    Ok(())
}
