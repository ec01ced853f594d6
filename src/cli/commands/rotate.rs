//! `kee rotate-key`: change the vault master key.
//!
//! Opens the vault with the current key, swaps in the new one and saves,
//! which rewrites the key fingerprint and re-encrypts every item.

use crate::cli::output;
use crate::cli::{open_vault, prompt_new_master_key, Cli, NEW_MASTER_KEY_ENV};
use crate::errors::{KeeError, Result};

/// Execute the `rotate-key` command.
pub fn execute(cli: &Cli) -> Result<()> {
    // 1. Open the vault with the current key.
    output::info("Enter your current master key.");
    let mut vault = open_vault(cli)?;

    // 2. Prompt for the new key.
    output::info("Choose your new master key.");
    let new_key = prompt_new_master_key(NEW_MASTER_KEY_ENV)?;
    if *vault.master_key()? == *new_key.as_str() {
        return Err(KeeError::CommandFailed(
            "the new master key is the same as the current one".into(),
        ));
    }

    // 3. Swap the key and re-encrypt everything.
    vault.set_master_key(new_key.as_str())?;
    vault.save()?;

    let items: usize = vault.groups()?.iter().map(|g| g.len()).sum();
    output::success(&format!(
        "Master key rotated for '{}' ({items} item(s) re-encrypted)",
        vault.name()
    ));

    Ok(())
}
