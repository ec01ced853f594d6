//! `kee strategy`: show or change the hasher, cipher and encoder.

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::crypto::{cipher, encoder, hasher};
use crate::errors::{KeeError, Result};

/// Execute the `strategy` command.
pub fn execute(
    cli: &Cli,
    hasher_id: Option<&str>,
    cipher_id: Option<&str>,
    encoder_id: Option<&str>,
) -> Result<()> {
    let mut vault = open_vault(cli)?;

    if hasher_id.is_none() && cipher_id.is_none() && encoder_id.is_none() {
        output::info(&format!(
            "hasher {} / cipher {} / encoder {}",
            vault.hasher()?.id(),
            vault.cipher()?.id(),
            vault.encoder()?.id()
        ));
        output::tip(&format!(
            "Available: hashers {}; ciphers {}; encoders {}",
            ids(hasher::ALL.iter().filter(|h| !h.is_legacy()).map(|h| h.id())),
            ids(cipher::ALL.iter().map(|c| c.id())),
            ids(encoder::ALL.iter().map(|e| e.id())),
        ));
        return Ok(());
    }

    if let Some(id) = hasher_id {
        vault.set_hasher(hasher::from_id(id).ok_or_else(|| unknown("hasher", id))?)?;
    }
    if let Some(id) = cipher_id {
        vault.set_cipher(cipher::from_id(id).ok_or_else(|| unknown("cipher", id))?)?;
    }
    if let Some(id) = encoder_id {
        vault.set_encoder(encoder::from_id(id).ok_or_else(|| unknown("encoder", id))?)?;
    }
    vault.save()?;

    output::success(&format!(
        "Vault now uses {} / {} / {}",
        vault.hasher()?.id(),
        vault.cipher()?.id(),
        vault.encoder()?.id()
    ));
    Ok(())
}

fn unknown(family: &'static str, id: &str) -> KeeError {
    KeeError::UnknownStrategy {
        family,
        id: id.to_string(),
    }
}

fn ids<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    ids.collect::<Vec<_>>().join(", ")
}
