//! `kee generate`: print a random password.

use crate::cli::{load_settings, Cli};
use crate::crypto::generate::{self, ALPHANUMERIC, DEFAULT_ALPHABET};
use crate::errors::{KeeError, Result};

/// Execute the `generate` command.
pub fn execute(cli: &Cli, length: Option<usize>, alphanumeric: bool) -> Result<()> {
    let length = match length {
        Some(0) => {
            return Err(KeeError::CommandFailed(
                "password length must be at least 1".into(),
            ))
        }
        Some(n) => n,
        None => load_settings(cli)?.password_length,
    };
    let alphabet = if alphanumeric {
        ALPHANUMERIC
    } else {
        DEFAULT_ALPHABET
    };

    println!("{}", generate::password(length, alphabet)?);
    Ok(())
}
