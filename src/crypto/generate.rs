//! Random material: salts, IVs and generated passwords.

use rand::{Rng, RngCore};

use crate::errors::{KeeError, Result};

/// ASCII letters, digits and punctuation.
pub const DEFAULT_ALPHABET: &str = concat!(
    "abcdefghijklmnopqrstuvwxyz",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "0123456789",
    "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~",
);

/// Letters and digits only, for sites that reject punctuation.
pub const ALPHANUMERIC: &str = concat!(
    "abcdefghijklmnopqrstuvwxyz",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "0123456789",
);

/// Fill a fresh buffer with `len` cryptographically random bytes.
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    rand::rng().fill_bytes(&mut buf);
    buf
}

/// Generate a password of `len` characters drawn uniformly from `alphabet`.
pub fn password(len: usize, alphabet: &str) -> Result<String> {
    let chars: Vec<char> = alphabet.chars().collect();
    if chars.is_empty() {
        return Err(KeeError::CommandFailed("empty password alphabet".into()));
    }

    let mut rng = rand::rng();
    Ok((0..len)
        .map(|_| chars[rng.random_range(0..chars.len())])
        .collect())
}
