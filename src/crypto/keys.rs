//! Master key handling and key fingerprints.
//!
//! The master key itself is never persisted.  A vault stores only its
//! fingerprint:
//!
//! ```text
//! fingerprint = encoder.encode(hasher.hash(utf8(master_key) || hash_salt))
//! ```

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use super::encoder::Encoder;
use super::generate::random_bytes;
use super::hasher::Hasher;

/// Length of the hash and cipher salts in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// The user's master key, wiped from memory when dropped.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct MasterKey {
    secret: String,
}

impl MasterKey {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.secret
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.secret.as_bytes()
    }
}

impl From<&str> for MasterKey {
    fn from(secret: &str) -> Self {
        Self::new(secret)
    }
}

impl From<String> for MasterKey {
    fn from(secret: String) -> Self {
        Self::new(secret)
    }
}

impl PartialEq<str> for MasterKey {
    fn eq(&self, other: &str) -> bool {
        bool::from(self.as_bytes().ct_eq(other.as_bytes()))
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey(***)")
    }
}

/// Compute the stored fingerprint of `master_key`.
pub fn fingerprint(
    master_key: &[u8],
    hash_salt: &[u8],
    hasher: &dyn Hasher,
    encoder: &dyn Encoder,
) -> Vec<u8> {
    encoder.encode(&hasher.hash(&[master_key, hash_salt]))
}

/// Check `master_key` against a stored fingerprint in constant time.
pub fn verify_fingerprint(
    master_key: &[u8],
    hash_salt: &[u8],
    hasher: &dyn Hasher,
    encoder: &dyn Encoder,
    expected: &[u8],
) -> bool {
    let actual = fingerprint(master_key, hash_salt, hasher, encoder);
    bool::from(actual.as_slice().ct_eq(expected))
}

/// Generate a cryptographically random salt.
pub fn generate_salt() -> Vec<u8> {
    random_bytes(SALT_LEN)
}
