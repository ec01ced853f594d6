//! Digest strategies used to fingerprint the master key.
//!
//! A vault stores only the hasher's id (e.g. `"SHA256"`), so the same
//! algorithm can be looked up again with [`from_id`] when the vault is
//! reopened.

use std::fmt;

use ring::digest;
use sha2::{Digest, Sha256 as Sha256Core, Sha512 as Sha512Core};

/// A stateless, deterministic digest function.
pub trait Hasher: fmt::Debug + Send + Sync {
    /// Stable identifier persisted in vault metadata.
    fn id(&self) -> &'static str;

    /// Digest the concatenation of `parts`.
    fn hash(&self, parts: &[&[u8]]) -> Vec<u8>;

    /// Legacy hashers can read old vaults but are never chosen for new ones.
    fn is_legacy(&self) -> bool {
        false
    }
}

/// SHA-256 (32-byte digest). The default for new vaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256;

/// SHA-512 (64-byte digest).
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha512;

/// SHA-1, retained only so vaults written with it can still be opened.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacySha1;

impl Hasher for Sha256 {
    fn id(&self) -> &'static str {
        "SHA256"
    }

    fn hash(&self, parts: &[&[u8]]) -> Vec<u8> {
        let mut h = Sha256Core::new();
        for part in parts {
            h.update(part);
        }
        h.finalize().to_vec()
    }
}

impl Hasher for Sha512 {
    fn id(&self) -> &'static str {
        "SHA512"
    }

    fn hash(&self, parts: &[&[u8]]) -> Vec<u8> {
        let mut h = Sha512Core::new();
        for part in parts {
            h.update(part);
        }
        h.finalize().to_vec()
    }
}

impl Hasher for LegacySha1 {
    fn id(&self) -> &'static str {
        "SHA1"
    }

    fn hash(&self, parts: &[&[u8]]) -> Vec<u8> {
        let mut ctx = digest::Context::new(&digest::SHA1_FOR_LEGACY_USE_ONLY);
        for part in parts {
            ctx.update(part);
        }
        ctx.finish().as_ref().to_vec()
    }

    fn is_legacy(&self) -> bool {
        true
    }
}

/// Every registered hasher, default first.
pub const ALL: &[&dyn Hasher] = &[&Sha256, &Sha512, &LegacySha1];

/// Look up a hasher by its persisted id.
pub fn from_id(id: &str) -> Option<&'static dyn Hasher> {
    ALL.iter().copied().find(|h| h.id() == id)
}
