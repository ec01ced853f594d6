//! Cryptographic strategies and key material for Kee.
//!
//! This module provides:
//! - Master key fingerprint digests (`hasher`)
//! - AES-256-CBC item payload encryption (`cipher`)
//! - Binary-to-text encodings for stored blobs (`encoder`)
//! - The zeroizing `MasterKey` and fingerprint checks (`keys`)
//! - Random salts and generated passwords (`generate`)
//!
//! Each strategy family is a trait plus a `from_id` registry so vault
//! metadata only needs to persist the strategy's id.

pub mod cipher;
pub mod encoder;
pub mod generate;
pub mod hasher;
pub mod keys;

pub use cipher::Cipher;
pub use encoder::Encoder;
pub use hasher::Hasher;
pub use keys::{fingerprint, generate_salt, verify_fingerprint, MasterKey};
