//! Binary-to-text encoders applied after hashing and encryption.

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use data_encoding::BASE32;

use crate::errors::{KeeError, Result};

/// A reversible binary-to-text encoding.
pub trait Encoder: fmt::Debug + Send + Sync {
    /// Stable identifier persisted in vault metadata.
    fn id(&self) -> &'static str;

    fn encode(&self, data: &[u8]) -> Vec<u8>;

    fn decode(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// RFC 4648 standard base64 alphabet, padded.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64;

/// RFC 4648 base32 alphabet, padded.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base32;

impl Encoder for Base64 {
    fn id(&self) -> &'static str {
        "Base64"
    }

    fn encode(&self, data: &[u8]) -> Vec<u8> {
        BASE64.encode(data).into_bytes()
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        BASE64
            .decode(data)
            .map_err(|e| KeeError::Decoding(format!("base64: {e}")))
    }
}

impl Encoder for Base32 {
    fn id(&self) -> &'static str {
        "Base32"
    }

    fn encode(&self, data: &[u8]) -> Vec<u8> {
        BASE32.encode(data).into_bytes()
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        BASE32
            .decode(data)
            .map_err(|e| KeeError::Decoding(format!("base32: {e}")))
    }
}

/// Every registered encoder, default first.
pub const ALL: &[&dyn Encoder] = &[&Base64, &Base32];

/// Look up an encoder by its persisted id.
pub fn from_id(id: &str) -> Option<&'static dyn Encoder> {
    ALL.iter().copied().find(|e| e.id() == id)
}
