//! Symmetric cipher strategies for item payloads.
//!
//! `AES-CBC` layout of the returned byte buffer:
//!   [ 16-byte IV | AES-256-CBC ciphertext (PKCS#7 padded) ]
//!
//! The AES key is derived from the raw key and the vault's cipher salt
//! with PBKDF2-HMAC-SHA256, so the salt must be the same for encrypt and
//! decrypt.

use std::fmt;
use std::num::NonZeroU32;

use aes::Aes256;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use ring::pbkdf2;
use zeroize::Zeroize;

use crate::crypto::generate::random_bytes;
use crate::errors::{KeeError, Result};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// AES block size, which is also the IV length.
const BLOCK_LEN: usize = 16;

/// Derived AES-256 key length.
const KEY_LEN: usize = 32;

/// PBKDF2 iteration count for the per-vault cipher key.
pub const PBKDF2_ITERATIONS: u32 = 4096;

/// A stateless symmetric cipher keyed by a raw secret plus salt.
pub trait Cipher: fmt::Debug + Send + Sync {
    /// Stable identifier persisted in vault metadata.
    fn id(&self) -> &'static str;

    /// Encrypt `plaintext`; the output is self-contained (IV included).
    fn encrypt(&self, plaintext: &[u8], key: &[u8], salt: &[u8]) -> Result<Vec<u8>>;

    /// Decrypt data produced by `encrypt` with the same key and salt.
    fn decrypt(&self, ciphertext: &[u8], key: &[u8], salt: &[u8]) -> Result<Vec<u8>>;
}

/// AES-256 in CBC mode with a random IV per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct AesCbc;

impl AesCbc {
    fn derive_key(key: &[u8], salt: &[u8]) -> [u8; KEY_LEN] {
        let mut out = [0u8; KEY_LEN];
        let iterations =
            NonZeroU32::new(PBKDF2_ITERATIONS).unwrap_or(NonZeroU32::MIN);
        pbkdf2::derive(pbkdf2::PBKDF2_HMAC_SHA256, iterations, salt, key, &mut out);
        out
    }
}

impl Cipher for AesCbc {
    fn id(&self) -> &'static str {
        "AES-CBC"
    }

    fn encrypt(&self, plaintext: &[u8], key: &[u8], salt: &[u8]) -> Result<Vec<u8>> {
        let iv = random_bytes(BLOCK_LEN);
        let mut aes_key = Self::derive_key(key, salt);
        let cipher = Aes256CbcEnc::new_from_slices(&aes_key, &iv);
        aes_key.zeroize();
        let cipher = cipher
            .map_err(|e| KeeError::EncryptionFailed(format!("invalid key or IV length: {e}")))?;

        let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext);

        // Prepend the IV so the caller only needs to store one blob.
        let mut output = Vec::with_capacity(BLOCK_LEN + ciphertext.len());
        output.extend_from_slice(&iv);
        output.extend_from_slice(&ciphertext);
        Ok(output)
    }

    fn decrypt(&self, ciphertext: &[u8], key: &[u8], salt: &[u8]) -> Result<Vec<u8>> {
        // An IV plus at least one padded block.
        if ciphertext.len() < 2 * BLOCK_LEN || ciphertext.len() % BLOCK_LEN != 0 {
            return Err(KeeError::DecryptionFailed);
        }

        let (iv, body) = ciphertext.split_at(BLOCK_LEN);
        let mut aes_key = Self::derive_key(key, salt);
        let cipher = Aes256CbcDec::new_from_slices(&aes_key, iv);
        aes_key.zeroize();

        cipher
            .map_err(|_| KeeError::DecryptionFailed)?
            .decrypt_padded_vec_mut::<Pkcs7>(body)
            .map_err(|_| KeeError::DecryptionFailed)
    }
}

/// Every registered cipher, default first.
pub const ALL: &[&dyn Cipher] = &[&AesCbc];

/// Look up a cipher by its persisted id.
pub fn from_id(id: &str) -> Option<&'static dyn Cipher> {
    ALL.iter().copied().find(|c| c.id() == id)
}
