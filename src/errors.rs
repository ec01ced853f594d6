use std::path::PathBuf;
use thiserror::Error;

use crate::vault::{ItemKind, Status};

/// All errors that can occur in Kee.
#[derive(Debug, Error)]
pub enum KeeError {
    // --- Lifecycle errors ---
    #[error("Vault is closed: open it with the master key first")]
    ClosedVault,

    #[error("Authentication failed: wrong master key")]
    AuthenticationFailure,

    #[error("Illegal vault transition from {from} to {to}")]
    IllegalTransition { from: Status, to: Status },

    // --- Entity errors ---
    #[error("A group named '{0}' already exists")]
    DuplicateName(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Item kind mismatch: group holds {expected} items, got {found}")]
    TypeMismatch { expected: ItemKind, found: ItemKind },

    #[error("Invalid value for '{key}': {reason}")]
    ValidationFailure { key: String, reason: String },

    #[error("'{key}' is not a {kind} field")]
    UnknownField { kind: ItemKind, key: String },

    #[error("Identity violation: {0}")]
    IdentityViolation(String),

    #[error("{0} has never been saved to the vault")]
    Unpersisted(String),

    // --- Strategy errors ---
    #[error("Unknown {family} strategy '{id}'")]
    UnknownStrategy { family: &'static str, id: String },

    #[error("Strategy '{0}' is insecure and kept only for reading old vaults")]
    InsecureStrategy(String),

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: wrong key or corrupted data")]
    DecryptionFailed,

    #[error("Decoding failed: {0}")]
    Decoding(String),

    // --- Store errors ---
    #[error("Vault not found at {0}")]
    VaultNotFound(PathBuf),

    #[error("Vault already exists at {0}")]
    VaultAlreadyExists(PathBuf),

    #[error("Invalid vault format: {0}")]
    InvalidVaultFormat(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,
}

/// Convenience type alias for Kee results.
pub type Result<T> = std::result::Result<T, KeeError>;
