//! Error types.
//!
//! One crate-wide [`Error`] composed of per-concern enums. Each concern maps to
//! a distinct remediation: locked-state errors are fixed by unlocking, access
//! errors need a different key, validation errors leave state untouched,
//! integrity errors mean the stored value is corrupt or sealed under another
//! key, and persistence errors come straight from the filesystem.

use thiserror::Error;

/// Crate-wide error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Vault state and access errors.
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("vault is locked: unlock it first")]
    Locked,

    #[error("access denied: your private key is not in the recipients list")]
    AccessDenied,

    #[error("corrupt or uninitialized file: missing _envseal block")]
    MissingMetadata,

    #[error("recipients list cannot be empty")]
    EmptyRecipients,

    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("invalid format for '{key}': {reason}")]
    InvalidFormat { key: String, reason: String },
}

/// Asymmetric wrap and symmetric seal errors.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("failed to decrypt value (possible corruption or incorrect key)")]
    Authentication,

    #[error("malformed sealed value: {0}")]
    MalformedSeal(String),

    #[error("invalid key size: got {got}, want {want}")]
    InvalidKeyLength { got: usize, want: usize },

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("armor encoding failed: {0}")]
    ArmorFailed(String),
}

/// Roster (access-control manifest) errors.
#[derive(Error, Debug)]
pub enum RosterError {
    #[error("invalid name '{0}' (allowed: letters, numbers, '_', '.', '-', 2-64 chars)")]
    InvalidName(String),

    #[error("invalid public key: {0}")]
    InvalidPubKey(String),

    #[error("a user with this public key already exists: {0}")]
    UserExists(String),

    #[error("user not found: {0}")]
    UserNotFound(String),
}

/// Persistence and identity file errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize document: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("no identity found at {0}")]
    NoPrivateKey(String),

    #[error("invalid identity format: {0}")]
    InvalidFormat(String),

    #[error("unable to determine home directory")]
    NoHomeDir,
}

/// Input validation errors. Raised before any state is touched.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("key cannot be empty")]
    EmptyKey,

    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("cannot use reserved name '{0}'")]
    ReservedName(String),

    #[error("insecure permissions on {path}: expected {expected}, found {actual}")]
    InvalidPermissions {
        path: String,
        expected: String,
        actual: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
