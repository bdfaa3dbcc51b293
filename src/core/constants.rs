//! Constants used throughout envseal.
//!
//! Centralizes file names, reserved document keys and the seal marker.

/// Default encrypted secrets file name.
pub const SECRETS_FILE: &str = "secrets.enc.toml";

/// Default roster (manifest) file name.
pub const MANIFEST_FILE: &str = "envseal.toml";

/// Identity directory relative to HOME (~/.envseal).
pub const IDENTITY_DIR: &str = ".envseal";

/// Identity file name inside [`IDENTITY_DIR`].
pub const IDENTITY_FILE: &str = "identity";

/// Reserved top-level key holding the recipient metadata block.
pub const METADATA_KEY: &str = "_envseal";

/// Reserved top-level key holding the canonical secrets map.
pub const SECRETS_KEY: &str = "secrets";

/// Prefix of a sealed value.
pub const SEAL_PREFIX: &str = "ENC[age,chacha20,";

/// Suffix of a sealed value.
pub const SEAL_SUFFIX: &str = "]";

/// Mode for every file envseal writes (Unix only).
pub const FILE_MODE: u32 = 0o600;

/// Mode for the identity directory (Unix only).
pub const IDENTITY_DIR_MODE: u32 = 0o700;

/// Prefix for staged files awaiting an atomic rename.
pub const TEMP_PREFIX: &str = ".envseal-";

/// Suffix for staged files awaiting an atomic rename.
pub const TEMP_SUFFIX: &str = ".tmp";
