//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// A secret name (e.g., DATABASE_URL, API_KEY).
pub type SecretKey = String;

/// An age public key string (starts with "age1...").
///
/// Identifies a recipient in the vault metadata and in the roster.
pub type PublicKey = String;

/// A roster member alias.
pub type MemberName = String;

/// An ASCII-armored age ciphertext holding a wrapped DEK.
pub type WrappedKey = String;
