//! Asymmetric key wrapping.
//!
//! The vault never encrypts secret values to people directly. Each value is
//! sealed once under the DEK, and the DEK itself is wrapped individually for
//! every authorized public key. This module provides the wrapping half of
//! that envelope.
//!
//! ## Backends
//!
//! - **age**: Default, always available. Uses x25519 public-key encryption
//!   with ASCII armor.
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `Cipher` trait
//! 2. Add the implementation in a new file
//! 3. Re-export from this module

use ::age::x25519;
use zeroize::Zeroizing;

use crate::core::seal::Dek;
use crate::core::types::WrappedKey;
use crate::error::Result;

mod age;

pub use self::age::{generate_keypair, parse_recipient, Age};

/// Asymmetric encryption backend.
///
/// Recipients and identities are backend-specific. For age they are x25519
/// public keys (`age1...`) and secret keys (`AGE-SECRET-KEY-1...`).
pub trait Cipher {
    /// Type representing a recipient public key.
    type Recipient;

    /// Type representing a private identity/key.
    type Identity;

    /// Encrypt a short byte string for every recipient.
    ///
    /// # Errors
    ///
    /// Returns `CipherError` if encryption fails.
    fn encrypt(&self, plaintext: &[u8], recipients: &[Self::Recipient]) -> Result<String>;

    /// Decrypt an armored ciphertext with a private identity.
    ///
    /// # Errors
    ///
    /// Returns `CipherError` if the identity does not match or the input is
    /// malformed.
    fn decrypt(&self, encrypted: &str, identity: &Self::Identity) -> Result<Zeroizing<Vec<u8>>>;
}

/// Wrap a DEK for a single age recipient.
///
/// # Errors
///
/// Returns `CipherError::InvalidPublicKey` if `public_key` does not parse,
/// or `CipherError::EncryptionFailed` if age refuses to encrypt.
pub fn wrap_key(dek: &Dek, public_key: &str) -> Result<WrappedKey> {
    let recipient = parse_recipient(public_key)?;
    Age.encrypt(dek.as_bytes(), &[recipient])
}

/// Unwrap a DEK with an age identity.
///
/// The plaintext must be exactly one DEK long; anything else is reported as a
/// decryption failure.
///
/// # Errors
///
/// Returns `CipherError` if the identity cannot open `wrapped` or the
/// payload has the wrong length.
pub fn unwrap_key(wrapped: &str, identity: &x25519::Identity) -> Result<Dek> {
    let bytes = Age.decrypt(wrapped, identity)?;
    Dek::from_slice(&bytes)
}
