//! Value sealing.
//!
//! Secret values are sealed with ChaCha20-Poly1305 under the vault's data
//! encryption key (DEK). A sealed value is stored as text:
//!
//! ```text
//! ENC[age,chacha20,<base64(nonce || ciphertext || tag)>]
//! ```
//!
//! Every call to [`seal`] draws a fresh random 12-byte nonce. [`unseal`]
//! authenticates before returning anything, so a flipped bit in the nonce,
//! ciphertext or tag is an error rather than garbage plaintext.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chacha20poly1305::aead::rand_core::RngCore;
use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use tracing::trace;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::core::constants::{SEAL_PREFIX, SEAL_SUFFIX};
use crate::error::{CipherError, Result};

/// DEK length in bytes.
pub const DEK_LEN: usize = 32;

/// Nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// Authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Data encryption key.
///
/// The bytes are wiped when the key is dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Dek {
    bytes: [u8; DEK_LEN],
}

impl Dek {
    /// Mint a new random key from the OS generator.
    pub fn generate() -> Self {
        let mut bytes = [0u8; DEK_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Build a key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::InvalidKeyLength` unless `bytes` is exactly
    /// [`DEK_LEN`] long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != DEK_LEN {
            return Err(CipherError::InvalidKeyLength {
                got: bytes.len(),
                want: DEK_LEN,
            }
            .into());
        }
        let mut key = Self {
            bytes: [0u8; DEK_LEN],
        };
        key.bytes.copy_from_slice(bytes);
        Ok(key)
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; DEK_LEN] {
        &self.bytes
    }

    fn aead(&self) -> ChaCha20Poly1305 {
        ChaCha20Poly1305::new(Key::from_slice(&self.bytes))
    }
}

impl fmt::Debug for Dek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Dek(<redacted>)")
    }
}

impl PartialEq for Dek {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for Dek {}

/// A sealed secret value as it appears in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedValue {
    payload: String,
}

impl SealedValue {
    /// Recognize a stored string as sealed.
    ///
    /// Returns `None` for anything lacking the marker; such strings are
    /// legacy plaintext. The payload is not decoded here.
    pub fn parse(stored: &str) -> Option<Self> {
        let payload = stored.strip_prefix(SEAL_PREFIX)?.strip_suffix(SEAL_SUFFIX)?;
        Some(Self {
            payload: payload.to_string(),
        })
    }

    /// Base64 payload without the marker.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            payload: STANDARD.encode(bytes),
        }
    }
}

impl fmt::Display for SealedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", SEAL_PREFIX, self.payload, SEAL_SUFFIX)
    }
}

/// Seal `plaintext` under `dek` with a fresh nonce.
///
/// # Errors
///
/// Returns `CipherError::EncryptionFailed` if the AEAD rejects the input.
pub fn seal(plaintext: &[u8], dek: &Dek) -> Result<SealedValue> {
    let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);
    let ciphertext = dek
        .aead()
        .encrypt(&nonce, plaintext)
        .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;

    let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&ciphertext);

    trace!(plaintext_len = plaintext.len(), sealed_len = out.len(), "sealed");
    Ok(SealedValue::from_bytes(&out))
}

/// Unseal a value with `dek`.
///
/// # Errors
///
/// Returns `CipherError::MalformedSeal` if the payload is not base64 or too
/// short to hold a nonce and tag, and `CipherError::Authentication` if the
/// tag does not verify under `dek`.
pub fn unseal(sealed: &SealedValue, dek: &Dek) -> Result<Zeroizing<Vec<u8>>> {
    let data = STANDARD
        .decode(sealed.payload())
        .map_err(|e| CipherError::MalformedSeal(format!("{}", e)))?;

    if data.len() < NONCE_LEN + TAG_LEN {
        return Err(CipherError::MalformedSeal("ciphertext too short".to_string()).into());
    }

    let (nonce, ciphertext) = data.split_at(NONCE_LEN);
    let plaintext = dek
        .aead()
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CipherError::Authentication)?;

    trace!(plaintext_len = plaintext.len(), "unsealed");
    Ok(Zeroizing::new(plaintext))
}

/// Seal a UTF-8 secret.
pub fn seal_str(plaintext: &str, dek: &Dek) -> Result<SealedValue> {
    seal(plaintext.as_bytes(), dek)
}

/// Unseal a value that is expected to hold UTF-8 text.
///
/// # Errors
///
/// As [`unseal`], plus `CipherError::MalformedSeal` if the plaintext is not
/// valid UTF-8.
pub fn unseal_str(sealed: &SealedValue, dek: &Dek) -> Result<Zeroizing<String>> {
    let bytes = unseal(sealed, dek)?;
    let text = std::str::from_utf8(&bytes)
        .map_err(|_| CipherError::MalformedSeal("plaintext is not valid UTF-8".to_string()))?;
    Ok(Zeroizing::new(text.to_string()))
}
