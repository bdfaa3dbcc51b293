//! Recipient management.
//!
//! Two ways to change who can open a vault:
//!
//! - [`Vault::rewrap_recipients`] keeps the DEK and replaces the wrap set.
//!   Cheap, but anyone who already recovered the DEK keeps it.
//! - [`Vault::rotate_key`] generates a new DEK, re-seals every value and
//!   wraps the new DEK for the target set. This is what revokes access.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use tracing::debug;
use zeroize::Zeroizing;

use super::document::{Metadata, MetadataBlock, RecipientEntry, Stored};
use super::Vault;
use crate::core::cipher;
use crate::core::seal::{self, Dek};
use crate::core::store::Store;
use crate::core::types::{PublicKey, SecretKey};
use crate::error::{Result, VaultError};

/// Trim, drop empties, dedupe and sort a recipient list.
///
/// # Errors
///
/// Returns `VaultError::EmptyRecipients` if nothing is left and
/// `CipherError::InvalidPublicKey` if any key does not parse.
pub fn normalize_recipients<K: AsRef<str>>(keys: &[K]) -> Result<Vec<PublicKey>> {
    let keys: BTreeSet<&str> = keys
        .iter()
        .map(|k| k.as_ref().trim())
        .filter(|k| !k.is_empty())
        .collect();

    if keys.is_empty() {
        return Err(VaultError::EmptyRecipients.into());
    }

    keys.into_iter()
        .map(|k| {
            cipher::parse_recipient(k)?;
            Ok(k.to_string())
        })
        .collect()
}

/// Wrap `dek` for each key.
pub(super) fn wrap_for(dek: &Dek, keys: &[PublicKey]) -> Result<Vec<RecipientEntry>> {
    keys.iter()
        .map(|key| {
            Ok(RecipientEntry {
                identifier: key.clone(),
                wrapped_key: cipher::wrap_key(dek, key)?,
            })
        })
        .collect()
}

impl<S: Store> Vault<S> {
    /// Re-wrap the current DEK for exactly `keys`.
    ///
    /// Sealed values are untouched. A removed recipient that already holds
    /// the DEK can still read them; use [`Vault::rotate_key`] to revoke.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Locked` if the vault is locked,
    /// `VaultError::EmptyRecipients` for an empty target set, and a
    /// `CipherError` if a key is invalid. The vault is unchanged on error.
    pub fn rewrap_recipients<K: AsRef<str>>(&self, keys: &[K]) -> Result<()> {
        let mut state = self.state.write();
        let dek = state.dek.as_ref().ok_or(VaultError::Locked)?;
        let keys = normalize_recipients(keys)?;
        let entries = wrap_for(dek, &keys)?;

        state.doc.metadata = Some(MetadataBlock::Parsed(Metadata {
            recipients: entries,
        }));

        debug!(recipients = keys.len(), "recipients rewrapped");
        Ok(())
    }

    /// Replace the DEK, re-seal every secret and wrap the new DEK for
    /// exactly `keys`.
    ///
    /// Legacy string entries are migrated into the canonical map; legacy
    /// non-string values are left in place. Nothing is committed until every
    /// step has succeeded.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Locked` if the vault is locked,
    /// `VaultError::EmptyRecipients` for an empty target set, a
    /// `CipherError` if a key is invalid or a value does not unseal, and
    /// `VaultError::InvalidFormat` for a non-string canonical value. The
    /// vault is unchanged on error.
    pub fn rotate_key<K: AsRef<str>>(&self, keys: &[K]) -> Result<()> {
        let mut state = self.state.write();
        let old = state.dek.as_ref().ok_or(VaultError::Locked)?;
        let keys = normalize_recipients(keys)?;

        let mut plaintexts: Vec<(SecretKey, Zeroizing<String>)> = Vec::new();
        for (name, stored) in &state.doc.secrets {
            plaintexts.push((name.clone(), stored.reveal(name, old)?));
        }
        let mut migrated = 0;
        for (name, stored) in &state.doc.legacy {
            if matches!(stored, Stored::Other(_)) || state.doc.secrets.contains_key(name) {
                continue;
            }
            plaintexts.push((name.clone(), stored.reveal(name, old)?));
            migrated += 1;
        }

        let dek = Dek::generate();
        let entries = wrap_for(&dek, &keys)?;
        let mut secrets = BTreeMap::new();
        for (name, plaintext) in &plaintexts {
            secrets.insert(name.clone(), Stored::Sealed(seal::seal_str(plaintext, &dek)?));
        }

        state.doc.metadata = Some(MetadataBlock::Parsed(Metadata {
            recipients: entries,
        }));
        state.doc.secrets = secrets;
        state.doc.legacy.retain(|_, stored| matches!(stored, Stored::Other(_)));
        state.dek = Some(dek);

        debug!(
            recipients = keys.len(),
            secrets = plaintexts.len(),
            migrated,
            "key rotated"
        );
        Ok(())
    }
}
