//! Secret operations.
//!
//! New values are always written to the canonical `secrets` map. Legacy
//! top-level entries are read as a fallback and removed when the same name is
//! written again.

use std::collections::BTreeMap;

use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::document::Stored;
use super::Vault;
use crate::core::config::ListPolicy;
use crate::core::seal;
use crate::core::store::Store;
use crate::core::types::SecretKey;
use crate::core::validation;
use crate::error::{Result, VaultError};

/// One entry of [`Vault::get_all_secrets`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListedSecret {
    /// Recovered plaintext.
    Plain(Zeroizing<String>),
    /// The value could not be unsealed; `raw` is the stored text.
    Unsealable { raw: String },
}

impl ListedSecret {
    /// Plaintext, or the raw stored text for unsealable entries.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Plain(value) => value.as_str(),
            Self::Unsealable { raw } => raw,
        }
    }

    pub fn is_unsealable(&self) -> bool {
        matches!(self, Self::Unsealable { .. })
    }
}

impl<S: Store> Vault<S> {
    /// Seal `plaintext` under `name` in the canonical map.
    ///
    /// Any legacy top-level entry of the same name is removed.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Locked` if the vault is locked and a
    /// `ValidationError` for an empty, reserved or malformed name.
    pub fn set_secret(&self, name: &str, plaintext: &str) -> Result<()> {
        let mut state = self.state.write();
        let dek = state.dek.as_ref().ok_or(VaultError::Locked)?;
        let name = validation::validate_key(name)?;

        let sealed = seal::seal_str(plaintext, dek)?;
        state.doc.secrets.insert(name.to_string(), Stored::Sealed(sealed));
        if state.doc.legacy.remove(name).is_some() {
            debug!(key = name, "migrated legacy entry");
        }

        debug!(key = name, "secret set");
        Ok(())
    }

    /// Remove `name` from both the canonical map and the legacy entries.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Locked` if the vault is locked and
    /// `VaultError::KeyNotFound` if neither location held the name.
    pub fn unset_secret(&self, name: &str) -> Result<()> {
        let mut state = self.state.write();
        if state.dek.is_none() {
            return Err(VaultError::Locked.into());
        }
        let name = validation::normalize_key(name)?;

        let canonical = state.doc.secrets.remove(name).is_some();
        let legacy = state.doc.legacy.remove(name).is_some();
        if !canonical && !legacy {
            return Err(VaultError::KeyNotFound(name.to_string()).into());
        }

        debug!(key = name, "secret removed");
        Ok(())
    }

    /// Plaintext of `name`.
    ///
    /// The canonical entry wins; otherwise a legacy entry is used, unsealed if
    /// it carries the marker and passed through if it is plain text.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Locked`, `VaultError::KeyNotFound`,
    /// `VaultError::InvalidFormat` for a non-string value and a
    /// `CipherError` if the value does not unseal.
    pub fn get_secret(&self, name: &str) -> Result<Zeroizing<String>> {
        let state = self.state.read();
        let dek = state.dek.as_ref().ok_or(VaultError::Locked)?;
        let name = validation::normalize_key(name)?;

        let stored = state
            .doc
            .secrets
            .get(name)
            .or_else(|| state.doc.legacy.get(name))
            .ok_or_else(|| VaultError::KeyNotFound(name.to_string()))?;

        stored.reveal(name, dek)
    }

    /// Every readable secret, keyed by name.
    ///
    /// Canonical entries shadow legacy ones. Legacy non-string values are
    /// skipped. Entries that cannot be unsealed are handled per the vault's
    /// [`ListPolicy`].
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Locked` if the vault is locked, or the first
    /// unseal error under `ListPolicy::FailFast`.
    pub fn get_all_secrets(&self) -> Result<BTreeMap<SecretKey, ListedSecret>> {
        let state = self.state.read();
        let dek = state.dek.as_ref().ok_or(VaultError::Locked)?;

        let legacy = state
            .doc
            .legacy
            .iter()
            .filter(|(name, stored)| {
                !matches!(stored, Stored::Other(_)) && !state.doc.secrets.contains_key(*name)
            });

        let mut out = BTreeMap::new();
        for (name, stored) in state.doc.secrets.iter().chain(legacy) {
            let entry = match stored.reveal(name, dek) {
                Ok(value) => ListedSecret::Plain(value),
                Err(e) if self.listing == ListPolicy::FailFast => return Err(e),
                Err(e) => {
                    warn!(key = %name, error = %e, "returning raw value for unreadable secret");
                    ListedSecret::Unsealable {
                        raw: stored.raw_text(),
                    }
                }
            };
            out.insert(name.clone(), entry);
        }

        Ok(out)
    }
}
