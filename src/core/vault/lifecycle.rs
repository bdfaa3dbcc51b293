//! Lock state.
//!
//! Unlocking recovers the DEK from the first recipient entry the identity can
//! unwrap. Every failure mode (no matching entry, a corrupt wrapped key, a
//! malformed metadata block) surfaces as the same `AccessDenied`.

use tracing::debug;

use super::document::MetadataBlock;
use super::Vault;
use crate::core::cipher;
use crate::core::identity::Identity;
use crate::core::store::Store;
use crate::error::{Result, VaultError};

impl<S: Store> Vault<S> {
    /// Recover the DEK with `identity`.
    ///
    /// On failure the vault keeps whatever lock state it had. On success a
    /// previously held DEK is replaced and wiped.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::MissingMetadata` if the document has no
    /// `_envseal` block and `VaultError::AccessDenied` if no entry unwraps.
    pub fn unlock(&self, identity: &Identity) -> Result<()> {
        let mut state = self.state.write();

        let entries = match &state.doc.metadata {
            None => return Err(VaultError::MissingMetadata.into()),
            Some(MetadataBlock::Unreadable(_)) => return Err(VaultError::AccessDenied.into()),
            Some(MetadataBlock::Parsed(metadata)) => &metadata.recipients,
        };

        let mut tried = 0usize;
        let found = entries.iter().find_map(|entry| {
            tried += 1;
            cipher::unwrap_key(&entry.wrapped_key, identity.as_age()).ok()
        });

        let Some(dek) = found else {
            debug!(tried, "no recipient entry unwrapped");
            return Err(VaultError::AccessDenied.into());
        };

        state.dek = Some(dek);
        debug!(path = %self.store.location(), "vault unlocked");
        Ok(())
    }

    /// Discard the DEK. Idempotent.
    pub fn lock(&self) {
        // Dropping the key zeroizes it.
        if self.state.write().dek.take().is_some() {
            debug!(path = %self.store.location(), "vault locked");
        }
    }

    /// Whether the DEK is held.
    pub fn is_unlocked(&self) -> bool {
        self.state.read().dek.is_some()
    }
}
