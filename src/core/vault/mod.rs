//! The vault: one encrypted secrets document.
//!
//! Every value is sealed under a single data-encryption key (DEK). The DEK is
//! wrapped once per recipient and stored in the `_envseal` block, so adding or
//! removing a recipient never touches the sealed values. Replacing the DEK
//! (and re-sealing everything) is a separate, explicit operation.
//!
//! A vault is shared by reference: mutations and persistence are serialized
//! behind an internal lock while reads run concurrently.

mod document;
mod lifecycle;
mod recipients;
mod secrets;

use parking_lot::RwLock;
use tracing::debug;

use crate::core::config::ListPolicy;
use crate::core::seal::{Dek, SealedValue};
use crate::core::store::Store;
use crate::error::Result;

use document::{Document, Metadata, MetadataBlock};

pub use document::RecipientEntry;
pub use recipients::normalize_recipients;
pub use secrets::ListedSecret;

/// Mutable vault state, guarded as a unit.
#[derive(Default)]
struct State {
    doc: Document,
    /// Present iff the vault is unlocked.
    dek: Option<Dek>,
}

/// An envelope-encrypted secrets vault backed by a [`Store`].
pub struct Vault<S: Store> {
    store: S,
    listing: ListPolicy,
    state: RwLock<State>,
}

impl<S: Store> Vault<S> {
    /// Load a vault from `store`.
    ///
    /// A missing document yields an empty, locked vault without metadata.
    /// The vault is always returned locked.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Parse` if the document is not valid TOML and
    /// `VaultError::InvalidFormat` if its `secrets` entry is not a table.
    pub fn load(store: S) -> Result<Self> {
        let location = store.location();
        debug!(path = %location, "loading vault");

        let doc = match store.read()? {
            Some(text) => Document::parse(&text, &location)?,
            None => {
                debug!(path = %location, "no vault document, starting empty");
                Document::default()
            }
        };

        debug!(
            secrets = doc.secrets.len(),
            legacy = doc.legacy.len(),
            recipients = doc.recipients().len(),
            "vault loaded"
        );

        Ok(Self {
            store,
            listing: ListPolicy::default(),
            state: RwLock::new(State { doc, dek: None }),
        })
    }

    /// Create a fresh vault for `recipients` with a new DEK.
    ///
    /// The vault is returned unlocked and is not persisted until
    /// [`Vault::save`] is called.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::EmptyRecipients` if no usable key remains after
    /// normalization and `CipherError::InvalidPublicKey` for an unparseable
    /// key.
    pub fn initialize<K: AsRef<str>>(store: S, recipients: &[K]) -> Result<Self> {
        let keys = normalize_recipients(recipients)?;
        let dek = Dek::generate();
        let entries = recipients::wrap_for(&dek, &keys)?;

        debug!(path = %store.location(), recipients = entries.len(), "vault initialized");

        let doc = Document {
            metadata: Some(MetadataBlock::Parsed(Metadata {
                recipients: entries,
            })),
            ..Document::default()
        };

        Ok(Self {
            store,
            listing: ListPolicy::default(),
            state: RwLock::new(State {
                doc,
                dek: Some(dek),
            }),
        })
    }

    /// Set how [`Vault::get_all_secrets`] treats values it cannot unseal.
    pub fn with_listing_policy(mut self, policy: ListPolicy) -> Self {
        self.listing = policy;
        self
    }

    /// Persist the vault atomically.
    ///
    /// Saving is allowed while locked; sealed values and wrapped keys are
    /// written back exactly as held.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or the atomic write fails. On failure
    /// the previous document is left intact.
    pub fn save(&self) -> Result<()> {
        let state = self.state.write();
        let contents = state.doc.render()?;
        self.store.write(&contents)?;

        debug!(path = %self.store.location(), secrets = state.doc.secrets.len(), "vault saved");
        Ok(())
    }

    /// Current recipient entries, in stored order.
    pub fn recipients(&self) -> Vec<RecipientEntry> {
        self.state.read().doc.recipients().to_vec()
    }

    /// Public keys the DEK is currently wrapped for.
    pub fn recipient_keys(&self) -> Vec<String> {
        self.state
            .read()
            .doc
            .recipients()
            .iter()
            .map(|r| r.identifier.clone())
            .collect()
    }

    /// Whether the document carries an `_envseal` block.
    pub fn has_metadata(&self) -> bool {
        self.state.read().doc.metadata.is_some()
    }

    /// Names of canonical secrets, sorted.
    pub fn names(&self) -> Vec<String> {
        self.state.read().doc.secrets.keys().cloned().collect()
    }

    /// Stored sealed form of a canonical secret, without unsealing it.
    pub fn sealed(&self, name: &str) -> Option<SealedValue> {
        match self.state.read().doc.secrets.get(name.trim()) {
            Some(document::Stored::Sealed(sealed)) => Some(sealed.clone()),
            _ => None,
        }
    }

    /// Where the vault is persisted.
    pub fn location(&self) -> String {
        self.store.location()
    }
}

impl<S: Store> std::fmt::Debug for Vault<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("Vault")
            .field("location", &self.store.location())
            .field("unlocked", &state.dek.is_some())
            .field("secrets", &state.doc.secrets.len())
            .field("recipients", &state.doc.recipients().len())
            .finish()
    }
}
