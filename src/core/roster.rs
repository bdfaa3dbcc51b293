//! Access-control roster.
//!
//! The roster (`envseal.toml`) is the authoritative list of who *should* be
//! able to open a project's vaults. It is independent of any single vault's
//! current wrap set: adding or removing a user here changes nothing until the
//! vault is rekeyed against [`Roster::public_keys`]. Removing a user in
//! particular does not revoke anything; only [`Vault::rotate_key`] does.
//!
//! [`Vault::rotate_key`]: crate::core::vault::Vault::rotate_key

use std::collections::HashSet;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::cipher;
use crate::core::store::Store;
use crate::core::types::{MemberName, PublicKey};
use crate::core::validation;
use crate::error::{Result, RosterError, StoreError};

/// A roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: MemberName,
    pub public_key: PublicKey,
}

/// Serialized form of the roster.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Manifest {
    #[serde(default)]
    project_name: String,
    #[serde(default)]
    access_control: Vec<User>,
}

impl Manifest {
    /// Trim fields, drop entries without a key, keep the first entry per key,
    /// and sort.
    fn normalize(&mut self) {
        let mut seen = HashSet::with_capacity(self.access_control.len());
        let mut users = Vec::with_capacity(self.access_control.len());

        for mut user in self.access_control.drain(..) {
            user.name = user.name.trim().to_string();
            user.public_key = user.public_key.trim().to_string();

            if user.public_key.is_empty() {
                warn!(name = %user.name, "dropping roster entry without a public key");
                continue;
            }
            if !seen.insert(user.public_key.clone()) {
                warn!(name = %user.name, "dropping duplicate roster entry");
                continue;
            }
            users.push(user);
        }

        self.access_control = users;
        self.sort();
    }

    /// By name, then public key, so re-saves produce identical files.
    fn sort(&mut self) {
        self.access_control.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.public_key.cmp(&b.public_key))
        });
    }
}

/// The access-control roster for a project.
pub struct Roster<S: Store> {
    store: S,
    manifest: RwLock<Manifest>,
}

impl<S: Store> Roster<S> {
    /// Empty roster for a new project.
    pub fn new(store: S, project_name: &str) -> Self {
        Self {
            store,
            manifest: RwLock::new(Manifest {
                project_name: project_name.trim().to_string(),
                access_control: Vec::new(),
            }),
        }
    }

    /// Load the roster from `store`.
    ///
    /// A missing document yields an empty roster. Hand-edited documents are
    /// repaired rather than rejected: entries without a key are dropped and
    /// duplicate keys keep their first occurrence.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Parse` if the document is not valid TOML.
    pub fn load(store: S) -> Result<Self> {
        debug!(path = %store.location(), "loading roster");

        let mut manifest = match store.read()? {
            Some(contents) => {
                toml::from_str::<Manifest>(&contents).map_err(|source| StoreError::Parse {
                    path: store.location(),
                    source,
                })?
            }
            None => Manifest::default(),
        };
        manifest.normalize();

        debug!(users = manifest.access_control.len(), "roster loaded");

        Ok(Self {
            store,
            manifest: RwLock::new(manifest),
        })
    }

    /// Persist the roster.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or the atomic write fails.
    pub fn save(&self) -> Result<()> {
        let manifest = self.manifest.write();
        let contents = toml::to_string_pretty(&*manifest).map_err(StoreError::Serialize)?;
        self.store.write(&contents)?;

        debug!(
            path = %self.store.location(),
            users = manifest.access_control.len(),
            "roster saved"
        );
        Ok(())
    }

    /// Add a user.
    ///
    /// # Errors
    ///
    /// Returns `RosterError::InvalidName` for an empty or malformed alias,
    /// `RosterError::InvalidPubKey` for an empty or unparseable key, and
    /// `RosterError::UserExists` if the key is already listed.
    pub fn add_user(&self, name: &str, public_key: &str) -> Result<()> {
        let name = name.trim();
        let public_key = public_key.trim();

        if !validation::is_valid_alias(name) {
            return Err(RosterError::InvalidName(name.to_string()).into());
        }
        if public_key.is_empty() || cipher::parse_recipient(public_key).is_err() {
            return Err(RosterError::InvalidPubKey(public_key.to_string()).into());
        }

        let mut manifest = self.manifest.write();
        if manifest
            .access_control
            .iter()
            .any(|u| u.public_key == public_key)
        {
            return Err(RosterError::UserExists(public_key.to_string()).into());
        }

        manifest.access_control.push(User {
            name: name.to_string(),
            public_key: public_key.to_string(),
        });
        manifest.sort();

        debug!(user = %name, "user added");
        Ok(())
    }

    /// Remove every user whose name or public key equals `identifier`.
    ///
    /// Returns whether anything was removed. This does not revoke vault
    /// access.
    pub fn remove_user(&self, identifier: &str) -> bool {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return false;
        }

        let mut manifest = self.manifest.write();
        let before = manifest.access_control.len();
        manifest
            .access_control
            .retain(|u| u.name != identifier && u.public_key != identifier);

        let removed = manifest.access_control.len() != before;
        if removed {
            debug!(identifier, "user removed");
        }
        removed
    }

    /// Like [`Roster::remove_user`] but fails when nothing matched.
    ///
    /// # Errors
    ///
    /// Returns `RosterError::UserNotFound` if no user matched.
    pub fn remove_user_strict(&self, identifier: &str) -> Result<()> {
        if !self.remove_user(identifier) {
            return Err(RosterError::UserNotFound(identifier.trim().to_string()).into());
        }
        Ok(())
    }

    /// Public keys of every user, in roster order.
    pub fn public_keys(&self) -> Vec<PublicKey> {
        self.manifest
            .read()
            .access_control
            .iter()
            .filter(|u| !u.public_key.is_empty())
            .map(|u| u.public_key.clone())
            .collect()
    }

    /// Look up a user by public key.
    pub fn find_by_public_key(&self, public_key: &str) -> Option<User> {
        let public_key = public_key.trim();
        self.manifest
            .read()
            .access_control
            .iter()
            .find(|u| u.public_key == public_key)
            .cloned()
    }

    /// Snapshot of all users.
    pub fn users(&self) -> Vec<User> {
        self.manifest.read().access_control.clone()
    }

    /// Project identifier.
    pub fn project_name(&self) -> String {
        self.manifest.read().project_name.clone()
    }
}

impl<S: Store> std::fmt::Debug for Roster<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let manifest = self.manifest.read();
        f.debug_struct("Roster")
            .field("location", &self.store.location())
            .field("project_name", &manifest.project_name)
            .field("users", &manifest.access_control.len())
            .finish()
    }
}
