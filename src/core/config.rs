//! Runtime configuration.
//!
//! Everything that used to be a process-wide path lives in [`Settings`],
//! which is built once at startup and passed down explicitly.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::constants::{MANIFEST_FILE, SECRETS_FILE};
use crate::core::identity::Identity;
use crate::core::store::Filesystem;
use crate::error::Result;

/// How a batch listing treats entries that cannot be unsealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListPolicy {
    /// Report the entry as unsealable with its raw stored text and keep going.
    #[default]
    BestEffort,
    /// Stop at the first entry that cannot be unsealed and return the error.
    FailFast,
}

/// Locations and policies for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Encrypted secrets file.
    pub secrets_path: PathBuf,
    /// Roster (manifest) file.
    pub manifest_path: PathBuf,
    /// Private key file; `None` means `~/.envseal/identity`.
    pub identity: Option<PathBuf>,
    /// Listing behavior for `print`.
    pub listing: ListPolicy,
}

impl Settings {
    /// Defaults rooted at `project_dir`.
    ///
    /// The home directory is not consulted until [`Settings::identity_path`]
    /// is called without an explicit identity.
    pub fn for_project(project_dir: &Path) -> Self {
        Self {
            secrets_path: project_dir.join(SECRETS_FILE),
            manifest_path: project_dir.join(MANIFEST_FILE),
            identity: None,
            listing: ListPolicy::default(),
        }
    }

    /// Apply command-line overrides on top of the defaults.
    pub fn with_overrides(
        mut self,
        secrets: Option<PathBuf>,
        manifest: Option<PathBuf>,
        identity: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = secrets {
            self.secrets_path = path;
        }
        if let Some(path) = manifest {
            self.manifest_path = path;
        }
        if identity.is_some() {
            self.identity = identity;
        }

        debug!(
            secrets = %self.secrets_path.display(),
            manifest = %self.manifest_path.display(),
            identity = ?self.identity,
            "settings resolved"
        );
        self
    }

    /// Private key file, falling back to the default location.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NoHomeDir` if no identity was given and the home
    /// directory is unknown.
    pub fn identity_path(&self) -> Result<PathBuf> {
        match &self.identity {
            Some(path) => Ok(path.clone()),
            None => Identity::default_path(),
        }
    }

    /// Store for the secrets file.
    pub fn secrets_store(&self) -> Filesystem {
        Filesystem::new(&self.secrets_path)
    }

    /// Store for the roster file.
    pub fn manifest_store(&self) -> Filesystem {
        Filesystem::new(&self.manifest_path)
    }
}
