//! Identity type.
//!
//! Wraps an age private key. The key lives in a single-line text file
//! (`AGE-SECRET-KEY-1...`); the public key is derived from it.

use std::fs;
use std::path::{Path, PathBuf};

use age::secrecy::ExposeSecret;
use age::x25519;
use tracing::{debug, warn};

use crate::core::cipher;
use crate::core::constants::{FILE_MODE, IDENTITY_DIR, IDENTITY_DIR_MODE, IDENTITY_FILE};
use crate::core::store;
use crate::core::types::PublicKey;
use crate::error::{Result, StoreError};

/// A private key identity for unlocking vaults
pub struct Identity {
    inner: x25519::Identity,
    path: Option<PathBuf>,
}

impl Identity {
    /// Generate a new in-memory identity.
    pub fn generate() -> Self {
        let (inner, _) = cipher::generate_keypair();
        Self { inner, path: None }
    }

    /// Parse an identity from its textual form.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidFormat` if the text is not an age secret key.
    pub fn parse(text: &str) -> Result<Self> {
        let inner: x25519::Identity = text
            .trim()
            .parse()
            .map_err(|e: &str| StoreError::InvalidFormat(e.to_string()))?;
        Ok(Self { inner, path: None })
    }

    /// Load an identity from a key file.
    ///
    /// Insecure permissions are reported as a warning, not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NoPrivateKey` if the file does not exist and
    /// `StoreError::InvalidFormat` if it does not hold an age secret key.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading identity");

        if !path.exists() {
            return Err(StoreError::NoPrivateKey(path.display().to_string()).into());
        }

        #[cfg(unix)]
        warn_on_insecure_permissions(path);

        let contents = fs::read_to_string(path).map_err(|source| StoreError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;

        let mut identity = Self::parse(&contents)?;
        identity.path = Some(path.to_path_buf());

        debug!("identity loaded");
        Ok(identity)
    }

    /// Generate a new identity and save it to `path`.
    ///
    /// The parent directory is created with mode 0700 and the key file is
    /// written atomically with mode 0600.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::WriteFailed` if the directory or file cannot be
    /// written.
    pub fn create(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "generating new identity");

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            create_private_dir(dir)?;
        }

        let mut identity = Self::generate();
        let secret = identity.inner.to_string();
        store::write_atomic(
            path,
            format!("{}\n", secret.expose_secret()).as_bytes(),
            FILE_MODE,
        )?;
        identity.path = Some(path.to_path_buf());

        debug!(path = %path.display(), "identity saved");
        Ok(identity)
    }

    /// Default identity location (`~/.envseal/identity`).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NoHomeDir` if the home directory is unknown.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(StoreError::NoHomeDir)?;
        Ok(home.join(IDENTITY_DIR).join(IDENTITY_FILE))
    }

    /// Corresponding public key
    pub fn public_key(&self) -> PublicKey {
        self.inner.to_public().to_string()
    }

    /// Reference to the inner age identity for unwrapping
    pub fn as_age(&self) -> &x25519::Identity {
        &self.inner
    }

    /// Key file path, if the identity came from disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("path", &self.path)
            .field("public_key", &self.public_key())
            .finish()
    }
}

#[cfg(unix)]
fn warn_on_insecure_permissions(path: &Path) {
    use crate::core::validation::validate_file_permissions;

    if let Err(e) = validate_file_permissions(path, FILE_MODE) {
        warn!(path = %path.display(), "{}", e);
    }
}

fn create_private_dir(dir: &Path) -> Result<()> {
    let write_failed = |source| StoreError::WriteFailed {
        path: dir.display().to_string(),
        source,
    };

    if dir.exists() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(write_failed)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(IDENTITY_DIR_MODE))
            .map_err(write_failed)?;
    }
    #[cfg(not(unix))]
    let _ = IDENTITY_DIR_MODE;

    Ok(())
}
