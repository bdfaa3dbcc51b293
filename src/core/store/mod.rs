//! Document persistence.
//!
//! Vaults and rosters never touch the filesystem directly; they are handed a
//! [`Store`] when constructed. Production code uses the atomic [`Filesystem`]
//! store, tests can use the in-memory [`Memory`] store.
//!
//! ## Adding a New Storage Backend
//!
//! 1. Implement the `Store` trait
//! 2. Add the implementation in a new file
//! 3. Re-export from this module

use crate::error::Result;

mod fs;
mod memory;

pub use fs::{stage, write_atomic, Filesystem, Staged};
pub use memory::Memory;

/// Storage for a single serialized document.
///
/// Stores are shared across threads together with the vault that owns them.
pub trait Store: Send + Sync {
    /// Read the whole document.
    ///
    /// Returns `None` if the document does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ReadFailed` for any other failure.
    fn read(&self) -> Result<Option<String>>;

    /// Replace the whole document.
    ///
    /// Implementations must never leave a partially written document behind:
    /// either the new contents are fully visible or the previous contents are.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::WriteFailed` if the document could not be replaced.
    fn write(&self, contents: &str) -> Result<()>;

    /// Human-readable location, used in logs and error messages.
    fn location(&self) -> String;
}
