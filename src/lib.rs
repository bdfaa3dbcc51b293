//! envseal - envelope-encrypted secrets that live in your repository.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── init          # Identity, roster and vault bootstrap
//! │   ├── secrets       # set / get / unset / print
//! │   ├── users         # Roster management
//! │   └── rekey         # Reconcile the vault with the roster
//! └── core/             # Core library components
//!     ├── cipher/       # age wrap/unwrap of the data key
//!     ├── seal          # ChaCha20-Poly1305 sealing of values
//!     ├── identity      # Private key file
//!     ├── store/        # Persistence: atomic filesystem, in-memory
//!     ├── roster        # Who should have access (envseal.toml)
//!     └── vault/        # The encrypted document (secrets.enc.toml)
//! ```
//!
//! # Model
//!
//! Values are sealed with one random data-encryption key (DEK). The DEK is
//! wrapped separately for every recipient's age public key. Changing the
//! recipient set rewraps the DEK; revoking access for someone who may have
//! kept it requires rotating the DEK.
//!
//! ```no_run
//! use envseal::{Identity, Memory, Vault};
//!
//! # fn main() -> envseal::Result<()> {
//! let me = Identity::generate();
//! let vault = Vault::initialize(Memory::new(), &[me.public_key()])?;
//! vault.set_secret("DATABASE_URL", "postgres://localhost/app")?;
//! vault.save()?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod core;
pub mod error;

pub use crate::core::config::{ListPolicy, Settings};
pub use crate::core::identity::Identity;
pub use crate::core::roster::{Roster, User};
pub use crate::core::store::{Filesystem, Memory, Store};
pub use crate::core::vault::{ListedSecret, RecipientEntry, Vault};
pub use crate::error::{Error, Result};
