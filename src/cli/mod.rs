//! Command-line interface.

pub mod init;
pub mod output;
pub mod rekey;
pub mod secrets;
pub mod users;
pub mod whoami;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::config::{ListPolicy, Settings};
use crate::core::identity::Identity;
use crate::core::store::Filesystem;
use crate::core::vault::Vault;
use crate::error::Result;

/// envseal - envelope-encrypted secrets that live in your repository.
#[derive(Parser)]
#[command(
    name = "envseal",
    about = "Envelope-encrypted secrets that live in your repository",
    version
)]
pub struct Cli {
    /// Secrets file
    #[arg(short = 'f', long = "file", global = true, env = "ENVSEAL_FILE")]
    pub file: Option<PathBuf>,

    /// Private key file
    #[arg(short, long, global = true, env = "ENVSEAL_IDENTITY")]
    pub identity: Option<PathBuf>,

    /// Roster file
    #[arg(long, global = true, env = "ENVSEAL_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Create an identity, a roster and a secrets file
    Init {
        /// Project name (defaults to the directory name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Print your public key
    Whoami,

    /// Set one or more secrets
    Set {
        /// Assignments such as DATABASE_URL=postgres://...
        #[arg(required = true, value_name = "KEY=VALUE")]
        pairs: Vec<String>,
    },

    /// Print a secret value
    Get {
        /// Secret name
        key: String,
    },

    /// Remove one or more secrets
    Unset {
        /// Secret names
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Print every secret as KEY=VALUE
    Print {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Fail on the first value that cannot be unsealed
        #[arg(long)]
        strict: bool,
    },

    /// Manage the access roster
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    /// Re-encrypt the data key for everyone on the roster
    Rekey {
        /// Also replace the data key and re-seal every value
        #[arg(long)]
        rotate: bool,
    },
}

/// Roster subcommands.
#[derive(Subcommand)]
pub enum UsersAction {
    /// Add a user by their public key
    Add {
        /// User alias
        name: String,
        /// age public key
        public_key: String,
    },

    /// Remove a user by alias or public key
    Remove {
        /// Alias or public key
        identifier: String,
    },

    /// List users
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Execute a command.
pub fn execute(cli: Cli) -> Result<()> {
    use Command::*;

    let cwd = std::env::current_dir()?;
    let mut settings =
        Settings::for_project(&cwd).with_overrides(cli.file, cli.manifest, cli.identity);

    match cli.command {
        Init { name } => init::execute(&settings, name),
        Whoami => whoami::execute(&settings),
        Set { pairs } => secrets::set(&settings, &pairs),
        Get { key } => secrets::get(&settings, &key),
        Unset { keys } => secrets::unset(&settings, &keys),
        Print { json, strict } => {
            if strict {
                settings.listing = ListPolicy::FailFast;
            }
            secrets::print(&settings, json)
        }
        Users { action } => match action {
            UsersAction::Add { name, public_key } => users::add(&settings, &name, &public_key),
            UsersAction::Remove { identifier } => users::remove(&settings, &identifier),
            UsersAction::List { json } => users::list(&settings, json),
        },
        Rekey { rotate } => rekey::execute(&settings, rotate),
    }
}

/// Load the secrets file and unlock it with the configured identity.
pub(crate) fn open_vault(settings: &Settings) -> Result<Vault<Filesystem>> {
    let identity = Identity::load(&settings.identity_path()?)?;
    let vault = Vault::load(settings.secrets_store())?.with_listing_policy(settings.listing);
    vault.unlock(&identity)?;
    Ok(vault)
}
