//! envseal - envelope-encrypted secrets that live in your repository.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use envseal::cli::output;
use envseal::cli::{execute, Cli};
use envseal::error::{Error, StoreError, VaultError};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("ENVSEAL_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("envseal=debug")
        } else {
            EnvFilter::new("envseal=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(cli) {
        output::error(&e.to_string());
        if let Some(hint) = hint_for(&e) {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}

fn hint_for(e: &Error) -> Option<&'static str> {
    match e {
        Error::Store(StoreError::NoPrivateKey(_)) => Some("run: envseal init"),
        Error::Store(StoreError::NoHomeDir) => Some("pass the key file with --identity"),
        Error::Vault(VaultError::AccessDenied) => {
            Some("send `envseal whoami` to a teammate and ask them to run: envseal rekey")
        }
        Error::Vault(VaultError::MissingMetadata) => {
            Some("the secrets file has no _envseal block; was it created by envseal init?")
        }
        Error::Vault(VaultError::EmptyRecipients) => Some("add someone first: envseal users add"),
        _ => None,
    }
}
