//! Whoami command - print your public key.

use crate::cli::output;
use crate::core::config::Settings;
use crate::core::identity::Identity;
use crate::error::Result;

/// Print your public key.
pub fn execute(settings: &Settings) -> Result<()> {
    let identity = Identity::load(&settings.identity_path()?)?;
    output::data(&identity.public_key());
    Ok(())
}
