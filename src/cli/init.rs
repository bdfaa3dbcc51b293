//! Init command - bootstrap identity, roster and secrets file.
//!
//! Each step is skipped with a warning when its file already exists, so
//! running `init` in a cloned repository only creates the missing identity.

use std::path::Path;

use tracing::info;

use crate::cli::output;
use crate::core::config::Settings;
use crate::core::identity::Identity;
use crate::core::roster::Roster;
use crate::core::validation;
use crate::core::vault::Vault;
use crate::error::Result;

/// Alias used when the OS user name is not a valid alias.
const FALLBACK_USER: &str = "admin";

/// Example secret written into a fresh vault.
const EXAMPLE_KEY: &str = "HELLO";
const EXAMPLE_VALUE: &str = "world";

/// Initialize envseal in the current directory.
pub fn execute(settings: &Settings, name: Option<String>) -> Result<()> {
    let identity = ensure_identity(&settings.identity_path()?)?;

    if settings.manifest_path.exists() {
        output::warn(&format!(
            "{} already exists, leaving it alone",
            output::path(settings.manifest_path.display())
        ));
    } else {
        let project = name.unwrap_or_else(|| project_name(settings));
        let user = default_user();
        info!(project = %project, user = %user, "creating roster");

        let roster = Roster::new(settings.manifest_store(), &project);
        roster.add_user(&user, &identity.public_key())?;
        roster.save()?;
        output::success(&format!(
            "created {} with {} as the first user",
            output::path(settings.manifest_path.display()),
            user
        ));
    }

    if settings.secrets_path.exists() {
        output::warn(&format!(
            "{} already exists, leaving it alone",
            output::path(settings.secrets_path.display())
        ));
    } else {
        let vault = Vault::initialize(settings.secrets_store(), &[identity.public_key()])?;
        vault.set_secret(EXAMPLE_KEY, EXAMPLE_VALUE)?;
        vault.save()?;
        output::success(&format!(
            "created {}",
            output::path(settings.secrets_path.display())
        ));
        output::hint(&format!("try: {}", output::key("envseal get HELLO")));
    }

    Ok(())
}

fn ensure_identity(path: &Path) -> Result<Identity> {
    if path.exists() {
        let identity = Identity::load(path)?;
        output::warn(&format!(
            "identity {} already exists, reusing it",
            output::path(path.display())
        ));
        return Ok(identity);
    }

    let identity = Identity::create(path)?;
    output::success(&format!("generated identity {}", output::path(path.display())));
    Ok(identity)
}

fn default_user() -> String {
    let user = whoami::username();
    if validation::is_valid_alias(&user) {
        user
    } else {
        FALLBACK_USER.to_string()
    }
}

/// Name of the directory holding the secrets file.
fn project_name(settings: &Settings) -> String {
    std::path::absolute(&settings.secrets_path)
        .ok()
        .as_deref()
        .and_then(Path::parent)
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "envseal".to_string())
}
