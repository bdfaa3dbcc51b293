//! Roster commands (users add, remove, list).
//!
//! These only edit `envseal.toml`. Nothing changes in the secrets file until
//! `envseal rekey` is run.

use tracing::info;

use crate::cli::output;
use crate::core::config::Settings;
use crate::core::roster::Roster;
use crate::error::Result;

/// Add a user to the roster.
pub fn add(settings: &Settings, name: &str, public_key: &str) -> Result<()> {
    let roster = Roster::load(settings.manifest_store())?;
    roster.add_user(name, public_key)?;
    roster.save()?;

    info!(user = %name.trim(), "user added to roster");
    output::success(&format!("added {}", name.trim()));
    output::hint(&format!(
        "run {} to give them access to the secrets",
        output::key("envseal rekey")
    ));
    Ok(())
}

/// Remove a user by alias or public key.
pub fn remove(settings: &Settings, identifier: &str) -> Result<()> {
    let roster = Roster::load(settings.manifest_store())?;
    roster.remove_user_strict(identifier)?;
    roster.save()?;

    output::success(&format!("removed {}", identifier.trim()));
    output::warn("they can still read every secret they could read before");
    output::hint(&format!(
        "run {} to revoke their access",
        output::key("envseal rekey --rotate")
    ));
    Ok(())
}

/// List users.
pub fn list(settings: &Settings, json: bool) -> Result<()> {
    let roster = Roster::load(settings.manifest_store())?;
    let users = roster.users();

    if json {
        let output = serde_json::json!({
            "project_name": roster.project_name(),
            "users": users,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if users.is_empty() {
        output::dimmed("no users");
    } else {
        output::header(&format!("{} users", users.len()));
        for user in &users {
            output::kv(&user.name, &user.public_key);
        }
    }

    Ok(())
}
