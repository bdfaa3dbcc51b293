//! Secret commands (set, get, unset, print).

use std::collections::BTreeMap;

use tracing::info;

use crate::cli::{open_vault, output};
use crate::core::config::Settings;
use crate::error::{Error, Result, ValidationError, VaultError};

/// Set one or more `KEY=VALUE` pairs, saving once.
pub fn set(settings: &Settings, pairs: &[String]) -> Result<()> {
    let parsed = pairs
        .iter()
        .map(|pair| parse_assignment(pair))
        .collect::<Result<Vec<_>>>()?;

    let vault = open_vault(settings)?;
    for (key, value) in &parsed {
        vault.set_secret(key, value)?;
    }
    vault.save()?;

    for (key, _) in &parsed {
        output::success(&format!("set {}", output::key(key.trim())));
    }
    info!(count = parsed.len(), "secrets set");
    Ok(())
}

/// Print a single secret value.
pub fn get(settings: &Settings, key: &str) -> Result<()> {
    let vault = open_vault(settings)?;
    let value = vault.get_secret(key)?;
    output::data(value.as_str());
    Ok(())
}

/// Remove secrets. Missing names are reported and skipped.
pub fn unset(settings: &Settings, keys: &[String]) -> Result<()> {
    let vault = open_vault(settings)?;

    let mut removed = Vec::new();
    for key in keys {
        match vault.unset_secret(key) {
            Ok(()) => removed.push(key.trim()),
            Err(Error::Vault(VaultError::KeyNotFound(name))) => {
                output::warn(&format!("{} not found", output::key(&name)));
            }
            Err(e) => return Err(e),
        }
    }

    if removed.is_empty() {
        return Ok(());
    }
    vault.save()?;
    for key in removed {
        output::success(&format!("removed {}", output::key(key)));
    }
    Ok(())
}

/// Print every secret as `KEY=VALUE`, or as JSON.
///
/// Values that could not be unsealed are reported separately and never
/// printed as if they were plaintext.
pub fn print(settings: &Settings, json: bool) -> Result<()> {
    let vault = open_vault(settings)?;
    let all = vault.get_all_secrets()?;

    let (readable, unsealable): (BTreeMap<_, _>, BTreeMap<_, _>) =
        all.iter().partition(|(_, v)| !v.is_unsealable());

    if json {
        let secrets: BTreeMap<_, _> = readable.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let raw: BTreeMap<_, _> = unsealable.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let output = serde_json::json!({
            "secrets": secrets,
            "unsealable": raw,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for (key, value) in &readable {
            output::data(&format!("{}={}", key, value.as_str()));
        }
    }

    for key in unsealable.keys() {
        output::warn(&format!("{} could not be unsealed", output::key(key)));
    }
    Ok(())
}

fn parse_assignment(pair: &str) -> Result<(String, String)> {
    match pair.split_once('=') {
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(ValidationError::InvalidKey {
            key: pair.to_string(),
            reason: "expected KEY=VALUE".to_string(),
        }
        .into()),
    }
}
