//! Rekey command - reconcile the secrets file with the roster.

use std::collections::BTreeSet;

use tracing::info;

use crate::cli::{open_vault, output};
use crate::core::config::Settings;
use crate::core::roster::Roster;
use crate::error::Result;

/// Wrap the data key for exactly the roster's users.
///
/// With `rotate`, a new data key is generated and every value is re-sealed,
/// which locks out anyone who kept the old key.
pub fn execute(settings: &Settings, rotate: bool) -> Result<()> {
    let roster = Roster::load(settings.manifest_store())?;
    let keys = roster.public_keys();

    let vault = open_vault(settings)?;
    let before: BTreeSet<String> = vault.recipient_keys().into_iter().collect();

    if rotate {
        vault.rotate_key(&keys)?;
    } else {
        vault.rewrap_recipients(&keys)?;
    }
    vault.save()?;

    let after: BTreeSet<String> = vault.recipient_keys().into_iter().collect();
    let added = after.difference(&before).count();
    let dropped = before.difference(&after).count();
    info!(added, dropped, rotate, "rekeyed");

    if rotate {
        output::success(&format!(
            "rotated the data key for {} recipients",
            after.len()
        ));
    } else {
        output::success(&format!(
            "rekeyed for {} recipients ({} added, {} removed)",
            after.len(),
            added,
            dropped
        ));
        if dropped > 0 {
            output::warn("removed recipients may still hold the old data key");
            output::hint(&format!(
                "run {} to revoke it",
                output::key("envseal rekey --rotate")
            ));
        }
    }

    Ok(())
}
