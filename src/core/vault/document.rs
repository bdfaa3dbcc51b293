//! Vault document format.
//!
//! A vault document is a TOML table with two reserved keys, `_envseal`
//! (recipient metadata) and `secrets` (the canonical map). Anything else at
//! the top level is a legacy entry. The document is normalized once, at load
//! time, into typed values; nothing downstream inspects raw TOML.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;
use zeroize::Zeroizing;

use crate::core::constants::{METADATA_KEY, SECRETS_KEY};
use crate::core::seal::{self, Dek, SealedValue};
use crate::core::types::{PublicKey, SecretKey, WrappedKey};
use crate::error::{Result, StoreError, VaultError};

/// One recipient of the wrapped DEK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientEntry {
    /// Recipient public key.
    #[serde(rename = "arg")]
    pub identifier: PublicKey,
    /// DEK encrypted to `identifier`, armored.
    #[serde(rename = "enc")]
    pub wrapped_key: WrappedKey,
}

/// Contents of the `_envseal` block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct Metadata {
    #[serde(default)]
    pub recipients: Vec<RecipientEntry>,
}

/// The `_envseal` block as found on disk.
#[derive(Debug, Clone)]
pub(super) enum MetadataBlock {
    Parsed(Metadata),
    /// Present but not shaped like metadata. Kept verbatim so a save does not
    /// destroy it; nobody can unlock through it.
    Unreadable(toml::Value),
}

/// A stored value, classified once at load time.
#[derive(Debug, Clone)]
pub(super) enum Stored {
    Sealed(SealedValue),
    /// Unmarked string: legacy plaintext.
    Plain(String),
    /// Non-string value.
    Other(toml::Value),
}

impl Stored {
    pub fn from_value(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => match SealedValue::parse(&s) {
                Some(sealed) => Self::Sealed(sealed),
                None => Self::Plain(s),
            },
            other => Self::Other(other),
        }
    }

    pub fn to_value(&self) -> toml::Value {
        match self {
            Self::Sealed(sealed) => toml::Value::String(sealed.to_string()),
            Self::Plain(s) => toml::Value::String(s.clone()),
            Self::Other(v) => v.clone(),
        }
    }

    /// The value exactly as it is stored, as text.
    pub fn raw_text(&self) -> String {
        match self {
            Self::Sealed(sealed) => sealed.to_string(),
            Self::Plain(s) => s.clone(),
            Self::Other(v) => v.to_string(),
        }
    }

    /// Plaintext of this value: unseal if sealed, pass legacy text through.
    pub fn reveal(&self, key: &str, dek: &Dek) -> Result<Zeroizing<String>> {
        match self {
            Self::Sealed(sealed) => seal::unseal_str(sealed, dek),
            Self::Plain(s) => Ok(Zeroizing::new(s.clone())),
            Self::Other(_) => Err(VaultError::InvalidFormat {
                key: key.to_string(),
                reason: "value is not a string".to_string(),
            }
            .into()),
        }
    }
}

/// Normalized vault document.
#[derive(Debug, Clone, Default)]
pub(super) struct Document {
    pub metadata: Option<MetadataBlock>,
    pub secrets: BTreeMap<SecretKey, Stored>,
    pub legacy: BTreeMap<String, Stored>,
}

impl Document {
    /// Parse and normalize a document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Parse` for invalid TOML and
    /// `VaultError::InvalidFormat` if `secrets` is not a table.
    pub fn parse(text: &str, location: &str) -> Result<Self> {
        let mut table: toml::Table = toml::from_str(text).map_err(|source| StoreError::Parse {
            path: location.to_string(),
            source,
        })?;

        let metadata = table.remove(METADATA_KEY).map(|value| {
            match value.clone().try_into::<Metadata>() {
                Ok(metadata) => MetadataBlock::Parsed(metadata),
                Err(e) => {
                    warn!(path = location, error = %e, "unreadable metadata block");
                    MetadataBlock::Unreadable(value)
                }
            }
        });

        let secrets = match table.remove(SECRETS_KEY) {
            None => BTreeMap::new(),
            Some(toml::Value::Table(entries)) => entries
                .into_iter()
                .map(|(k, v)| (k, Stored::from_value(v)))
                .collect(),
            Some(_) => {
                return Err(VaultError::InvalidFormat {
                    key: SECRETS_KEY.to_string(),
                    reason: "expected a table".to_string(),
                }
                .into())
            }
        };

        let legacy = table
            .into_iter()
            .map(|(k, v)| (k, Stored::from_value(v)))
            .collect();

        Ok(Self {
            metadata,
            secrets,
            legacy,
        })
    }

    /// Serialize back to TOML.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialize` if TOML serialization fails.
    pub fn render(&self) -> Result<String> {
        let mut table = toml::Table::new();

        for (key, value) in &self.legacy {
            table.insert(key.clone(), value.to_value());
        }

        let secrets = self
            .secrets
            .iter()
            .map(|(k, v)| (k.clone(), v.to_value()))
            .collect::<toml::Table>();
        table.insert(SECRETS_KEY.to_string(), toml::Value::Table(secrets));

        match &self.metadata {
            Some(MetadataBlock::Parsed(metadata)) => {
                let value = toml::Value::try_from(metadata).map_err(StoreError::Serialize)?;
                table.insert(METADATA_KEY.to_string(), value);
            }
            Some(MetadataBlock::Unreadable(value)) => {
                table.insert(METADATA_KEY.to_string(), value.clone());
            }
            None => {}
        }

        Ok(toml::to_string_pretty(&table).map_err(StoreError::Serialize)?)
    }

    /// Recipient entries, if the metadata block is readable.
    pub fn recipients(&self) -> &[RecipientEntry] {
        match &self.metadata {
            Some(MetadataBlock::Parsed(metadata)) => &metadata.recipients,
            _ => &[],
        }
    }
}
