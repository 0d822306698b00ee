//! Process-level configuration.
//!
//! Built once at startup (usually from TOML) and passed by reference to the
//! connection. Nothing in this crate reads configuration from globals.
use crate::{
    db::predicate::Lookup,
    error::{Error, ErrorOrigin},
};
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("representation '{repr}' is not valid for {kind} fields")]
    InvalidRepresentation { kind: &'static str, repr: Repr },

    #[error("unknown lookup type '{lookup}' indexed on {entity}.{field}")]
    UnknownIndexLookup {
        entity: String,
        field: String,
        lookup: String,
    },

    #[error("lookup type '{lookup}' can't be indexed ({entity}.{field}); only 'iexact' is supported")]
    UnsupportedIndexLookup {
        entity: String,
        field: String,
        lookup: String,
    },
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::validation(ErrorOrigin::Config, err.to_string())
    }
}

///
/// ToolboxConfig
///

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolboxConfig {
    /// Log every built query at debug level.
    pub debug: bool,
    pub storage: StorageConfig,
    /// Field-index registry: entity name -> field name -> lookup types.
    pub indexes: BTreeMap<String, BTreeMap<String, IndexLookups>>,
}

impl ToolboxConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.storage.validate()?;
        self.index_entries().map(|_| ())
    }

    /// Flattened, validated index registrations.
    pub(crate) fn index_entries(&self) -> Result<Vec<(String, String, Lookup)>, ConfigError> {
        let mut out = Vec::new();

        for (entity, fields) in &self.indexes {
            for (field, lookups) in fields {
                for name in lookups.names() {
                    let lookup = Lookup::from_name(name).ok_or_else(|| {
                        ConfigError::UnknownIndexLookup {
                            entity: entity.clone(),
                            field: field.clone(),
                            lookup: name.to_string(),
                        }
                    })?;
                    if lookup != Lookup::IExact {
                        return Err(ConfigError::UnsupportedIndexLookup {
                            entity: entity.clone(),
                            field: field.clone(),
                            lookup: name.to_string(),
                        });
                    }
                    out.push((entity.clone(), field.clone(), lookup));
                }
            }
        }

        Ok(out)
    }
}

///
/// IndexLookups
///
/// One lookup name or a list of them.
///

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum IndexLookups {
    One(String),
    Many(Vec<String>),
}

impl IndexLookups {
    fn names(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Self::One(name) => std::slice::from_ref(name),
            Self::Many(names) => names,
        };
        slice.iter().map(String::as_str)
    }
}

///
/// StorageConfig
///
/// Storage representation ("db type") per composite kind.
///

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub list: Repr,
    pub set: Repr,
    pub dict: Repr,
    pub embedded: Repr,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            list: Repr::List,
            set: Repr::Set,
            dict: Repr::Dict,
            embedded: Repr::Dict,
        }
    }
}

impl StorageConfig {
    /// Everything serialized into CBOR blobs.
    #[must_use]
    pub const fn binary() -> Self {
        Self {
            list: Repr::Bytes,
            set: Repr::Bytes,
            dict: Repr::Bytes,
            embedded: Repr::Bytes,
        }
    }

    /// Everything serialized into JSON strings.
    #[must_use]
    pub const fn textual() -> Self {
        Self {
            list: Repr::String,
            set: Repr::String,
            dict: Repr::String,
            embedded: Repr::String,
        }
    }

    /// Mappings flattened into interleaved lists, sets stored as lists.
    #[must_use]
    pub const fn flat() -> Self {
        Self {
            list: Repr::List,
            set: Repr::List,
            dict: Repr::List,
            embedded: Repr::List,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_repr("list", self.list, &[Repr::List, Repr::Bytes, Repr::String])?;
        check_repr(
            "set",
            self.set,
            &[Repr::Set, Repr::List, Repr::Bytes, Repr::String],
        )?;
        check_repr(
            "dict",
            self.dict,
            &[Repr::Dict, Repr::List, Repr::Bytes, Repr::String],
        )?;
        check_repr(
            "embedded",
            self.embedded,
            &[Repr::Dict, Repr::List, Repr::Bytes, Repr::String],
        )
    }
}

fn check_repr(kind: &'static str, repr: Repr, allowed: &[Repr]) -> Result<(), ConfigError> {
    if allowed.contains(&repr) {
        Ok(())
    } else {
        Err(ConfigError::InvalidRepresentation { kind, repr })
    }
}

///
/// Repr
///

#[derive(Clone, Copy, Debug, Deserialize, derive_more::Display, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Repr {
    #[display("list")]
    List,
    #[display("set")]
    Set,
    #[display("dict")]
    Dict,
    #[display("bytes")]
    Bytes,
    #[display("string")]
    String,
}

impl Repr {
    /// True when the value is packed into one opaque blob.
    #[must_use]
    pub const fn is_serialized(self) -> bool {
        matches!(self, Self::Bytes | Self::String)
    }
}

///
/// TESTS
///
