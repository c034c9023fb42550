use crate::codec::{AnyCodec, Codec, new_codec};
use crate::config::WeftConfig;
use crate::error::ArgError;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Codec name '{0}' is registered more than once")]
    DuplicateName(String),

    #[error("Codec '{name}' has an invalid initialization argument: {source}")]
    InvalidArgument {
        name: String,
        #[source]
        source: ArgError,
    },

    #[error("No codec named '{0}' in registry")]
    UnknownName(String),
}

/// Named codec prototypes, typically built from a [`WeftConfig`].
///
/// Data-model nodes should take their own instance through
/// [`CodecRegistry::instantiate`] rather than sharing the registry's copy.
#[derive(Debug, Clone, Default)]
pub struct CodecRegistry {
    codecs: BTreeMap<String, AnyCodec>,
}

impl CodecRegistry {
    pub fn new() -> Self {
        Self {
            codecs: BTreeMap::new(),
        }
    }

    /// Builds every entry of `config`. The first invalid entry aborts the build.
    pub fn from_config(config: &WeftConfig) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for entry in &config.codecs {
            let codec = new_codec(entry.kind, entry.arg.as_ref()).map_err(|source| {
                RegistryError::InvalidArgument {
                    name: entry.name.clone(),
                    source,
                }
            })?;
            registry.insert(entry.name.clone(), codec)?;
        }
        log::debug!("codec registry built with {} entries", registry.len());
        Ok(registry)
    }

    pub fn insert(&mut self, name: impl Into<String>, codec: AnyCodec) -> Result<(), RegistryError> {
        let name = name.into();
        if self.codecs.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }
        self.codecs.insert(name, codec);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&AnyCodec> {
        self.codecs.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut AnyCodec> {
        self.codecs.get_mut(name)
    }

    /// Returns an independent clone of the named codec.
    pub fn instantiate(&self, name: &str) -> Result<AnyCodec, RegistryError> {
        self.get(name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownName(name.to_string()))
    }

    /// Names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.codecs.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnyCodec)> {
        self.codecs.iter().map(|(name, codec)| (name.as_str(), codec))
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    pub fn reset_all(&mut self) {
        for codec in self.codecs.values_mut() {
            codec.reset();
        }
    }
}
