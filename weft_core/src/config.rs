use crate::arg::{CodecArg, CodecKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One named codec instance as declared in a configuration file:
///
/// ```toml
/// [[codec]]
/// name = "sms-frame"
/// kind = "framing"
/// arg = ["<<", ">>"]
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct CodecEntry {
    pub name: String,
    pub kind: CodecKind,
    #[serde(default)]
    pub arg: Option<CodecArg>,
}

impl CodecEntry {
    pub fn new(name: impl Into<String>, kind: CodecKind, arg: Option<CodecArg>) -> Self {
        Self {
            name: name.into(),
            kind,
            arg,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct WeftConfig {
    #[serde(default, rename = "codec")]
    pub codecs: Vec<CodecEntry>,
}

impl WeftConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file at {:?}: {}", path, e))?;

        Self::from_toml_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse TOML from config file {:?}: {}", path, e)
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

impl Default for WeftConfig {
    /// One instance of every kind, named after the kind, with default
    /// arguments. Framing gets an empty prefix and suffix.
    fn default() -> Self {
        let codecs = CodecKind::ALL
            .iter()
            .map(|kind| {
                let arg = match kind {
                    CodecKind::Framing => Some(CodecArg::framing(None, None)),
                    _ => None,
                };
                CodecEntry::new(kind.as_str(), *kind, arg)
            })
            .collect();
        Self { codecs }
    }
}
