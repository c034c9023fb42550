use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The concrete transform a codec instance performs.
///
/// The kebab-case names are what configuration files and the CLI use.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum CodecKind {
    Compression,
    Framing,
    Packed7,
    BcdPhone,
    BitReverse,
    BitInvert,
}

impl CodecKind {
    pub const ALL: [CodecKind; 6] = [
        CodecKind::Compression,
        CodecKind::Framing,
        CodecKind::Packed7,
        CodecKind::BcdPhone,
        CodecKind::BitReverse,
        CodecKind::BitInvert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CodecKind::Compression => "compression",
            CodecKind::Framing => "framing",
            CodecKind::Packed7 => "packed7",
            CodecKind::BcdPhone => "bcd-phone",
            CodecKind::BitReverse => "bit-reverse",
            CodecKind::BitInvert => "bit-invert",
        }
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodecKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CodecKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = CodecKind::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown codec kind '{}' (known: {})", s, known.join(", "))
            })
    }
}

/// An owned byte string as it appears in an initialization argument.
///
/// Serialized forms: a text string (taken as its UTF-8 bytes) or an array of
/// integers in `0..=255` for arbitrary binary content.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(from = "ByteStringRepr", into = "ByteStringRepr")]
pub struct ByteString(pub Vec<u8>);

#[derive(Deserialize, Serialize)]
#[serde(untagged)]
enum ByteStringRepr {
    Text(String),
    Raw(Vec<u8>),
}

impl From<ByteStringRepr> for ByteString {
    fn from(repr: ByteStringRepr) -> Self {
        match repr {
            ByteStringRepr::Text(text) => ByteString(text.into_bytes()),
            ByteStringRepr::Raw(raw) => ByteString(raw),
        }
    }
}

impl From<ByteString> for ByteStringRepr {
    fn from(bytes: ByteString) -> Self {
        match String::from_utf8(bytes.0) {
            Ok(text) => ByteStringRepr::Text(text),
            Err(err) => ByteStringRepr::Raw(err.into_bytes()),
        }
    }
}

impl From<&[u8]> for ByteString {
    fn from(bytes: &[u8]) -> Self {
        ByteString(bytes.to_vec())
    }
}

impl From<Vec<u8>> for ByteString {
    fn from(bytes: Vec<u8>) -> Self {
        ByteString(bytes)
    }
}

impl AsRef<[u8]> for ByteString {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// The initialization argument handed to a codec at construction.
///
/// Its shape is codec-specific and checked eagerly by `new_codec`; see each
/// codec module for what it accepts.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum CodecArg {
    Integer(i64),
    Bytes(ByteString),
    List(Vec<Option<ByteString>>),
}

impl CodecArg {
    /// Builds the `(prefix, suffix)` pair expected by the framing codec.
    pub fn framing(prefix: Option<&[u8]>, suffix: Option<&[u8]>) -> Self {
        CodecArg::List(vec![prefix.map(ByteString::from), suffix.map(ByteString::from)])
    }

    /// Short human description of the shape, used in argument errors.
    pub fn describe(&self) -> String {
        match self {
            CodecArg::Integer(value) => format!("integer {}", value),
            CodecArg::Bytes(bytes) => format!("byte string of {} bytes", bytes.0.len()),
            CodecArg::List(items) => format!("list of {} elements", items.len()),
        }
    }
}

impl From<i64> for CodecArg {
    fn from(value: i64) -> Self {
        CodecArg::Integer(value)
    }
}
