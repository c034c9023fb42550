//! Constant prefix/suffix wrapping.
//!
//! Lets a data model wrap a node in fixed transport delimiters without
//! describing them as separate nodes. Decoding is lenient: a value that is too
//! short or whose ends do not match the configured framing decodes to empty.
//!
//! The format is not self-delimiting (a value may contain the suffix), so this
//! codec offers no absorption.

use crate::arg::{ByteString, CodecArg, CodecKind};
use crate::codec::{Codec, DecodePolicy};
use crate::error::{ArgError, CodecError};

/// The `(prefix, suffix)` pair exactly as supplied at construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct FramingArg {
    prefix: Option<Vec<u8>>,
    suffix: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct FramingParams {
    prefix: Vec<u8>,
    suffix: Vec<u8>,
}

impl FramingParams {
    fn derive(arg: &FramingArg) -> Self {
        Self {
            prefix: arg.prefix.clone().unwrap_or_default(),
            suffix: arg.suffix.clone().unwrap_or_default(),
        }
    }

    fn overhead(&self) -> usize {
        self.prefix.len() + self.suffix.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FramingCodec {
    arg: FramingArg,
    params: FramingParams,
}

impl FramingCodec {
    pub fn new(prefix: Option<&[u8]>, suffix: Option<&[u8]>) -> Self {
        let arg = FramingArg {
            prefix: prefix.map(<[u8]>::to_vec),
            suffix: suffix.map(<[u8]>::to_vec),
        };
        let params = FramingParams::derive(&arg);
        Self { arg, params }
    }

    /// Accepts exactly a two element list; each element is absent or a byte string.
    pub fn from_arg(arg: Option<&CodecArg>) -> Result<Self, ArgError> {
        let shape_error = |found: String| ArgError::Shape {
            kind: CodecKind::Framing,
            expected: "a [prefix, suffix] pair",
            found,
        };
        match arg {
            Some(CodecArg::List(items)) if items.len() == 2 => Ok(Self::new(
                items[0].as_ref().map(ByteString::as_ref),
                items[1].as_ref().map(ByteString::as_ref),
            )),
            Some(other) => Err(shape_error(other.describe())),
            None => Err(shape_error("no argument".to_string())),
        }
    }

    pub fn prefix(&self) -> &[u8] {
        &self.params.prefix
    }

    pub fn suffix(&self) -> &[u8] {
        &self.params.suffix
    }

    pub(crate) fn arg(&self) -> CodecArg {
        CodecArg::framing(self.arg.prefix.as_deref(), self.arg.suffix.as_deref())
    }

    fn unwrap_frame<'a>(&self, value: &'a [u8]) -> Option<&'a [u8]> {
        if value.len() < self.params.overhead() {
            return None;
        }
        value
            .strip_prefix(self.params.prefix.as_slice())?
            .strip_suffix(self.params.suffix.as_slice())
    }
}

impl Codec for FramingCodec {
    fn kind(&self) -> CodecKind {
        CodecKind::Framing
    }

    fn policy(&self) -> DecodePolicy {
        DecodePolicy::Lenient
    }

    fn reset(&mut self) {
        self.params = FramingParams::derive(&self.arg);
    }

    fn encode(&self, value: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut framed = Vec::with_capacity(value.len() + self.params.overhead());
        framed.extend_from_slice(&self.params.prefix);
        framed.extend_from_slice(value);
        framed.extend_from_slice(&self.params.suffix);
        Ok(framed)
    }

    fn decode(&self, value: &[u8]) -> Result<Vec<u8>, CodecError> {
        match self.unwrap_frame(value) {
            Some(inner) => Ok(inner.to_vec()),
            None => {
                log::debug!(
                    "framing codec: {} byte value does not carry the configured framing",
                    value.len()
                );
                Ok(Vec::new())
            }
        }
    }
}
