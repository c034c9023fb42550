//! Whole-value bit reversal: byte order is reversed and so is the bit order
//! inside each byte. Applying the transform twice restores the input, so
//! `decode` is the same operation as `encode`.

use crate::arg::{CodecArg, CodecKind};
use crate::codec::{Codec, DecodePolicy};
use crate::error::{ArgError, CodecError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BitReverseCodec;

impl BitReverseCodec {
    pub fn from_arg(arg: Option<&CodecArg>) -> Result<Self, ArgError> {
        match arg {
            None => Ok(BitReverseCodec),
            Some(_) => Err(ArgError::Unexpected {
                kind: CodecKind::BitReverse,
            }),
        }
    }

    fn reverse(value: &[u8]) -> Vec<u8> {
        value.iter().rev().map(|byte| byte.reverse_bits()).collect()
    }
}

impl Codec for BitReverseCodec {
    fn kind(&self) -> CodecKind {
        CodecKind::BitReverse
    }

    fn policy(&self) -> DecodePolicy {
        DecodePolicy::Strict
    }

    fn encode(&self, value: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(Self::reverse(value))
    }

    fn decode(&self, value: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(Self::reverse(value))
    }
}
