//! 7-bit character packing (GSM 03.38 default alphabet layout).
//!
//! Every input byte carries one 7-bit character. Characters are laid out
//! back to back, least significant bit first, so 8 characters fill 7 bytes.
//! Spare bits in the final byte are zero.
//!
//! The packed form does not record the character count. When `n % 8 == 7` the
//! seven spare bits look exactly like one more `0x00` character, and `decode`
//! reports it as such.

use crate::arg::{CodecArg, CodecKind};
use crate::codec::{Codec, DecodePolicy};
use crate::error::{ArgError, CodecError};

const SEPTET_MASK: u16 = 0x7f;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Packed7Codec;

impl Packed7Codec {
    pub fn from_arg(arg: Option<&CodecArg>) -> Result<Self, ArgError> {
        match arg {
            None => Ok(Packed7Codec),
            Some(_) => Err(ArgError::Unexpected {
                kind: CodecKind::Packed7,
            }),
        }
    }
}

/// Number of bytes needed to pack `septets` characters.
pub fn packed_len(septets: usize) -> usize {
    (septets * 7).div_ceil(8)
}

impl Codec for Packed7Codec {
    fn kind(&self) -> CodecKind {
        CodecKind::Packed7
    }

    fn policy(&self) -> DecodePolicy {
        DecodePolicy::Strict
    }

    fn encode(&self, value: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut packed = Vec::with_capacity(packed_len(value.len()));
        let mut acc: u16 = 0;
        let mut bits = 0u32;

        for (offset, &septet) in value.iter().enumerate() {
            if u16::from(septet) > SEPTET_MASK {
                return Err(CodecError::unrecognized(
                    self.kind(),
                    format!("byte 0x{:02x} at offset {} does not fit in 7 bits", septet, offset),
                ));
            }
            acc |= u16::from(septet) << bits;
            bits += 7;
            while bits >= 8 {
                packed.push(acc as u8);
                acc >>= 8;
                bits -= 8;
            }
        }
        if bits > 0 {
            packed.push(acc as u8);
        }

        Ok(packed)
    }

    fn decode(&self, value: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut septets = Vec::with_capacity(value.len() * 8 / 7);
        let mut acc: u16 = 0;
        let mut bits = 0u32;

        for &byte in value {
            acc |= u16::from(byte) << bits;
            bits += 8;
            while bits >= 7 {
                septets.push((acc & SEPTET_MASK) as u8);
                acc >>= 7;
                bits -= 7;
            }
        }

        // leftover bits are padding and the encoder always zeroes them
        if acc != 0 {
            return Err(CodecError::unrecognized(
                self.kind(),
                format!("{} trailing padding bits are not zero", bits),
            ));
        }

        Ok(septets)
    }
}
