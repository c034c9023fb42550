//! Single-byte bit cross-wiring.
//!
//! Each bit `i` of the input byte lands on bit `7 - i` of the output byte, so
//! the transform is its own inverse. The unit is exactly one byte: an empty
//! value maps to an empty value, and longer values are refused rather than
//! silently truncated.

use crate::arg::{CodecArg, CodecKind};
use crate::codec::{Absorb, Codec, DecodePolicy};
use crate::error::{ArgError, CodecError};

/// Output bit position for each input bit.
const WIRING: [u8; 8] = [7, 6, 5, 4, 3, 2, 1, 0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BitInvertCodec;

impl BitInvertCodec {
    pub fn from_arg(arg: Option<&CodecArg>) -> Result<Self, ArgError> {
        match arg {
            None => Ok(BitInvertCodec),
            Some(_) => Err(ArgError::Unexpected {
                kind: CodecKind::BitInvert,
            }),
        }
    }

    fn rewire(byte: u8) -> u8 {
        WIRING
            .iter()
            .enumerate()
            .filter(|(bit, _)| byte >> bit & 1 == 1)
            .fold(0u8, |acc, (_, &target)| acc | 1 << target)
    }

    fn transform(&self, value: &[u8]) -> Result<Vec<u8>, CodecError> {
        match value {
            [] => Ok(Vec::new()),
            [byte] => Ok(vec![Self::rewire(*byte)]),
            _ => Err(CodecError::unrecognized(
                self.kind(),
                format!("expected a single byte, got {}", value.len()),
            )),
        }
    }
}

impl Codec for BitInvertCodec {
    fn kind(&self) -> CodecKind {
        CodecKind::BitInvert
    }

    fn policy(&self) -> DecodePolicy {
        DecodePolicy::Strict
    }

    fn encode(&self, value: &[u8]) -> Result<Vec<u8>, CodecError> {
        self.transform(value)
    }

    fn decode(&self, value: &[u8]) -> Result<Vec<u8>, CodecError> {
        self.transform(value)
    }
}

impl Absorb for BitInvertCodec {
    fn how_much_can_be_consumed_from(&self, blob: &[u8]) -> Result<usize, CodecError> {
        if blob.is_empty() {
            return Err(CodecError::unrecognized(self.kind(), "empty blob holds no unit"));
        }
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewires_every_bit() {
        let codec = BitInvertCodec;
        assert_eq!(codec.encode(&[0x01]).unwrap(), vec![0x80]);
        assert_eq!(codec.encode(&[0x80]).unwrap(), vec![0x01]);
        assert_eq!(codec.encode(&[0b0001_0110]).unwrap(), vec![0b0110_1000]);
        for byte in 0..=u8::MAX {
            assert_eq!(BitInvertCodec::rewire(byte), byte.reverse_bits());
        }
    }

    #[test]
    fn decode_undoes_encode_for_all_bytes() {
        let codec = BitInvertCodec;
        for byte in 0..=u8::MAX {
            let encoded = codec.encode(&[byte]).unwrap();
            assert_eq!(codec.decode(&encoded).unwrap(), vec![byte]);
        }
    }

    #[test]
    fn empty_maps_to_empty() {
        let codec = BitInvertCodec;
        assert!(codec.encode(&[]).unwrap().is_empty());
        assert!(codec.decode(&[]).unwrap().is_empty());
    }

    #[test]
    fn refuses_multi_byte_values() {
        let codec = BitInvertCodec;
        assert!(matches!(
            codec.encode(&[1, 2]),
            Err(CodecError::UnrecognizedValue { .. })
        ));
        assert!(matches!(
            codec.decode(&[1, 2, 3]),
            Err(CodecError::UnrecognizedValue { .. })
        ));
    }

    #[test]
    fn absorbs_exactly_one_byte() {
        let codec = BitInvertCodec;
        assert_eq!(codec.how_much_can_be_consumed_from(&[0xaa]).unwrap(), 1);
        assert_eq!(codec.how_much_can_be_consumed_from(&[0xaa, 0xbb, 0xcc]).unwrap(), 1);
        assert!(matches!(
            codec.how_much_can_be_consumed_from(&[]),
            Err(CodecError::UnrecognizedValue { .. })
        ));
    }
}
