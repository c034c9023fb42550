//! Semi-octet (swapped BCD) telephone number encoding.
//!
//! The encoded form starts with one zone octet (the type-of-address byte of
//! GSM address fields), followed by the digits two per byte with the first
//! digit in the low nibble. An odd digit count leaves the last high nibble
//! filled with `0xF`.
//!
//! `+33 612 345 678` with the default zone encodes as `91 33 16 32 54 76 F8`.

use crate::arg::{CodecArg, CodecKind};
use crate::codec::{Codec, DecodePolicy};
use crate::error::{ArgError, CodecError};

/// International number, ISDN numbering plan.
pub const DEFAULT_ZONE: u8 = 0x91;

const FILLER: u8 = 0x0f;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BcdPhoneCodec {
    zone_arg: Option<u8>,
    zone: u8,
}

impl BcdPhoneCodec {
    pub fn new(zone: Option<u8>) -> Self {
        Self {
            zone_arg: zone,
            zone: zone.unwrap_or(DEFAULT_ZONE),
        }
    }

    /// Accepts no argument or an integer zone octet in `0..=255`.
    pub fn from_arg(arg: Option<&CodecArg>) -> Result<Self, ArgError> {
        match arg {
            None => Ok(Self::new(None)),
            Some(CodecArg::Integer(value)) => u8::try_from(*value)
                .map(|zone| Self::new(Some(zone)))
                .map_err(|_| ArgError::OutOfRange {
                    kind: CodecKind::BcdPhone,
                    value: *value,
                    min: 0,
                    max: i64::from(u8::MAX),
                }),
            Some(other) => Err(ArgError::Shape {
                kind: CodecKind::BcdPhone,
                expected: "an integer zone octet",
                found: other.describe(),
            }),
        }
    }

    pub fn zone(&self) -> u8 {
        self.zone
    }

    pub(crate) fn arg(&self) -> Option<CodecArg> {
        self.zone_arg.map(|zone| CodecArg::Integer(i64::from(zone)))
    }

    /// Splits an encoded number into its zone octet and ASCII digits.
    ///
    /// Unlike `decode`, the zone is returned rather than discarded, which is
    /// what a caller reverse-modeling a captured address field usually wants.
    pub fn decode_parts(&self, value: &[u8]) -> Result<(u8, Vec<u8>), CodecError> {
        let (&zone, packed) = value
            .split_first()
            .ok_or_else(|| CodecError::unrecognized(self.kind(), "missing zone octet"))?;

        let mut digits = Vec::with_capacity(packed.len() * 2);
        for (idx, &byte) in packed.iter().enumerate() {
            let low = byte & 0x0f;
            let high = byte >> 4;
            let last = idx + 1 == packed.len();

            digits.push(self.digit_char(low, idx)?);
            match high {
                FILLER if last => {}
                _ => digits.push(self.digit_char(high, idx)?),
            }
        }

        Ok((zone, digits))
    }

    fn digit_char(&self, nibble: u8, idx: usize) -> Result<u8, CodecError> {
        if nibble <= 9 {
            Ok(b'0' + nibble)
        } else {
            Err(CodecError::unrecognized(
                self.kind(),
                format!("nibble 0x{:x} in digit octet {} is not a decimal digit", nibble, idx),
            ))
        }
    }

    fn digit_nibble(&self, digit: u8, offset: usize) -> Result<u8, CodecError> {
        if digit.is_ascii_digit() {
            Ok(digit - b'0')
        } else {
            Err(CodecError::unrecognized(
                self.kind(),
                format!("byte 0x{:02x} at offset {} is not a decimal digit", digit, offset),
            ))
        }
    }
}

impl Default for BcdPhoneCodec {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Codec for BcdPhoneCodec {
    fn kind(&self) -> CodecKind {
        CodecKind::BcdPhone
    }

    fn policy(&self) -> DecodePolicy {
        DecodePolicy::Strict
    }

    fn reset(&mut self) {
        self.zone = self.zone_arg.unwrap_or(DEFAULT_ZONE);
    }

    fn encode(&self, value: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut encoded = Vec::with_capacity(1 + value.len().div_ceil(2));
        encoded.push(self.zone);

        for (pair_idx, pair) in value.chunks(2).enumerate() {
            let low = self.digit_nibble(pair[0], pair_idx * 2)?;
            let high = match pair.get(1) {
                Some(&digit) => self.digit_nibble(digit, pair_idx * 2 + 1)?,
                None => FILLER,
            };
            encoded.push((high << 4) | low);
        }

        Ok(encoded)
    }

    fn decode(&self, value: &[u8]) -> Result<Vec<u8>, CodecError> {
        self.decode_parts(value).map(|(_zone, digits)| digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_digit_count_is_padded_and_stripped() {
        let codec = BcdPhoneCodec::default();
        let encoded = codec.encode(b"123").unwrap();
        assert_eq!(encoded, vec![DEFAULT_ZONE, 0x21, 0xf3]);
        assert_eq!(codec.decode(&encoded).unwrap(), b"123");
    }

    #[test]
    fn even_digit_count_has_no_filler() {
        let codec = BcdPhoneCodec::default();
        let encoded = codec.encode(b"33612345678").unwrap();
        assert_eq!(encoded, vec![0x91, 0x33, 0x16, 0x32, 0x54, 0x76, 0xf8]);
        assert_eq!(codec.decode(&encoded).unwrap(), b"33612345678");

        let encoded = codec.encode(b"0612").unwrap();
        assert_eq!(encoded, vec![0x91, 0x60, 0x21]);
        assert_eq!(codec.decode(&encoded).unwrap(), b"0612");
    }

    #[test]
    fn configured_zone_is_emitted_and_reported() {
        let codec = BcdPhoneCodec::from_arg(Some(&CodecArg::Integer(0x81))).unwrap();
        let encoded = codec.encode(b"42").unwrap();
        assert_eq!(encoded, vec![0x81, 0x24]);
        assert_eq!(codec.decode_parts(&encoded).unwrap(), (0x81, b"42".to_vec()));
    }

    #[test]
    fn decode_discards_any_zone() {
        let codec = BcdPhoneCodec::default();
        assert_eq!(codec.decode(&[0xa1, 0x21, 0x43]).unwrap(), b"1234");
        assert_eq!(codec.decode(&[0x91]).unwrap(), b"");
    }

    #[test]
    fn rejects_non_digit_input() {
        let codec = BcdPhoneCodec::default();
        assert!(matches!(
            codec.encode(b"12a4"),
            Err(CodecError::UnrecognizedValue { .. })
        ));
        assert!(matches!(
            codec.encode(b"+33"),
            Err(CodecError::UnrecognizedValue { .. })
        ));
    }

    #[test]
    fn rejects_invalid_nibbles() {
        let codec = BcdPhoneCodec::default();
        // missing zone
        assert!(codec.decode(&[]).is_err());
        // filler in the low nibble
        assert!(codec.decode(&[0x91, 0x2f]).is_err());
        // filler before the last octet
        assert!(codec.decode(&[0x91, 0xf1, 0x21]).is_err());
        // hex digit that is not the filler
        assert!(codec.decode(&[0x91, 0xa1]).is_err());
    }

    #[test]
    fn zone_argument_is_validated() {
        assert!(matches!(
            BcdPhoneCodec::from_arg(Some(&CodecArg::Integer(256))),
            Err(ArgError::OutOfRange { value: 256, .. })
        ));
        assert!(matches!(
            BcdPhoneCodec::from_arg(Some(&CodecArg::framing(None, None))),
            Err(ArgError::Shape { .. })
        ));
    }

    #[test]
    fn reset_restores_zone_from_argument() {
        let mut codec = BcdPhoneCodec::new(Some(0xa1));
        codec.reset();
        assert_eq!(codec.zone(), 0xa1);
        assert_eq!(codec.arg(), Some(CodecArg::Integer(0xa1)));
    }
}
