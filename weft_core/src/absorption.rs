//! Reverse-modeling helpers built on the [`Absorb`] capability.
//!
//! A captured blob is split by asking the codec how many leading bytes form one
//! encoded unit, then decoding exactly that slice.

use crate::arg::CodecKind;
use crate::codec::{AnyCodec, Codec};
use crate::error::CodecError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbsorbError {
    /// The codec kind cannot delimit its own units.
    #[error("{0} codec does not support absorption")]
    Unsupported(CodecKind),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// One unit taken from the front of a blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Absorbed {
    /// Bytes of the blob that formed the encoded unit.
    pub consumed: usize,
    /// The decoded value of that unit.
    pub value: Vec<u8>,
}

/// Absorbs the single encoded unit at the start of `blob`.
pub fn absorb(codec: &AnyCodec, blob: &[u8]) -> Result<Absorbed, AbsorbError> {
    let absorber = codec
        .absorption()
        .ok_or(AbsorbError::Unsupported(codec.kind()))?;

    let consumed = absorber.how_much_can_be_consumed_from(blob)?;
    let unit = blob.get(..consumed).ok_or_else(|| {
        CodecError::unrecognized(
            codec.kind(),
            format!("unit of {} bytes overruns a {} byte blob", consumed, blob.len()),
        )
    })?;
    let value = codec.decode(unit)?;

    log::debug!(
        "absorbed {} of {} bytes with {} codec",
        consumed,
        blob.len(),
        codec.kind()
    );
    Ok(Absorbed { consumed, value })
}

/// Splits `blob` into consecutive units of the same codec until it is exhausted.
///
/// An empty blob yields no units. A unit that consumes nothing is rejected so
/// the walk always makes progress.
pub fn absorb_all(codec: &AnyCodec, blob: &[u8]) -> Result<Vec<Absorbed>, AbsorbError> {
    let mut units = Vec::new();
    let mut offset = 0;

    while offset < blob.len() {
        let unit = absorb(codec, &blob[offset..])?;
        if unit.consumed == 0 {
            return Err(CodecError::unrecognized(
                codec.kind(),
                format!("zero-length unit at offset {}", offset),
            )
            .into());
        }
        offset += unit.consumed;
        units.push(unit);
    }

    Ok(units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arg::CodecArg;
    use crate::codec::new_codec;

    fn bit_invert() -> AnyCodec {
        new_codec(CodecKind::BitInvert, None).unwrap()
    }

    #[test]
    fn absorbs_leading_unit_and_decodes_it() {
        let unit = absorb(&bit_invert(), &[0x01, 0xff, 0x00]).unwrap();
        assert_eq!(unit, Absorbed { consumed: 1, value: vec![0x80] });
    }

    #[test]
    fn splits_a_captured_sequence() {
        let units = absorb_all(&bit_invert(), &[0x01, 0x02, 0x04]).unwrap();
        let values: Vec<Vec<u8>> = units.iter().map(|u| u.value.clone()).collect();
        assert_eq!(values, vec![vec![0x80], vec![0x40], vec![0x20]]);
        assert_eq!(units.iter().map(|u| u.consumed).sum::<usize>(), 3);
        assert!(absorb_all(&bit_invert(), b"").unwrap().is_empty());
    }

    #[test]
    fn empty_blob_holds_no_unit() {
        assert!(matches!(
            absorb(&bit_invert(), b""),
            Err(AbsorbError::Codec(CodecError::UnrecognizedValue { .. }))
        ));
    }

    #[test]
    fn unsupported_kinds_are_reported_without_calling() {
        for kind in [CodecKind::Compression, CodecKind::Packed7, CodecKind::BitReverse] {
            let codec = new_codec(kind, None).unwrap();
            assert_eq!(absorb(&codec, b"abc"), Err(AbsorbError::Unsupported(kind)));
        }
    }

    #[test]
    fn framing_is_not_self_delimiting() {
        let codec = new_codec(
            CodecKind::Framing,
            Some(&CodecArg::framing(Some(b"<"), Some(b">"))),
        )
        .unwrap();
        let blob = codec.encode(b"a>b").unwrap();
        assert_eq!(
            absorb_all(&codec, &blob),
            Err(AbsorbError::Unsupported(CodecKind::Framing))
        );
        assert_eq!(codec.decode(&blob).unwrap(), b"a>b");
    }
}
