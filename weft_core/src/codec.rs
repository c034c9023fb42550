use crate::arg::{CodecArg, CodecKind};
use crate::codecs::{
    BcdPhoneCodec, BitInvertCodec, BitReverseCodec, CompressionCodec, FramingCodec, Packed7Codec,
};
use crate::error::{ArgError, CodecError};

/// How a codec reports a value it cannot decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Malformed input decodes to an empty value. Indistinguishable from a
    /// genuinely empty value; kept for codecs that must swallow fuzzed garbage.
    Lenient,
    /// Malformed input fails with [`CodecError::UnrecognizedValue`].
    Strict,
}

/// A `Codec` is a bidirectional transform between a logical field value and its
/// wire representation.
///
/// Codecs are stateless per call: `encode` and `decode` only read the
/// parameters derived from the initialization argument. Callers that share an
/// instance across threads must serialize `reset`; giving each consumer its own
/// clone avoids the question entirely.
pub trait Codec: Send + Sync {
    /// The transform this instance performs.
    fn kind(&self) -> CodecKind;

    /// Whether `decode` signals malformed input with an empty value or an error.
    fn policy(&self) -> DecodePolicy;

    /// Re-derives internal parameters from the stored initialization argument.
    ///
    /// Safe to call any number of times. Codecs without derived parameters
    /// keep the default no-op.
    fn reset(&mut self) {}

    /// Produces the wire form of `value`.
    ///
    /// # Returns
    /// `Result<Vec<u8>, CodecError>`:
    ///   - `Ok(encoded)`: the encoded bytes.
    ///   - `Err(CodecError::UnrecognizedValue)`: only for codecs whose domain is
    ///     narrower than arbitrary bytes (e.g. digits, 7-bit characters).
    fn encode(&self, value: &[u8]) -> Result<Vec<u8>, CodecError>;

    /// Recovers the logical value from its wire form.
    ///
    /// On well-formed input this exactly inverts `encode`. Malformed input is
    /// handled according to [`Codec::policy`].
    fn decode(&self, value: &[u8]) -> Result<Vec<u8>, CodecError>;
}

/// Optional capability of codecs whose encoded units are self-delimiting or
/// fixed-width.
pub trait Absorb {
    /// Reports how many leading bytes of `blob` form exactly one encoded unit.
    ///
    /// `blob` must begin with the encoded unit; anything after it is unrelated
    /// trailing data.
    ///
    /// # Returns
    /// `Result<usize, CodecError>`:
    ///   - `Ok(len)`: the unit is `blob[..len]`.
    ///   - `Err(CodecError::UnrecognizedValue)`: `blob` does not start with a
    ///     well-formed unit.
    ///   - `Err(CodecError::SizeNotFound)`: the unit looks well-formed but its
    ///     length cannot be bounded.
    fn how_much_can_be_consumed_from(&self, blob: &[u8]) -> Result<usize, CodecError>;
}

/// Tagged union over every concrete codec.
///
/// Each variant owns its validated initialization argument and derived
/// parameters. `Clone` is a deep copy, so clones never observe each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyCodec {
    Compression(CompressionCodec),
    Framing(FramingCodec),
    Packed7(Packed7Codec),
    BcdPhone(BcdPhoneCodec),
    BitReverse(BitReverseCodec),
    BitInvert(BitInvertCodec),
}

/// Builds a codec of `kind`, validating `arg` eagerly.
pub fn new_codec(kind: CodecKind, arg: Option<&CodecArg>) -> Result<AnyCodec, ArgError> {
    let codec = match kind {
        CodecKind::Compression => AnyCodec::Compression(CompressionCodec::from_arg(arg)?),
        CodecKind::Framing => AnyCodec::Framing(FramingCodec::from_arg(arg)?),
        CodecKind::Packed7 => AnyCodec::Packed7(Packed7Codec::from_arg(arg)?),
        CodecKind::BcdPhone => AnyCodec::BcdPhone(BcdPhoneCodec::from_arg(arg)?),
        CodecKind::BitReverse => AnyCodec::BitReverse(BitReverseCodec::from_arg(arg)?),
        CodecKind::BitInvert => AnyCodec::BitInvert(BitInvertCodec::from_arg(arg)?),
    };
    log::trace!("built {} codec with argument {:?}", kind, arg);
    Ok(codec)
}

impl AnyCodec {
    pub fn as_codec(&self) -> &dyn Codec {
        match self {
            AnyCodec::Compression(codec) => codec,
            AnyCodec::Framing(codec) => codec,
            AnyCodec::Packed7(codec) => codec,
            AnyCodec::BcdPhone(codec) => codec,
            AnyCodec::BitReverse(codec) => codec,
            AnyCodec::BitInvert(codec) => codec,
        }
    }

    pub fn as_codec_mut(&mut self) -> &mut dyn Codec {
        match self {
            AnyCodec::Compression(codec) => codec,
            AnyCodec::Framing(codec) => codec,
            AnyCodec::Packed7(codec) => codec,
            AnyCodec::BcdPhone(codec) => codec,
            AnyCodec::BitReverse(codec) => codec,
            AnyCodec::BitInvert(codec) => codec,
        }
    }

    /// The absorption capability, when this kind of codec has one.
    ///
    /// ```
    /// use weft_core::{Absorb, CodecKind, new_codec};
    ///
    /// let codec = new_codec(CodecKind::BitInvert, None).unwrap();
    /// if let Some(absorb) = codec.absorption() {
    ///     assert_eq!(absorb.how_much_can_be_consumed_from(&[1, 2, 3]).unwrap(), 1);
    /// }
    /// assert!(new_codec(CodecKind::Compression, None).unwrap().absorption().is_none());
    /// ```
    pub fn absorption(&self) -> Option<&dyn Absorb> {
        match self {
            AnyCodec::BitInvert(codec) => Some(codec as &dyn Absorb),
            AnyCodec::Compression(_)
            | AnyCodec::Framing(_)
            | AnyCodec::Packed7(_)
            | AnyCodec::BcdPhone(_)
            | AnyCodec::BitReverse(_) => None,
        }
    }

    /// The initialization argument this instance was built (or reconfigured) with.
    pub fn arg(&self) -> Option<CodecArg> {
        match self {
            AnyCodec::Compression(codec) => codec.arg(),
            AnyCodec::Framing(codec) => Some(codec.arg()),
            AnyCodec::BcdPhone(codec) => codec.arg(),
            AnyCodec::Packed7(_) | AnyCodec::BitReverse(_) | AnyCodec::BitInvert(_) => None,
        }
    }

    /// Replaces the initialization argument and re-derives parameters.
    ///
    /// The argument is validated exactly as at construction; on error the
    /// instance is left untouched.
    pub fn reconfigure(&mut self, arg: Option<&CodecArg>) -> Result<(), ArgError> {
        *self = new_codec(self.kind(), arg)?;
        Ok(())
    }
}

impl Codec for AnyCodec {
    fn kind(&self) -> CodecKind {
        self.as_codec().kind()
    }

    fn policy(&self) -> DecodePolicy {
        self.as_codec().policy()
    }

    fn reset(&mut self) {
        log::trace!("resetting {} codec", self.kind());
        self.as_codec_mut().reset()
    }

    fn encode(&self, value: &[u8]) -> Result<Vec<u8>, CodecError> {
        self.as_codec().encode(value)
    }

    fn decode(&self, value: &[u8]) -> Result<Vec<u8>, CodecError> {
        self.as_codec().decode(value)
    }
}

impl From<CompressionCodec> for AnyCodec {
    fn from(codec: CompressionCodec) -> Self {
        AnyCodec::Compression(codec)
    }
}

impl From<FramingCodec> for AnyCodec {
    fn from(codec: FramingCodec) -> Self {
        AnyCodec::Framing(codec)
    }
}

impl From<Packed7Codec> for AnyCodec {
    fn from(codec: Packed7Codec) -> Self {
        AnyCodec::Packed7(codec)
    }
}

impl From<BcdPhoneCodec> for AnyCodec {
    fn from(codec: BcdPhoneCodec) -> Self {
        AnyCodec::BcdPhone(codec)
    }
}

impl From<BitReverseCodec> for AnyCodec {
    fn from(codec: BitReverseCodec) -> Self {
        AnyCodec::BitReverse(codec)
    }
}

impl From<BitInvertCodec> for AnyCodec {
    fn from(codec: BitInvertCodec) -> Self {
        AnyCodec::BitInvert(codec)
    }
}
