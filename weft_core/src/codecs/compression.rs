//! zlib compression codec.
//!
//! Encodes with a zlib stream (header, deflate body, adler32 trailer) at a
//! configurable level. Decoding follows the lenient policy: fuzzed values are
//! routinely not valid compressed streams, so any corruption yields an empty
//! value instead of an error.
//!
//! No absorption support: the compressed length is only known after a full
//! inflate, and even then trailing garbage makes the boundary uncertain.

use std::io::{self, Write};

use flate2::{Compression, Decompress, FlushDecompress, Status, write::ZlibEncoder};

use crate::arg::{CodecArg, CodecKind};
use crate::codec::{Codec, DecodePolicy};
use crate::error::{ArgError, CodecError};

/// Level used when the codec is built without an argument.
pub const DEFAULT_LEVEL: u32 = 9;
/// Highest level zlib accepts.
pub const MAX_LEVEL: u32 = 9;

const INFLATE_CHUNK: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionCodec {
    /// Level as supplied at construction, `None` when absent.
    level_arg: Option<u32>,
    /// Effective level, derived from `level_arg`.
    level: Compression,
}

impl CompressionCodec {
    /// Fails with [`ArgError::OutOfRange`] for levels above [`MAX_LEVEL`].
    pub fn new(level: Option<u32>) -> Result<Self, ArgError> {
        if let Some(value) = level.filter(|value| *value > MAX_LEVEL) {
            return Err(Self::out_of_range(i64::from(value)));
        }
        let mut codec = Self {
            level_arg: level,
            level: Compression::new(DEFAULT_LEVEL),
        };
        codec.reset();
        Ok(codec)
    }

    /// Accepts no argument or an integer level in `0..=9`.
    pub fn from_arg(arg: Option<&CodecArg>) -> Result<Self, ArgError> {
        match arg {
            None => Self::new(None),
            Some(CodecArg::Integer(value)) => {
                let level = u32::try_from(*value).map_err(|_| Self::out_of_range(*value))?;
                Self::new(Some(level))
            }
            Some(other) => Err(ArgError::Shape {
                kind: CodecKind::Compression,
                expected: "an integer compression level",
                found: other.describe(),
            }),
        }
    }

    fn out_of_range(value: i64) -> ArgError {
        ArgError::OutOfRange {
            kind: CodecKind::Compression,
            value,
            min: 0,
            max: i64::from(MAX_LEVEL),
        }
    }

    pub fn level(&self) -> u32 {
        self.level.level()
    }

    pub(crate) fn arg(&self) -> Option<CodecArg> {
        self.level_arg.map(|level| CodecArg::Integer(i64::from(level)))
    }

    fn deflate(&self, value: &[u8]) -> io::Result<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::with_capacity(value.len() / 2 + 16), self.level);
        encoder.write_all(value)?;
        encoder.finish()
    }

    /// Inflates a complete zlib stream. Bytes after the stream end are ignored.
    fn inflate(value: &[u8]) -> Result<Vec<u8>, String> {
        let mut inflater = Decompress::new(true);
        let mut output = Vec::with_capacity(value.len().saturating_mul(4).max(INFLATE_CHUNK));

        loop {
            let consumed = inflater.total_in() as usize;
            let produced = inflater.total_out();
            let status = inflater
                .decompress_vec(&value[consumed..], &mut output, FlushDecompress::None)
                .map_err(|e| e.to_string())?;

            match status {
                Status::StreamEnd => return Ok(output),
                Status::Ok | Status::BufError => {
                    if output.len() == output.capacity() {
                        output.reserve(output.capacity().max(INFLATE_CHUNK));
                        continue;
                    }
                    let input_exhausted = inflater.total_in() as usize >= value.len();
                    let stalled = inflater.total_in() as usize == consumed
                        && inflater.total_out() == produced;
                    if input_exhausted || stalled {
                        return Err(format!(
                            "zlib stream ends prematurely after {} of {} bytes",
                            inflater.total_in(),
                            value.len()
                        ));
                    }
                }
            }
        }
    }
}

impl Default for CompressionCodec {
    fn default() -> Self {
        Self {
            level_arg: None,
            level: Compression::new(DEFAULT_LEVEL),
        }
    }
}

impl Codec for CompressionCodec {
    fn kind(&self) -> CodecKind {
        CodecKind::Compression
    }

    fn policy(&self) -> DecodePolicy {
        DecodePolicy::Lenient
    }

    fn reset(&mut self) {
        self.level = Compression::new(self.level_arg.unwrap_or(DEFAULT_LEVEL));
    }

    fn encode(&self, value: &[u8]) -> Result<Vec<u8>, CodecError> {
        self.deflate(value)
            .map_err(|e| CodecError::unrecognized(self.kind(), format!("zlib encoder failed: {}", e)))
    }

    fn decode(&self, value: &[u8]) -> Result<Vec<u8>, CodecError> {
        match Self::inflate(value) {
            Ok(decoded) => Ok(decoded),
            Err(reason) => {
                log::debug!(
                    "compression codec: treating {} byte value as empty: {}",
                    value.len(),
                    reason
                );
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rand_chacha::ChaCha8Rng;
    use rand_core::SeedableRng;

    #[test]
    fn default_level_is_nine() {
        let codec = CompressionCodec::from_arg(None).unwrap();
        assert_eq!(codec.level(), DEFAULT_LEVEL);
        assert_eq!(codec.arg(), None);
    }

    #[test]
    fn explicit_level_is_kept() {
        let codec = CompressionCodec::from_arg(Some(&CodecArg::Integer(1))).unwrap();
        assert_eq!(codec.level(), 1);
        assert_eq!(codec.arg(), Some(CodecArg::Integer(1)));
    }

    #[test]
    fn rejects_bad_levels_and_shapes() {
        assert!(matches!(
            CompressionCodec::from_arg(Some(&CodecArg::Integer(10))),
            Err(ArgError::OutOfRange { value: 10, .. })
        ));
        assert!(matches!(
            CompressionCodec::from_arg(Some(&CodecArg::Integer(-1))),
            Err(ArgError::OutOfRange { value: -1, .. })
        ));
        assert!(matches!(
            CompressionCodec::from_arg(Some(&CodecArg::framing(None, None))),
            Err(ArgError::Shape { .. })
        ));
    }

    #[test]
    fn direct_and_argument_construction_agree_on_range() {
        assert_eq!(
            CompressionCodec::new(Some(10)),
            CompressionCodec::from_arg(Some(&CodecArg::Integer(10)))
        );
        assert!(matches!(
            CompressionCodec::new(Some(u32::MAX)),
            Err(ArgError::OutOfRange { max: 9, .. })
        ));
        assert!(matches!(
            CompressionCodec::from_arg(Some(&CodecArg::Integer(i64::MAX))),
            Err(ArgError::OutOfRange { .. })
        ));
        assert_eq!(CompressionCodec::new(Some(MAX_LEVEL)).unwrap().level(), MAX_LEVEL);
    }

    #[test]
    fn round_trips_random_payloads_at_every_level() {
        let mut rng = ChaCha8Rng::from_seed([7u8; 32]);
        for level in 0..=MAX_LEVEL {
            let codec = CompressionCodec::new(Some(level)).unwrap();
            let len = rng.random_range(0..2048);
            let payload: Vec<u8> = (0..len).map(|_| rng.random_range(0u8..16)).collect();
            let encoded = codec.encode(&payload).unwrap();
            assert_eq!(codec.decode(&encoded).unwrap(), payload, "level {}", level);
        }
    }

    #[test]
    fn large_output_grows_the_buffer() {
        let codec = CompressionCodec::default();
        let payload = vec![b'A'; 1 << 20];
        let encoded = codec.encode(&payload).unwrap();
        assert!(encoded.len() < payload.len() / 100);
        assert_eq!(codec.decode(&encoded).unwrap(), payload);
    }

    #[test]
    fn invalid_stream_decodes_to_empty() {
        let codec = CompressionCodec::default();
        assert_eq!(codec.decode(b"not a valid stream").unwrap(), Vec::<u8>::new());
        assert_eq!(codec.decode(b"").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn truncated_and_corrupted_streams_decode_to_empty() {
        let codec = CompressionCodec::default();
        let encoded = codec.encode(b"the quick brown fox jumps over the lazy dog").unwrap();

        let truncated = &encoded[..encoded.len() - 3];
        assert!(codec.decode(truncated).unwrap().is_empty());

        let mut bad_checksum = encoded.clone();
        let last = bad_checksum.len() - 1;
        bad_checksum[last] ^= 0xff;
        assert!(codec.decode(&bad_checksum).unwrap().is_empty());
    }

    #[test]
    fn trailing_bytes_after_stream_are_ignored() {
        let codec = CompressionCodec::default();
        let mut encoded = codec.encode(b"payload").unwrap();
        encoded.extend_from_slice(b"garbage");
        assert_eq!(codec.decode(&encoded).unwrap(), b"payload");
    }

    #[test]
    fn reset_keeps_the_configured_level() {
        let mut codec = CompressionCodec::new(Some(3)).unwrap();
        codec.reset();
        codec.reset();
        assert_eq!(codec.level(), 3);
    }
}
