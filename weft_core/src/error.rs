use crate::arg::CodecKind;
use thiserror::Error;

/// Runtime failures raised by `decode`, strict `encode` and absorption paths.
///
/// Both variants carry the kind of the codec that refused the value so a caller
/// juggling many data-model nodes can tell which transform gave up.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The value is not a valid encoding (or, for strict encoders, not part of
    /// the codec's domain). Decoding or absorption cannot proceed.
    #[error("{kind} codec does not recognize the value: {reason}")]
    UnrecognizedValue { kind: CodecKind, reason: String },

    /// The blob looks like a valid encoded unit but its length cannot be
    /// bounded without ambiguity.
    #[error("{kind} codec cannot bound the encoded unit: {reason}")]
    SizeNotFound { kind: CodecKind, reason: String },
}

impl CodecError {
    pub fn unrecognized(kind: CodecKind, reason: impl Into<String>) -> Self {
        CodecError::UnrecognizedValue {
            kind,
            reason: reason.into(),
        }
    }

    pub fn size_not_found(kind: CodecKind, reason: impl Into<String>) -> Self {
        CodecError::SizeNotFound {
            kind,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> CodecKind {
        match self {
            CodecError::UnrecognizedValue { kind, .. } | CodecError::SizeNotFound { kind, .. } => {
                *kind
            }
        }
    }
}

/// Construction-time rejection of an initialization argument.
///
/// These are programming/configuration mistakes: the codec is never built, so
/// there is nothing to retry against.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgError {
    /// The codec kind takes no initialization argument but one was supplied.
    #[error("{kind} codec takes no initialization argument")]
    Unexpected { kind: CodecKind },

    /// The argument has the wrong shape for this codec kind.
    #[error("{kind} codec expects {expected}, got {found}")]
    Shape {
        kind: CodecKind,
        expected: &'static str,
        found: String,
    },

    /// The argument is well-shaped but numerically out of bounds.
    #[error("{kind} codec argument {value} is outside {min}..={max}")]
    OutOfRange {
        kind: CodecKind,
        value: i64,
        min: i64,
        max: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_error_reports_its_kind() {
        let err = CodecError::unrecognized(CodecKind::BcdPhone, "bad nibble");
        assert_eq!(err.kind(), CodecKind::BcdPhone);
        assert_eq!(
            err.to_string(),
            "bcd-phone codec does not recognize the value: bad nibble"
        );

        let err = CodecError::size_not_found(CodecKind::Framing, "empty suffix");
        assert_eq!(err.kind(), CodecKind::Framing);
    }

    #[test]
    fn arg_error_messages_name_the_kind() {
        let err = ArgError::OutOfRange {
            kind: CodecKind::Compression,
            value: 12,
            min: 0,
            max: 9,
        };
        assert_eq!(
            err.to_string(),
            "compression codec argument 12 is outside 0..=9"
        );
    }
}
