use thiserror::Error;

/// Failures while decoding wire or log bytes.
///
/// Every variant is fatal for the decode in progress; callers never get a
/// partially decoded value back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("out of bounds: need {needed} bytes but {remaining} remain")]
    OutOfBounds { needed: usize, remaining: usize },
    #[error("varint truncated before its terminating byte")]
    TruncatedVarint,
    #[error("varint does not fit in 64 bits")]
    VarintOverflow,
    #[error("invalid length: {0}")]
    InvalidLength(i64),
    #[error("invalid UTF-8 sequence")]
    InvalidUtf8,
}

pub type DecodeResult<T> = std::result::Result<T, DecodeError>;
