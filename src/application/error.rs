use std::path::PathBuf;

use crate::domain::error::DecodeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported api key: {0}")]
    UnsupportedApiKey(i16),
    #[error("invalid frame length: {0}")]
    InvalidFrameLength(i32),
    #[error("failed to read metadata log {}: {source}", path.display())]
    MetadataLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ApplicationError>;
