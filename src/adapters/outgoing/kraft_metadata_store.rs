use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::fs;
use tracing::info;

use crate::adapters::protocol::constants::{FIRST_SEGMENT_FILE, METADATA_TOPIC_DIR};
use crate::adapters::protocol::kraft_record_parser::{DeltaEncoding, MetadataLogDecoder};
use crate::application::error::ApplicationError;
use crate::domain::MetadataIndex;
use crate::Result;

/// Loads the [`MetadataIndex`] from the cluster metadata log at startup.
#[derive(Debug, Clone)]
pub struct KraftMetadataStore {
    path: PathBuf,
    decoder: MetadataLogDecoder,
}

impl KraftMetadataStore {
    pub fn new(path: impl Into<PathBuf>, delta_encoding: DeltaEncoding) -> Self {
        Self {
            path: path.into(),
            decoder: MetadataLogDecoder::with_delta_encoding(delta_encoding),
        }
    }

    /// `<log-dir>/__cluster_metadata-0/00000000000000000000.log`
    pub fn metadata_log_path(log_dir: &Path) -> PathBuf {
        log_dir.join(METADATA_TOPIC_DIR).join(FIRST_SEGMENT_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing or unreadable log is an error; there is no empty fallback index.
    pub async fn load(&self) -> Result<MetadataIndex> {
        let content = fs::read(&self.path)
            .await
            .map_err(|source| ApplicationError::MetadataLog {
                path: self.path.clone(),
                source,
            })?;

        let index = self.decoder.decode_index(Bytes::from(content))?;
        info!(
            path = %self.path.display(),
            topics = index.topic_count(),
            partitions = index.partition_count(),
            "metadata index loaded"
        );
        Ok(index)
    }
}
