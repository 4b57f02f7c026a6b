use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use crate::adapters::protocol::constants::FIRST_SEGMENT_FILE;
use crate::ports::outgoing::SegmentStore;
use crate::Result;

/// Reads partition segments from a Kafka log directory laid out as
/// `<log-dir>/<topic>-<partition>/00000000000000000000.log`.
#[derive(Debug, Clone)]
pub struct DiskSegmentStore {
    log_dir: PathBuf,
}

impl DiskSegmentStore {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
        }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn segment_path(&self, topic_name: &str, partition: i32) -> PathBuf {
        self.log_dir
            .join(format!("{}-{}", topic_name, partition))
            .join(FIRST_SEGMENT_FILE)
    }
}

#[async_trait]
impl SegmentStore for DiskSegmentStore {
    async fn read_segment(&self, topic_name: &str, partition: i32) -> Result<Option<Bytes>> {
        let path = self.segment_path(topic_name, partition);
        match fs::read(&path).await {
            Ok(content) => {
                debug!(path = %path.display(), bytes = content.len(), "read segment");
                Ok(Some(Bytes::from(content)))
            }
            // 세그먼트가 없으면 빈 레코드로 응답
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
