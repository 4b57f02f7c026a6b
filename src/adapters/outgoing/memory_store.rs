use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::ports::outgoing::SegmentStore;
use crate::Result;

/// In-memory segments keyed by topic name and partition.
#[derive(Debug, Clone, Default)]
pub struct MemorySegmentStore {
    segments: Arc<RwLock<HashMap<(String, i32), Bytes>>>,
}

impl MemorySegmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the segment of a partition.
    pub async fn insert(&self, topic_name: impl Into<String>, partition: i32, segment: impl Into<Bytes>) {
        self.segments
            .write()
            .await
            .insert((topic_name.into(), partition), segment.into());
    }
}

#[async_trait]
impl SegmentStore for MemorySegmentStore {
    async fn read_segment(&self, topic_name: &str, partition: i32) -> Result<Option<Bytes>> {
        let segments = self.segments.read().await;
        Ok(segments.get(&(topic_name.to_string(), partition)).cloned())
    }
}
