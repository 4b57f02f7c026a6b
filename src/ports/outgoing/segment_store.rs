use async_trait::async_trait;
use bytes::Bytes;

use crate::Result;

/// Read access to the first log segment of a partition.
#[async_trait]
pub trait SegmentStore: Send + Sync {
    /// Raw segment bytes, or `None` when the partition has no segment.
    async fn read_segment(&self, topic_name: &str, partition: i32) -> Result<Option<Bytes>>;
}
