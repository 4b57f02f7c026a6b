use bytes::Bytes;
use uuid::Uuid;

use crate::domain::TopicId;

/// One batch of the cluster metadata log.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordBatch {
    pub base_offset: i64,
    pub batch_length: i32,
    pub partition_leader_epoch: i32,
    pub magic: i8,
    pub crc: i32,
    pub attributes: i16,
    pub last_offset_delta: i32,
    pub base_timestamp: i64,
    pub max_timestamp: i64,
    pub producer_id: i64,
    pub producer_epoch: i16,
    pub base_sequence: i32,
    pub records: Vec<Record>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub length: i64,
    pub attributes: i8,
    pub timestamp_delta: i64,
    pub offset_delta: i64,
    /// `None` for a null key (stored length -1); otherwise opaque.
    pub key: Option<Bytes>,
    pub value: RecordValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    Topic(TopicRecordValue),
    Partition(PartitionRecordValue),
    FeatureLevel(FeatureLevelRecordValue),
    /// Any other record type or frame version; the payload is kept but not interpreted.
    Unsupported {
        frame_version: u8,
        record_type: u8,
        payload: Bytes,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopicRecordValue {
    pub version: u8,
    pub topic_name: String,
    pub topic_id: TopicId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartitionRecordValue {
    pub version: u8,
    pub partition_id: i32,
    pub topic_id: TopicId,
    pub replicas: Vec<i32>,
    pub in_sync_replicas: Vec<i32>,
    pub removing_replicas: Vec<i32>,
    pub adding_replicas: Vec<i32>,
    pub leader_id: i32,
    pub leader_epoch: i32,
    pub partition_epoch: i32,
    pub directories: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureLevelRecordValue {
    pub version: u8,
    pub name: String,
    pub level: u16,
}
