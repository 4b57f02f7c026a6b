use bytes::Bytes;

use crate::domain::TopicId;

#[derive(Debug, Clone, PartialEq)]
pub struct RequestHeader {
    pub api_key: i16,
    pub api_version: i16,
    pub correlation_id: i32,
    pub client_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopicRequest {
    pub topic_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DescribeCursor {
    pub topic_name: String,
    pub partition_index: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DescribeTopicPartitionsRequest {
    pub topics: Vec<TopicRequest>,
    pub response_partition_limit: i32,
    pub cursor: Option<DescribeCursor>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub max_wait_ms: i32,
    pub min_bytes: i32,
    pub max_bytes: i32,
    pub isolation_level: i8,
    pub session_id: i32,
    pub session_epoch: i32,
    pub topics: Vec<FetchTopic>,
    pub forgotten_topics: Vec<ForgottenTopic>,
    pub rack_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchTopic {
    pub topic_id: TopicId,
    pub partitions: Vec<FetchPartition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchPartition {
    pub partition: i32,
    pub current_leader_epoch: i32,
    pub fetch_offset: i64,
    pub last_fetched_epoch: i32,
    pub log_start_offset: i64,
    pub partition_max_bytes: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForgottenTopic {
    pub topic_id: TopicId,
    pub partitions: Vec<i32>,
}

/// A framed request whose header has been decoded; the body is decoded by
/// the handler for `header.api_key` once the version has been accepted.
#[derive(Debug, Clone)]
pub struct KafkaRequest {
    pub header: RequestHeader,
    pub body: Bytes,
}

impl KafkaRequest {
    pub fn new(header: RequestHeader, body: Bytes) -> Self {
        Self { header, body }
    }
}
