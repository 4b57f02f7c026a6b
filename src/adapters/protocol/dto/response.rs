use bytes::Bytes;

use super::common::{ApiKey, ErrorCode, ResponseHeaderVersion};
use crate::adapters::protocol::constants::{SupportedApi, SUPPORTED_APIS};
use crate::domain::TopicId;

#[derive(Debug, Clone, PartialEq)]
pub struct ApiVersion {
    pub api_key: i16,
    pub min_version: i16,
    pub max_version: i16,
}

impl From<&SupportedApi> for ApiVersion {
    fn from(api: &SupportedApi) -> Self {
        Self {
            api_key: api.key.into(),
            min_version: api.min_version,
            max_version: api.max_version,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiVersionsResponse {
    pub error_code: i16,
    pub api_versions: Vec<ApiVersion>,
    pub throttle_time_ms: i32,
}

impl ApiVersionsResponse {
    pub fn new(api_versions: Vec<ApiVersion>) -> Self {
        Self {
            error_code: ErrorCode::None.into(),
            api_versions,
            throttle_time_ms: 0,
        }
    }

    /// Every entry of the static dispatch table.
    pub fn supported() -> Self {
        Self::new(SUPPORTED_APIS.iter().map(ApiVersion::from).collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartitionInfo {
    pub error_code: i16,
    pub partition_index: i32,
    pub leader_id: i32,
    pub leader_epoch: i32,
    pub replica_nodes: Vec<i32>,
    pub isr_nodes: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopicResponse {
    pub error_code: i16,
    pub topic_name: String,
    pub topic_id: TopicId,
    pub is_internal: bool,
    pub partitions: Vec<PartitionInfo>,
    pub topic_authorized_operations: i32,
}

impl TopicResponse {
    pub fn unknown(topic_name: String, topic_authorized_operations: i32) -> Self {
        Self {
            error_code: ErrorCode::UnknownTopicOrPartition.into(),
            topic_name,
            topic_id: TopicId::zero(),
            is_internal: false,
            partitions: vec![],
            topic_authorized_operations,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DescribeTopicPartitionsResponse {
    pub throttle_time_ms: i32,
    pub topics: Vec<TopicResponse>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub throttle_time_ms: i32,
    pub error_code: i16,
    pub session_id: i32,
    pub responses: Vec<FetchableTopicResponse>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchableTopicResponse {
    pub topic_id: TopicId,
    pub partitions: Vec<FetchablePartitionResponse>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchablePartitionResponse {
    pub partition_index: i32,
    pub error_code: i16,
    pub high_watermark: i64,
    pub last_stable_offset: i64,
    pub log_start_offset: i64,
    pub records: Option<Bytes>,
}

impl FetchablePartitionResponse {
    pub fn unknown_topic(partition_index: i32) -> Self {
        Self {
            partition_index,
            error_code: ErrorCode::UnknownTopicId.into(),
            high_watermark: 0,
            last_stable_offset: 0,
            log_start_offset: 0,
            records: None,
        }
    }
}

impl FetchResponse {
    pub fn new(session_id: i32, responses: Vec<FetchableTopicResponse>) -> Self {
        Self {
            throttle_time_ms: 0,
            error_code: ErrorCode::None.into(),
            session_id,
            responses,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePayload {
    ApiVersions(ApiVersionsResponse),
    DescribeTopicPartitions(DescribeTopicPartitionsResponse),
    Fetch(FetchResponse),
    /// Only an error code, e.g. for an unsupported api version.
    Error { api_key: ApiKey, error_code: i16 },
}

impl ResponsePayload {
    pub fn error(api_key: ApiKey, error_code: ErrorCode) -> Self {
        ResponsePayload::Error {
            api_key,
            error_code: error_code.into(),
        }
    }

    pub fn api_key(&self) -> ApiKey {
        match self {
            ResponsePayload::ApiVersions(_) => ApiKey::ApiVersions,
            ResponsePayload::DescribeTopicPartitions(_) => ApiKey::DescribeTopicPartitions,
            ResponsePayload::Fetch(_) => ApiKey::Fetch,
            ResponsePayload::Error { api_key, .. } => *api_key,
        }
    }

    pub fn header_version(&self) -> ResponseHeaderVersion {
        self.api_key().response_header_version()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KafkaResponse {
    pub correlation_id: i32,
    pub payload: ResponsePayload,
}

impl KafkaResponse {
    pub fn new(correlation_id: i32, payload: ResponsePayload) -> Self {
        Self {
            correlation_id,
            payload,
        }
    }
}
