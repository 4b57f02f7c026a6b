use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, warn};

use crate::adapters::protocol::constants::{
    supported_api, FETCH_TOPIC_ID_MIN_VERSION, TOPIC_AUTHORIZED_OPERATIONS,
};
use crate::adapters::protocol::dto::{
    ApiKey, ApiVersionsResponse, DescribeTopicPartitionsResponse, ErrorCode, FetchResponse,
    FetchTopic, FetchablePartitionResponse, FetchableTopicResponse, KafkaRequest, KafkaResponse,
    PartitionInfo, RequestHeader, ResponsePayload, TopicResponse,
};
use crate::adapters::protocol::kraft_record_parser::MetadataLogDecoder;
use crate::adapters::protocol::parser::RequestParser;
use crate::application::error::ApplicationError;
use crate::domain::{MetadataIndex, PartitionMetadata};
use crate::ports::incoming::MessageHandler;
use crate::ports::outgoing::SegmentStore;
use crate::Result;

/// Answers ApiVersions, DescribeTopicPartitions and Fetch from a read-only
/// metadata index and a segment store.
pub struct KafkaBroker {
    index: Arc<MetadataIndex>,
    segment_store: Box<dyn SegmentStore>,
    request_parser: RequestParser,
}

impl KafkaBroker {
    pub fn new(index: Arc<MetadataIndex>, segment_store: Box<dyn SegmentStore>) -> Self {
        Self {
            index,
            segment_store,
            request_parser: RequestParser::new(),
        }
    }

    #[cfg(test)]
    pub fn index(&self) -> &MetadataIndex {
        &self.index
    }

    fn handle_api_versions(&self) -> ResponsePayload {
        ResponsePayload::ApiVersions(ApiVersionsResponse::supported())
    }

    fn handle_describe_topic_partitions(&self, body: Bytes) -> Result<ResponsePayload> {
        let request = self.request_parser.parse_describe_topic_partitions(body)?;

        let mut topic_names: Vec<String> = request.topics.into_iter().map(|t| t.topic_name).collect();
        topic_names.sort();

        let topics = topic_names
            .into_iter()
            .map(|name| self.describe_topic(name))
            .collect();

        Ok(ResponsePayload::DescribeTopicPartitions(
            DescribeTopicPartitionsResponse {
                throttle_time_ms: 0,
                topics,
            },
        ))
    }

    fn describe_topic(&self, topic_name: String) -> TopicResponse {
        let Some(topic_id) = self.index.resolve_topic(&topic_name) else {
            debug!(topic = %topic_name, "unknown topic");
            return TopicResponse::unknown(topic_name, TOPIC_AUTHORIZED_OPERATIONS);
        };

        TopicResponse {
            error_code: ErrorCode::None.into(),
            topic_name,
            topic_id,
            is_internal: false,
            partitions: self
                .index
                .partitions_of(&topic_id)
                .iter()
                .map(Self::partition_info)
                .collect(),
            topic_authorized_operations: TOPIC_AUTHORIZED_OPERATIONS,
        }
    }

    fn partition_info(partition: &PartitionMetadata) -> PartitionInfo {
        PartitionInfo {
            error_code: ErrorCode::None.into(),
            partition_index: partition.partition_index,
            leader_id: partition.leader_id,
            leader_epoch: partition.leader_epoch,
            replica_nodes: partition.replicas.clone(),
            isr_nodes: partition.in_sync_replicas.clone(),
        }
    }

    async fn handle_fetch(&self, header: &RequestHeader, body: Bytes) -> Result<ResponsePayload> {
        // 토픽 ID가 없는 구버전 Fetch는 지원하지 않음
        if header.api_version < FETCH_TOPIC_ID_MIN_VERSION {
            return Ok(ResponsePayload::error(ApiKey::Fetch, ErrorCode::UnsupportedVersion));
        }

        let request = self.request_parser.parse_fetch(body)?;
        let mut responses = Vec::with_capacity(request.topics.len());
        for topic in &request.topics {
            responses.push(self.fetch_topic(topic).await?);
        }

        Ok(ResponsePayload::Fetch(FetchResponse::new(0, responses)))
    }

    /// Answers the first requested partition of a topic.
    async fn fetch_topic(&self, topic: &FetchTopic) -> Result<FetchableTopicResponse> {
        let mut partitions = Vec::with_capacity(1);

        if let Some(requested) = topic.partitions.first() {
            let partition_index = requested.partition;
            let response = match self.index.topic_name(&topic.topic_id) {
                None => {
                    debug!(topic_id = %topic.topic_id, "unknown topic id");
                    FetchablePartitionResponse::unknown_topic(partition_index)
                }
                Some(name)
                    if !self
                        .index
                        .partitions_of(&topic.topic_id)
                        .iter()
                        .any(|p| p.partition_index == partition_index) =>
                {
                    debug!(topic = name, partition = partition_index, "unknown partition");
                    FetchablePartitionResponse {
                        error_code: ErrorCode::UnknownTopicOrPartition.into(),
                        ..FetchablePartitionResponse::unknown_topic(partition_index)
                    }
                }
                Some(name) => self.read_partition(name, partition_index).await?,
            };
            partitions.push(response);
        }

        Ok(FetchableTopicResponse {
            topic_id: topic.topic_id,
            partitions,
        })
    }

    async fn read_partition(&self, topic_name: &str, partition_index: i32) -> Result<FetchablePartitionResponse> {
        let records = self.segment_store.read_segment(topic_name, partition_index).await?;

        let high_watermark = match &records {
            Some(segment) => MetadataLogDecoder::high_watermark(segment.clone()).unwrap_or_else(|e| {
                warn!(topic = topic_name, partition = partition_index, error = %e, "unreadable segment headers");
                0
            }),
            None => 0,
        };
        debug!(
            topic = topic_name,
            partition = partition_index,
            high_watermark,
            bytes = records.as_ref().map_or(0, Bytes::len),
            "fetch"
        );

        Ok(FetchablePartitionResponse {
            partition_index,
            error_code: ErrorCode::None.into(),
            high_watermark,
            last_stable_offset: high_watermark,
            log_start_offset: 0,
            records,
        })
    }
}

#[async_trait]
impl MessageHandler for KafkaBroker {
    async fn handle_request(&self, request: KafkaRequest) -> Result<KafkaResponse> {
        let KafkaRequest { header, body } = request;
        let api_key = ApiKey::try_from(header.api_key).map_err(ApplicationError::UnsupportedApiKey)?;

        debug!(
            api_key = header.api_key,
            api_version = header.api_version,
            correlation_id = header.correlation_id,
            "handling request"
        );

        let supported = supported_api(api_key).is_some_and(|api| api.supports(header.api_version));
        let payload = if !supported {
            debug!(api_key = header.api_key, api_version = header.api_version, "unsupported version");
            ResponsePayload::error(api_key, ErrorCode::UnsupportedVersion)
        } else {
            match api_key {
                ApiKey::ApiVersions => self.handle_api_versions(),
                ApiKey::DescribeTopicPartitions => self.handle_describe_topic_partitions(body)?,
                ApiKey::Fetch => self.handle_fetch(&header, body).await?,
            }
        };

        Ok(KafkaResponse::new(header.correlation_id, payload))
    }
}
