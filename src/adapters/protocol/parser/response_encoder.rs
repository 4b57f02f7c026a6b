use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use super::varint::PutVarint;
use crate::adapters::protocol::constants::NULL_CURSOR;
use crate::adapters::protocol::dto::{
    ApiVersionsResponse, DescribeTopicPartitionsResponse, FetchResponse, KafkaResponse,
    PartitionInfo, ResponseHeaderVersion, ResponsePayload, TopicResponse,
};

/// Builds one length-prefixed response frame field by field.
///
/// The write-side mirror of [`BufferCursor`](super::base_parser::BufferCursor):
/// compact lengths are written as `n + 1` and `0` marks an absent value.
#[derive(Debug, Default)]
pub struct ResponseEncoder {
    buf: BytesMut,
}

impl ResponseEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes appended so far, excluding the length prefix.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn put_i8(&mut self, value: i8) -> &mut Self {
        self.buf.put_i8(value);
        self
    }

    pub fn put_u8(&mut self, value: u8) -> &mut Self {
        self.buf.put_u8(value);
        self
    }

    pub fn put_bool(&mut self, value: bool) -> &mut Self {
        self.buf.put_u8(value as u8);
        self
    }

    pub fn put_i16(&mut self, value: i16) -> &mut Self {
        self.buf.put_i16(value);
        self
    }

    pub fn put_u16(&mut self, value: u16) -> &mut Self {
        self.buf.put_u16(value);
        self
    }

    pub fn put_i32(&mut self, value: i32) -> &mut Self {
        self.buf.put_i32(value);
        self
    }

    pub fn put_u32(&mut self, value: u32) -> &mut Self {
        self.buf.put_u32(value);
        self
    }

    pub fn put_i64(&mut self, value: i64) -> &mut Self {
        self.buf.put_i64(value);
        self
    }

    pub fn put_u64(&mut self, value: u64) -> &mut Self {
        self.buf.put_u64(value);
        self
    }

    pub fn put_bytes(&mut self, value: &[u8]) -> &mut Self {
        self.buf.put_slice(value);
        self
    }

    pub fn put_uvarint(&mut self, value: u64) -> &mut Self {
        self.buf.put_uvarint(value);
        self
    }

    pub fn put_varint(&mut self, value: i64) -> &mut Self {
        self.buf.put_varint(value);
        self
    }

    pub fn put_compact_string(&mut self, value: &str) -> &mut Self {
        self.put_compact_bytes(Some(value.as_bytes()))
    }

    pub fn put_compact_nullable_string(&mut self, value: Option<&str>) -> &mut Self {
        self.put_compact_bytes(value.map(str::as_bytes))
    }

    pub fn put_compact_bytes(&mut self, value: Option<&[u8]>) -> &mut Self {
        match value {
            None => self.put_uvarint(0),
            Some(bytes) => self.put_uvarint(bytes.len() as u64 + 1).put_bytes(bytes),
        }
    }

    pub fn put_compact_array<T, F>(&mut self, items: &[T], mut element: F) -> &mut Self
    where
        F: FnMut(&mut Self, &T),
    {
        self.put_uvarint(items.len() as u64 + 1);
        for item in items {
            element(self, item);
        }
        self
    }

    /// An empty tag buffer; no tagged fields are ever written.
    pub fn put_tag_buffer(&mut self) -> &mut Self {
        self.put_uvarint(0)
    }

    /// Prepends the 4-byte big-endian length of everything appended so far.
    pub fn finish(self) -> Bytes {
        let mut frame = BytesMut::with_capacity(4 + self.buf.len());
        frame.put_i32(self.buf.len() as i32);
        frame.put_slice(&self.buf);
        frame.freeze()
    }

    pub fn encode(response: &KafkaResponse) -> Bytes {
        let mut encoder = Self::new();

        encoder.put_i32(response.correlation_id);
        if response.payload.header_version() == ResponseHeaderVersion::V1 {
            encoder.put_tag_buffer();
        }

        match &response.payload {
            ResponsePayload::ApiVersions(body) => encoder.put_api_versions(body),
            ResponsePayload::DescribeTopicPartitions(body) => encoder.put_describe_topic_partitions(body),
            ResponsePayload::Fetch(body) => encoder.put_fetch(body),
            ResponsePayload::Error { error_code, .. } => encoder.put_i16(*error_code),
        };

        let frame = encoder.finish();
        trace!(raw = %hex::encode(&frame), "response frame");
        frame
    }

    fn put_api_versions(&mut self, body: &ApiVersionsResponse) -> &mut Self {
        self.put_i16(body.error_code)
            .put_compact_array(&body.api_versions, |enc, version| {
                enc.put_i16(version.api_key)
                    .put_i16(version.min_version)
                    .put_i16(version.max_version)
                    .put_tag_buffer();
            })
            .put_i32(body.throttle_time_ms)
            .put_tag_buffer()
    }

    fn put_describe_topic_partitions(&mut self, body: &DescribeTopicPartitionsResponse) -> &mut Self {
        self.put_i32(body.throttle_time_ms)
            .put_compact_array(&body.topics, Self::put_topic)
            .put_u8(NULL_CURSOR)
            .put_tag_buffer()
    }

    fn put_topic(&mut self, topic: &TopicResponse) {
        self.put_i16(topic.error_code)
            .put_compact_string(&topic.topic_name)
            .put_bytes(topic.topic_id.as_bytes())
            .put_bool(topic.is_internal)
            .put_compact_array(&topic.partitions, Self::put_partition)
            .put_i32(topic.topic_authorized_operations)
            .put_tag_buffer();
    }

    fn put_partition(&mut self, partition: &PartitionInfo) {
        self.put_i16(partition.error_code)
            .put_i32(partition.partition_index)
            .put_i32(partition.leader_id)
            .put_i32(partition.leader_epoch)
            .put_compact_array(&partition.replica_nodes, |enc, id| {
                enc.put_i32(*id);
            })
            .put_compact_array(&partition.isr_nodes, |enc, id| {
                enc.put_i32(*id);
            })
            .put_compact_array::<i32, _>(&[], |_, _| {}) // eligible leader replicas
            .put_compact_array::<i32, _>(&[], |_, _| {}) // last known eligible leader replicas
            .put_compact_array::<i32, _>(&[], |_, _| {}) // offline replicas
            .put_tag_buffer();
    }

    fn put_fetch(&mut self, body: &FetchResponse) -> &mut Self {
        self.put_i32(body.throttle_time_ms)
            .put_i16(body.error_code)
            .put_i32(body.session_id)
            .put_compact_array(&body.responses, |enc, topic| {
                enc.put_bytes(topic.topic_id.as_bytes())
                    .put_compact_array(&topic.partitions, |enc, partition| {
                        enc.put_i32(partition.partition_index)
                            .put_i16(partition.error_code)
                            .put_i64(partition.high_watermark)
                            .put_i64(partition.last_stable_offset)
                            .put_i64(partition.log_start_offset)
                            .put_compact_array::<i32, _>(&[], |_, _| {}) // aborted transactions
                            .put_i32(-1) // preferred read replica
                            .put_compact_bytes(Some(partition.records.as_deref().unwrap_or_default()))
                            .put_tag_buffer();
                    })
                    .put_tag_buffer();
            })
            .put_tag_buffer()
    }
}
