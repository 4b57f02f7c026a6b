use bytes::Bytes;
use tracing::trace;

use super::base_parser::BufferCursor;
use super::traits::*;
use crate::adapters::protocol::dto::{
    DescribeCursor, DescribeTopicPartitionsRequest, FetchPartition, FetchRequest, FetchTopic,
    ForgottenTopic, KafkaRequest, RequestHeader, TopicRequest,
};
use crate::domain::error::{DecodeError, DecodeResult};
use crate::domain::TopicId;

#[derive(Debug, Default, Clone)]
pub struct RequestParser;

impl RequestParser {
    pub fn new() -> Self {
        Self
    }

    /// Declared size of the message that follows the 4-byte prefix.
    pub fn message_length(prefix: [u8; 4]) -> i32 {
        i32::from_be_bytes(prefix)
    }

    /// Splits a framed message (without its length prefix) into header and body.
    pub fn parse(&self, data: Bytes) -> DecodeResult<KafkaRequest> {
        trace!(raw = %hex::encode(&data), "request frame");
        let (header, body_offset) = self.parse_header(data.clone())?;
        Ok(KafkaRequest::new(header, data.slice(body_offset..)))
    }

    /// Decodes the request header and returns it with the offset where the body begins.
    pub fn parse_header(&self, data: Bytes) -> DecodeResult<(RequestHeader, usize)> {
        let mut cursor = BufferCursor::new(data);

        let api_key = cursor.read_i16()?;
        let api_version = cursor.read_i16()?;
        let correlation_id = cursor.read_i32()?;
        let client_id = Self::read_client_id(&mut cursor)?;
        cursor.read_tag_buffer()?;

        Ok((
            RequestHeader {
                api_key,
                api_version,
                correlation_id,
                client_id,
            },
            cursor.position(),
        ))
    }

    // classic nullable string: i16 length, -1 (or 0) means absent
    fn read_client_id(cursor: &mut BufferCursor) -> DecodeResult<Option<String>> {
        let len = cursor.read_i16()?;
        match len {
            -1 | 0 => Ok(None),
            len if len < 0 => Err(DecodeError::InvalidLength(len as i64)),
            len => {
                let bytes = cursor.read_fixed(len as usize)?;
                String::from_utf8(bytes.to_vec())
                    .map(Some)
                    .map_err(|_| DecodeError::InvalidUtf8)
            }
        }
    }

    pub fn parse_describe_topic_partitions(
        &self,
        body: Bytes,
    ) -> DecodeResult<DescribeTopicPartitionsRequest> {
        let mut cursor = BufferCursor::new(body);

        let topics = cursor.read_compact_array(|c| {
            let topic_name = c.read_compact_string()?;
            c.read_tag_buffer()?;
            Ok(TopicRequest { topic_name })
        })?;
        let response_partition_limit = cursor.read_i32()?;
        let cursor_field = Self::read_describe_cursor(&mut cursor)?;
        cursor.read_tag_buffer()?;

        Ok(DescribeTopicPartitionsRequest {
            topics,
            response_partition_limit,
            cursor: cursor_field,
        })
    }

    fn read_describe_cursor(cursor: &mut BufferCursor) -> DecodeResult<Option<DescribeCursor>> {
        if cursor.rest().first() == Some(&0xff) {
            cursor.skip(1)?;
            return Ok(None);
        }
        let topic_name = cursor.read_compact_string()?;
        let partition_index = cursor.read_i32()?;
        cursor.read_tag_buffer()?;
        Ok(Some(DescribeCursor {
            topic_name,
            partition_index,
        }))
    }

    /// Decodes the topic-id based Fetch body (v13 and later).
    pub fn parse_fetch(&self, body: Bytes) -> DecodeResult<FetchRequest> {
        let mut cursor = BufferCursor::new(body);

        let max_wait_ms = cursor.read_i32()?;
        let min_bytes = cursor.read_i32()?;
        let max_bytes = cursor.read_i32()?;
        let isolation_level = cursor.read_i8()?;
        let session_id = cursor.read_i32()?;
        let session_epoch = cursor.read_i32()?;

        let topics = cursor.read_compact_array(|c| {
            let topic_id = TopicId::from(c.read_uuid()?);
            let partitions = c.read_compact_array(Self::read_fetch_partition)?;
            c.read_tag_buffer()?;
            Ok(FetchTopic {
                topic_id,
                partitions,
            })
        })?;

        let forgotten_topics = cursor.read_compact_array(|c| {
            let topic_id = TopicId::from(c.read_uuid()?);
            let partitions = c.read_compact_array(|c| c.read_i32())?;
            c.read_tag_buffer()?;
            Ok(ForgottenTopic {
                topic_id,
                partitions,
            })
        })?;
        let rack_id = cursor.read_compact_string()?;
        cursor.read_tag_buffer()?;

        Ok(FetchRequest {
            max_wait_ms,
            min_bytes,
            max_bytes,
            isolation_level,
            session_id,
            session_epoch,
            topics,
            forgotten_topics,
            rack_id,
        })
    }

    fn read_fetch_partition(c: &mut BufferCursor) -> DecodeResult<FetchPartition> {
        let partition = FetchPartition {
            partition: c.read_i32()?,
            current_leader_epoch: c.read_i32()?,
            fetch_offset: c.read_i64()?,
            last_fetched_epoch: c.read_i32()?,
            log_start_offset: c.read_i64()?,
            partition_max_bytes: c.read_i32()?,
        };
        c.read_tag_buffer()?;
        Ok(partition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::protocol::dto::ApiKey;

    fn header_bytes(api_key: ApiKey, api_version: i16, client_id: Option<&str>) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&i16::from(api_key).to_be_bytes());
        data.extend_from_slice(&api_version.to_be_bytes());
        data.extend_from_slice(&123i32.to_be_bytes());
        match client_id {
            Some(id) => {
                data.extend_from_slice(&(id.len() as i16).to_be_bytes());
                data.extend_from_slice(id.as_bytes());
            }
            None => data.extend_from_slice(&(-1i16).to_be_bytes()),
        }
        data.push(0); // tag buffer
        data
    }

    fn describe_body(names: &[&str]) -> Vec<u8> {
        let mut data = vec![(names.len() + 1) as u8];
        for name in names {
            data.push((name.len() + 1) as u8);
            data.extend_from_slice(name.as_bytes());
            data.push(0); // tag buffer
        }
        data.extend_from_slice(&100i32.to_be_bytes()); // response partition limit
        data.push(0xff); // null cursor
        data.push(0); // tag buffer
        data
    }

    #[test]
    fn test_message_length() {
        assert_eq!(RequestParser::message_length([0, 0, 0, 35]), 35);
        assert_eq!(RequestParser::message_length([0xff, 0xff, 0xff, 0xff]), -1);
    }

    #[test]
    fn test_parse_api_versions_header() {
        let data = header_bytes(ApiKey::ApiVersions, 4, Some("kafka-cli"));
        let (header, offset) = RequestParser::new().parse_header(Bytes::from(data.clone())).unwrap();

        assert_eq!(header.api_key, 18);
        assert_eq!(header.api_version, 4);
        assert_eq!(header.correlation_id, 123);
        assert_eq!(header.client_id.as_deref(), Some("kafka-cli"));
        assert_eq!(offset, data.len());
    }

    #[test]
    fn test_parse_header_zero_length_client_id_is_absent() {
        let mut data = header_bytes(ApiKey::ApiVersions, 0, Some(""));
        data.extend_from_slice(&[0xaa, 0xbb]);
        let request = RequestParser::new().parse(Bytes::from(data)).unwrap();

        assert_eq!(request.header.client_id, None);
        assert_eq!(request.body.as_ref(), &[0xaa, 0xbb]);
    }

    #[test]
    fn test_parse_header_does_not_judge_version() {
        let data = header_bytes(ApiKey::ApiVersions, 99, None);
        let (header, _) = RequestParser::new().parse_header(Bytes::from(data)).unwrap();
        assert_eq!(header.api_version, 99);
    }

    #[test]
    fn test_truncated_header_fails() {
        let data = header_bytes(ApiKey::DescribeTopicPartitions, 0, Some("client"));
        for cut in 1..=data.len() {
            let truncated = Bytes::copy_from_slice(&data[..data.len() - cut]);
            assert!(
                RequestParser::new().parse_header(truncated).is_err(),
                "truncated by {cut} bytes should fail"
            );
        }
    }

    #[test]
    fn test_parse_describe_topic_partitions_body() {
        let body = describe_body(&["foo", "bar"]);
        let request = RequestParser::new()
            .parse_describe_topic_partitions(Bytes::from(body))
            .unwrap();

        let names: Vec<&str> = request.topics.iter().map(|t| t.topic_name.as_str()).collect();
        assert_eq!(names, vec!["foo", "bar"]);
        assert_eq!(request.response_partition_limit, 100);
        assert_eq!(request.cursor, None);
    }

    #[test]
    fn test_parse_describe_with_cursor() {
        let mut body = vec![1]; // no topics
        body.extend_from_slice(&10i32.to_be_bytes());
        body.push(4);
        body.extend_from_slice(b"foo");
        body.extend_from_slice(&2i32.to_be_bytes());
        body.push(0); // cursor tag buffer
        body.push(0); // tag buffer

        let request = RequestParser::new()
            .parse_describe_topic_partitions(Bytes::from(body))
            .unwrap();
        assert!(request.topics.is_empty());
        assert_eq!(
            request.cursor,
            Some(DescribeCursor {
                topic_name: "foo".to_string(),
                partition_index: 2,
            })
        );
    }

    #[test]
    fn test_truncated_describe_body_fails() {
        let body = describe_body(&["foo"]);
        let truncated = Bytes::copy_from_slice(&body[..body.len() - 1]);
        assert!(RequestParser::new().parse_describe_topic_partitions(truncated).is_err());
    }

    #[test]
    fn test_parse_fetch_body() {
        let topic_id = [0x11u8; 16];
        let mut body = Vec::new();
        body.extend_from_slice(&500i32.to_be_bytes()); // max wait
        body.extend_from_slice(&1i32.to_be_bytes()); // min bytes
        body.extend_from_slice(&(1024 * 1024i32).to_be_bytes()); // max bytes
        body.push(0); // isolation level
        body.extend_from_slice(&0i32.to_be_bytes()); // session id
        body.extend_from_slice(&(-1i32).to_be_bytes()); // session epoch
        body.push(2); // one topic
        body.extend_from_slice(&topic_id);
        body.push(2); // one partition
        body.extend_from_slice(&0i32.to_be_bytes());
        body.extend_from_slice(&(-1i32).to_be_bytes());
        body.extend_from_slice(&7i64.to_be_bytes());
        body.extend_from_slice(&(-1i32).to_be_bytes());
        body.extend_from_slice(&(-1i64).to_be_bytes());
        body.extend_from_slice(&4096i32.to_be_bytes());
        body.push(0); // partition tags
        body.push(0); // topic tags
        body.push(1); // no forgotten topics
        body.push(1); // empty rack id
        body.push(0); // tags

        let request = RequestParser::new().parse_fetch(Bytes::from(body)).unwrap();
        assert_eq!(request.max_wait_ms, 500);
        assert_eq!(request.session_epoch, -1);
        assert_eq!(request.topics.len(), 1);
        assert_eq!(request.topics[0].topic_id, TopicId::new(topic_id));
        assert_eq!(request.topics[0].partitions[0].fetch_offset, 7);
        assert_eq!(request.topics[0].partitions[0].partition_max_bytes, 4096);
        assert!(request.forgotten_topics.is_empty());
        assert_eq!(request.rack_id, "");
    }
}
