use bytes::Bytes;
use tracing::debug;

use crate::adapters::protocol::dto::kraft::{
    FeatureLevelRecordValue, PartitionRecordValue, Record, RecordBatch, RecordValue,
    TopicRecordValue,
};
use crate::adapters::protocol::parser::{
    BufferCursor, ByteParser, CompactParser, PrimitiveParser, VarIntParser,
};
use crate::domain::error::{DecodeError, DecodeResult};
use crate::domain::{MetadataIndex, PartitionMetadata, TopicId};

/// base offset (8) + batch length (4)
const BATCH_HEADER_LEN: usize = 12;
/// partition leader epoch (4) + magic (1) + crc (4) + attributes (2)
const LAST_OFFSET_DELTA_POS: usize = 11;
const METADATA_FRAME_VERSION: u8 = 1;

const TOPIC_RECORD: u8 = 2;
const PARTITION_RECORD: u8 = 3;
const FEATURE_LEVEL_RECORD: u8 = 12;

/// How the timestamp and offset deltas of a record are stored.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DeltaEncoding {
    /// 1 byte each.
    #[default]
    FixedByte,
    /// Zig-zag varints.
    Varint,
}

/// Decoder for cluster metadata log segments.
///
/// 세그먼트 전체를 한 번에 읽어 배치 목록으로 변환합니다. 레코드 경계는
/// 항상 선언된 길이로 재동기화합니다.
#[derive(Debug, Default, Clone)]
pub struct MetadataLogDecoder {
    delta_encoding: DeltaEncoding,
}

impl MetadataLogDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delta_encoding(delta_encoding: DeltaEncoding) -> Self {
        Self { delta_encoding }
    }

    /// Decodes every batch of the segment in log order. Fewer than 12
    /// trailing bytes end the segment; anything else malformed fails the
    /// whole decode.
    pub fn decode(&self, data: Bytes) -> DecodeResult<Vec<RecordBatch>> {
        let mut cursor = BufferCursor::new(data);
        let mut batches = Vec::new();

        while cursor.remaining() >= BATCH_HEADER_LEN {
            let base_offset = cursor.read_i64()?;
            let batch_length = cursor.read_i32()?;
            if batch_length < 0 {
                return Err(DecodeError::InvalidLength(batch_length as i64));
            }
            let body = cursor.read_fixed(batch_length as usize)?;
            let batch = self.decode_batch(base_offset, batch_length, body)?;
            debug!(
                base_offset,
                records = batch.records.len(),
                "decoded metadata batch"
            );
            batches.push(batch);
        }

        Ok(batches)
    }

    /// Decodes the segment and indexes its topic and partition records.
    pub fn decode_index(&self, data: Bytes) -> DecodeResult<MetadataIndex> {
        Ok(Self::build_index(&self.decode(data)?))
    }

    pub fn build_index(batches: &[RecordBatch]) -> MetadataIndex {
        let mut builder = MetadataIndex::builder();
        for record in batches.iter().flat_map(|batch| &batch.records) {
            match &record.value {
                RecordValue::Topic(topic) => {
                    builder.topic(topic.topic_name.clone(), topic.topic_id);
                }
                RecordValue::Partition(partition) => {
                    builder.partition(PartitionMetadata {
                        partition_index: partition.partition_id,
                        topic_id: partition.topic_id,
                        leader_id: partition.leader_id,
                        leader_epoch: partition.leader_epoch,
                        partition_epoch: partition.partition_epoch,
                        replicas: partition.replicas.clone(),
                        in_sync_replicas: partition.in_sync_replicas.clone(),
                        directories: partition.directories.clone(),
                    });
                }
                RecordValue::FeatureLevel(_) | RecordValue::Unsupported { .. } => {}
            }
        }
        builder.build()
    }

    /// Offset after the last record of the segment, read from batch headers
    /// only. An empty segment yields 0.
    pub fn high_watermark(data: Bytes) -> DecodeResult<i64> {
        let mut cursor = BufferCursor::new(data);
        let mut high_watermark = 0;

        while cursor.remaining() >= BATCH_HEADER_LEN {
            let base_offset = cursor.read_i64()?;
            let batch_length = cursor.read_i32()?;
            if batch_length < 0 {
                return Err(DecodeError::InvalidLength(batch_length as i64));
            }
            let mut body = BufferCursor::new(cursor.read_fixed(batch_length as usize)?);
            body.skip(LAST_OFFSET_DELTA_POS)?;
            let last_offset_delta = body.read_i32()?;
            let next_offset = base_offset
                .checked_add(last_offset_delta as i64 + 1)
                .ok_or(DecodeError::InvalidLength(base_offset))?;
            high_watermark = high_watermark.max(next_offset);
        }

        Ok(high_watermark)
    }

    fn decode_batch(&self, base_offset: i64, batch_length: i32, body: Bytes) -> DecodeResult<RecordBatch> {
        let mut cursor = BufferCursor::new(body);

        let partition_leader_epoch = cursor.read_i32()?;
        let magic = cursor.read_i8()?;
        let crc = cursor.read_i32()?;
        let attributes = cursor.read_i16()?;
        let last_offset_delta = cursor.read_i32()?;
        let base_timestamp = cursor.read_i64()?;
        let max_timestamp = cursor.read_i64()?;
        let producer_id = cursor.read_i64()?;
        let producer_epoch = cursor.read_i16()?;
        let base_sequence = cursor.read_i32()?;
        let record_count = cursor.read_i32()?;
        if record_count < 0 {
            return Err(DecodeError::InvalidLength(record_count as i64));
        }

        let mut records = Vec::with_capacity((record_count as usize).min(cursor.remaining()));
        for _ in 0..record_count {
            records.push(self.decode_record(&mut cursor)?);
        }

        Ok(RecordBatch {
            base_offset,
            batch_length,
            partition_leader_epoch,
            magic,
            crc,
            attributes,
            last_offset_delta,
            base_timestamp,
            max_timestamp,
            producer_id,
            producer_epoch,
            base_sequence,
            records,
        })
    }

    fn decode_record(&self, cursor: &mut BufferCursor) -> DecodeResult<Record> {
        let length = cursor.read_signed_varint()?;
        if length < 0 {
            return Err(DecodeError::InvalidLength(length));
        }
        let body_start = cursor.position();

        let attributes = cursor.read_i8()?;
        let timestamp_delta = self.read_delta(cursor)?;
        let offset_delta = self.read_delta(cursor)?;

        let key = match cursor.read_signed_varint()? {
            -1 => None,
            len if len < 0 => return Err(DecodeError::InvalidLength(len)),
            len => Some(cursor.read_fixed(len as usize)?),
        };

        let value_length = cursor.read_signed_varint()?;
        if value_length < 0 {
            return Err(DecodeError::InvalidLength(value_length));
        }
        let value = Self::decode_value(cursor.read_fixed(value_length as usize)?)?;

        // header count and anything else left in the record is skipped
        cursor.seek(body_start + length as usize)?;

        Ok(Record {
            length,
            attributes,
            timestamp_delta,
            offset_delta,
            key,
            value,
        })
    }

    fn read_delta(&self, cursor: &mut BufferCursor) -> DecodeResult<i64> {
        match self.delta_encoding {
            DeltaEncoding::FixedByte => Ok(cursor.read_u8()? as i64),
            DeltaEncoding::Varint => cursor.read_signed_varint(),
        }
    }

    fn decode_value(payload: Bytes) -> DecodeResult<RecordValue> {
        let mut cursor = BufferCursor::new(payload);

        let frame_version = cursor.read_u8()?;
        let record_type = cursor.read_u8()?;
        if frame_version != METADATA_FRAME_VERSION {
            debug!(frame_version, record_type, "unknown frame version, value kept uninterpreted");
            return Ok(RecordValue::Unsupported {
                frame_version,
                record_type,
                payload: cursor.rest(),
            });
        }

        let value = match record_type {
            TOPIC_RECORD => RecordValue::Topic(Self::decode_topic(&mut cursor)?),
            PARTITION_RECORD => RecordValue::Partition(Self::decode_partition(&mut cursor)?),
            FEATURE_LEVEL_RECORD => RecordValue::FeatureLevel(Self::decode_feature_level(&mut cursor)?),
            _ => RecordValue::Unsupported {
                frame_version,
                record_type,
                payload: cursor.rest(),
            },
        };
        Ok(value)
    }

    fn decode_topic(cursor: &mut BufferCursor) -> DecodeResult<TopicRecordValue> {
        let version = cursor.read_u8()?;
        let topic_name = cursor.read_compact_string()?;
        let topic_id = TopicId::from(cursor.read_uuid()?);
        cursor.read_tag_buffer()?;

        Ok(TopicRecordValue {
            version,
            topic_name,
            topic_id,
        })
    }

    fn decode_partition(cursor: &mut BufferCursor) -> DecodeResult<PartitionRecordValue> {
        let version = cursor.read_u8()?;
        let partition_id = cursor.read_i32()?;
        let topic_id = TopicId::from(cursor.read_uuid()?);
        let replicas = cursor.read_compact_array(|c| c.read_i32())?;
        let in_sync_replicas = cursor.read_compact_array(|c| c.read_i32())?;
        let removing_replicas = cursor.read_compact_array(|c| c.read_i32())?;
        let adding_replicas = cursor.read_compact_array(|c| c.read_i32())?;
        let leader_id = cursor.read_i32()?;
        let leader_epoch = cursor.read_i32()?;
        let partition_epoch = cursor.read_i32()?;
        // v0 partition records carry no directories
        let directories = if version >= 1 {
            cursor.read_compact_array(|c| c.read_uuid())?
        } else {
            Vec::new()
        };
        cursor.read_tag_buffer()?;

        Ok(PartitionRecordValue {
            version,
            partition_id,
            topic_id,
            replicas,
            in_sync_replicas,
            removing_replicas,
            adding_replicas,
            leader_id,
            leader_epoch,
            partition_epoch,
            directories,
        })
    }

    fn decode_feature_level(cursor: &mut BufferCursor) -> DecodeResult<FeatureLevelRecordValue> {
        let version = cursor.read_u8()?;
        let name = cursor.read_compact_string()?;
        let level = cursor.read_u16()?;
        cursor.read_tag_buffer()?;

        Ok(FeatureLevelRecordValue {
            version,
            name,
            level,
        })
    }
}
