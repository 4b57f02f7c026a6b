//! Byte-exact cluster metadata log fixtures for tests.
//!
//! Kept free of crate imports so integration tests can pull it in with `#[path]`.
#![allow(dead_code)]

use bytes::Bytes;

pub fn put_uvarint(buf: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        buf.push((value as u8) | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

pub fn put_varint(buf: &mut Vec<u8>, value: i64) {
    put_uvarint(buf, ((value << 1) ^ (value >> 63)) as u64);
}

fn put_compact_str(buf: &mut Vec<u8>, value: &str) {
    put_uvarint(buf, value.len() as u64 + 1);
    buf.extend_from_slice(value.as_bytes());
}

fn put_compact_i32s(buf: &mut Vec<u8>, values: &[i32]) {
    put_uvarint(buf, values.len() as u64 + 1);
    for value in values {
        buf.extend_from_slice(&value.to_be_bytes());
    }
}

/// Value blob of a topic record (type 2).
pub fn topic_value(name: &str, topic_id: [u8; 16]) -> Vec<u8> {
    let mut buf = vec![1, 2, 0]; // frame version, type, version
    put_compact_str(&mut buf, name);
    buf.extend_from_slice(&topic_id);
    buf.push(0); // tags
    buf
}

/// Value blob of a partition record (type 3) with one log directory.
pub fn partition_value(partition_id: i32, topic_id: [u8; 16], leader_id: i32, replicas: &[i32]) -> Vec<u8> {
    let mut buf = vec![1, 3, 1];
    buf.extend_from_slice(&partition_id.to_be_bytes());
    buf.extend_from_slice(&topic_id);
    put_compact_i32s(&mut buf, replicas); // replicas
    put_compact_i32s(&mut buf, replicas); // in-sync replicas
    put_compact_i32s(&mut buf, &[]); // removing
    put_compact_i32s(&mut buf, &[]); // adding
    buf.extend_from_slice(&leader_id.to_be_bytes());
    buf.extend_from_slice(&0i32.to_be_bytes()); // leader epoch
    buf.extend_from_slice(&0i32.to_be_bytes()); // partition epoch
    put_uvarint(&mut buf, 2);
    buf.extend_from_slice(&[0x10; 16]);
    buf.push(0);
    buf
}

/// Value blob of a feature level record (type 12).
pub fn feature_level_value(name: &str, level: u16) -> Vec<u8> {
    let mut buf = vec![1, 12, 0];
    put_compact_str(&mut buf, name);
    buf.extend_from_slice(&level.to_be_bytes());
    buf.push(0);
    buf
}

/// One record with fixed single-byte deltas, a null key and no headers.
pub fn record(offset_delta: u8, value: &[u8]) -> Vec<u8> {
    let mut body = vec![0, 0, offset_delta]; // attributes, timestamp delta, offset delta
    put_varint(&mut body, -1); // null key
    put_varint(&mut body, value.len() as i64);
    body.extend_from_slice(value);
    body.push(0); // header count

    let mut buf = Vec::new();
    put_varint(&mut buf, body.len() as i64);
    buf.extend_from_slice(&body);
    buf
}

/// A full record batch holding one record per value.
pub fn batch(base_offset: i64, values: &[Vec<u8>]) -> Vec<u8> {
    let records: Vec<Vec<u8>> = values
        .iter()
        .enumerate()
        .map(|(delta, value)| record(delta as u8, value))
        .collect();
    batch_of_records(base_offset, values.len().saturating_sub(1) as i32, &records)
}

pub fn batch_of_records(base_offset: i64, last_offset_delta: i32, records: &[Vec<u8>]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&0i32.to_be_bytes()); // partition leader epoch
    body.push(2); // magic
    body.extend_from_slice(&0i32.to_be_bytes()); // crc
    body.extend_from_slice(&0i16.to_be_bytes()); // attributes
    body.extend_from_slice(&last_offset_delta.to_be_bytes());
    body.extend_from_slice(&1_726_045_943_832i64.to_be_bytes()); // base timestamp
    body.extend_from_slice(&1_726_045_943_832i64.to_be_bytes()); // max timestamp
    body.extend_from_slice(&(-1i64).to_be_bytes()); // producer id
    body.extend_from_slice(&(-1i16).to_be_bytes()); // producer epoch
    body.extend_from_slice(&(-1i32).to_be_bytes()); // base sequence
    body.extend_from_slice(&(records.len() as i32).to_be_bytes());
    for record in records {
        body.extend_from_slice(record);
    }

    let mut buf = Vec::new();
    buf.extend_from_slice(&base_offset.to_be_bytes());
    buf.extend_from_slice(&(body.len() as i32).to_be_bytes());
    buf.extend_from_slice(&body);
    buf
}

/// Concatenates batches into a segment, assigning consecutive base offsets.
#[derive(Debug, Default)]
pub struct LogBuilder {
    buf: Vec<u8>,
    next_offset: i64,
}

impl LogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batch(mut self, values: Vec<Vec<u8>>) -> Self {
        self.buf.extend_from_slice(&batch(self.next_offset, &values));
        self.next_offset += values.len().max(1) as i64;
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.buf.clone()
    }

    pub fn build(self) -> Bytes {
        Bytes::from(self.buf)
    }
}
