use std::collections::HashMap;

use uuid::Uuid;

use super::topic::TopicId;

/// A partition as declared by a partition record in the cluster metadata log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionMetadata {
    pub partition_index: i32,
    pub topic_id: TopicId,
    pub leader_id: i32,
    pub leader_epoch: i32,
    pub partition_epoch: i32,
    pub replicas: Vec<i32>,
    pub in_sync_replicas: Vec<i32>,
    pub directories: Vec<Uuid>,
}

/// Read-only topic/partition lookup derived from one full decode of the
/// cluster metadata log.
///
/// Partitions are keyed by topic id only, so a partition record that appears
/// before its topic record still joins the topic once both were decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataIndex {
    topics: HashMap<String, TopicId>,
    names: HashMap<TopicId, String>,
    partitions: HashMap<TopicId, Vec<PartitionMetadata>>,
}

impl MetadataIndex {
    pub fn builder() -> MetadataIndexBuilder {
        MetadataIndexBuilder::default()
    }

    pub fn resolve_topic(&self, name: &str) -> Option<TopicId> {
        self.topics.get(name).copied()
    }

    pub fn topic_name(&self, topic_id: &TopicId) -> Option<&str> {
        self.names.get(topic_id).map(String::as_str)
    }

    /// Partitions of a topic in log order; empty for unknown ids.
    pub fn partitions_of(&self, topic_id: &TopicId) -> &[PartitionMetadata] {
        self.partitions
            .get(topic_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Default)]
pub struct MetadataIndexBuilder {
    index: MetadataIndex,
}

impl MetadataIndexBuilder {
    pub fn topic(&mut self, name: impl Into<String>, topic_id: TopicId) -> &mut Self {
        let name = name.into();
        if let Some(previous) = self.index.topics.insert(name.clone(), topic_id) {
            if previous != topic_id {
                self.index.names.remove(&previous);
            }
        }
        self.index.names.insert(topic_id, name);
        self
    }

    pub fn partition(&mut self, partition: PartitionMetadata) -> &mut Self {
        self.index
            .partitions
            .entry(partition.topic_id)
            .or_default()
            .push(partition);
        self
    }

    pub fn build(self) -> MetadataIndex {
        self.index
    }
}
