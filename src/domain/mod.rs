pub mod error;
pub mod metadata;
pub mod topic;

pub use error::{DecodeError, DecodeResult};
pub use metadata::{MetadataIndex, MetadataIndexBuilder, PartitionMetadata};
pub use topic::TopicId;
