pub mod segment_store;

pub use segment_store::SegmentStore;
