pub mod disk_store;
pub mod kraft_metadata_store;
pub mod memory_store;

pub use disk_store::DiskSegmentStore;
pub use kraft_metadata_store::KraftMetadataStore;
pub use memory_store::MemorySegmentStore;
