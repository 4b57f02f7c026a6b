pub mod constants;
pub mod dto;
pub mod kraft_record_parser;
pub mod parser;
pub mod tcp_parser;

pub use kraft_record_parser::{DeltaEncoding, MetadataLogDecoder};
pub use tcp_parser::KafkaProtocolParser;
