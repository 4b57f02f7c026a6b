pub mod base_parser;
pub mod request_parser;
pub mod response_encoder;
pub mod traits;
pub mod varint;

pub use base_parser::BufferCursor;
pub use request_parser::RequestParser;
pub use response_encoder::ResponseEncoder;
pub use traits::*;
