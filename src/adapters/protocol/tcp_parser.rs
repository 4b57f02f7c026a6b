use bytes::Bytes;

use crate::adapters::protocol::dto::{KafkaRequest, KafkaResponse};
use crate::adapters::protocol::parser::{RequestParser, ResponseEncoder};
use crate::domain::error::DecodeResult;

/// Frame-level codec used by the transport: request frames in, response frames out.
#[derive(Debug, Default, Clone)]
pub struct KafkaProtocolParser {
    request_parser: RequestParser,
}

impl KafkaProtocolParser {
    pub fn new() -> Self {
        Self {
            request_parser: RequestParser::new(),
        }
    }

    pub fn message_length(&self, prefix: [u8; 4]) -> i32 {
        RequestParser::message_length(prefix)
    }

    pub fn parse_request(&self, data: Bytes) -> DecodeResult<KafkaRequest> {
        self.request_parser.parse(data)
    }

    pub fn request_parser(&self) -> &RequestParser {
        &self.request_parser
    }

    pub fn encode_response(&self, response: &KafkaResponse) -> Bytes {
        ResponseEncoder::encode(response)
    }
}
