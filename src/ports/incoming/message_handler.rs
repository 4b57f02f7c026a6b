use async_trait::async_trait;

use crate::adapters::protocol::dto::{KafkaRequest, KafkaResponse};
use crate::Result;

/// Turns one decoded request into its response.
///
/// An `Err` means the connection must be closed; protocol-level failures such
/// as unsupported versions are answered with an error code instead.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle_request(&self, request: KafkaRequest) -> Result<KafkaResponse>;
}
