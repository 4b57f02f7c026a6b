use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::adapters::protocol::constants::MAX_FRAME_SIZE;
use crate::adapters::protocol::KafkaProtocolParser;
use crate::application::ApplicationError;
use crate::ports::incoming::MessageHandler;
use crate::Result;

pub struct TcpAdapter {
    listener: TcpListener,
    message_handler: Arc<dyn MessageHandler>,
    protocol_parser: KafkaProtocolParser,
}

impl TcpAdapter {
    pub async fn new(
        addr: &str,
        message_handler: Arc<dyn MessageHandler>,
        protocol_parser: KafkaProtocolParser,
    ) -> Result<Self> {
        let listener = TcpListener::bind(addr).await.map_err(ApplicationError::Io)?;
        Ok(Self {
            listener,
            message_handler,
            protocol_parser,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections forever, one task per connection.
    pub async fn run(&self) -> Result<()> {
        info!(addr = %self.local_addr()?, "server listening");

        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let message_handler = Arc::clone(&self.message_handler);
                    let protocol_parser = self.protocol_parser.clone();

                    tokio::spawn(async move {
                        debug!(%peer, "accepted connection");
                        if let Err(e) = handle_connection(stream, message_handler, protocol_parser).await {
                            warn!(%peer, error = %e, "connection closed with error");
                        }
                    });
                }
                Err(e) => warn!(error = %e, "accept error"),
            }
        }
    }
}

/// Serves one connection until the peer closes it.
///
/// 요청은 순서대로 하나씩 처리되므로 응답 순서가 요청 순서와 같습니다.
pub async fn handle_connection<S>(
    mut stream: S,
    message_handler: Arc<dyn MessageHandler>,
    protocol_parser: KafkaProtocolParser,
) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    loop {
        // 1. 요청 크기 읽기
        let mut size_bytes = [0u8; 4];
        if let Err(e) = stream.read_exact(&mut size_bytes).await {
            if e.kind() == ErrorKind::UnexpectedEof {
                debug!("client closed connection");
                return Ok(());
            }
            return Err(ApplicationError::Io(e));
        }
        let message_size = protocol_parser.message_length(size_bytes);
        if !(0..=MAX_FRAME_SIZE).contains(&message_size) {
            return Err(ApplicationError::InvalidFrameLength(message_size));
        }

        // 2. 요청 데이터 읽기
        let mut request_data = vec![0; message_size as usize];
        stream.read_exact(&mut request_data).await.map_err(ApplicationError::Io)?;

        // 3. 프로토콜 파싱
        let request = protocol_parser.parse_request(Bytes::from(request_data))?;

        // 4. 요청 처리
        let response = message_handler.handle_request(request).await?;

        // 5. 응답 인코딩 및 전송
        let encoded = protocol_parser.encode_response(&response);
        stream.write_all(&encoded).await.map_err(ApplicationError::Io)?;
        stream.flush().await.map_err(ApplicationError::Io)?;
    }
}
