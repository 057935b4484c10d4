//! WebSocket transport
//!
//! Opens the socket and performs the Hello half of the handshake.

use crate::error::{GatewayError, GatewayResult};
use crate::protocol::{GatewayMessage, HelloPayload};
use futures_util::StreamExt;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

/// WebSocket stream to the gateway
pub type GatewaySocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long to wait for Hello after the socket opens
pub const HELLO_TIMEOUT: Duration = Duration::from_secs(10);

/// Connect to the gateway and wait for its Hello
pub async fn connect(url: &str) -> GatewayResult<(GatewaySocket, HelloPayload)> {
    tracing::debug!(url, "Connecting to gateway");

    let (mut socket, _response) = tokio_tungstenite::connect_async(url).await?;

    let hello = tokio::time::timeout(HELLO_TIMEOUT, read_hello(&mut socket))
        .await
        .map_err(|_| GatewayError::Handshake("no Hello received".to_string()))??;

    tracing::debug!(
        heartbeat_interval = hello.heartbeat_interval,
        "Received Hello"
    );

    Ok((socket, hello))
}

async fn read_hello(socket: &mut GatewaySocket) -> GatewayResult<HelloPayload> {
    while let Some(frame) = socket.next().await {
        match frame? {
            Message::Text(text) => {
                let message = GatewayMessage::from_json(&text)?;
                return message.as_hello().ok_or_else(|| {
                    GatewayError::Handshake(format!("expected Hello, got {message}"))
                });
            }
            Message::Close(frame) => {
                return Err(match frame {
                    Some(frame) => GatewayError::from_close(frame.code.into(), &frame.reason),
                    None => GatewayError::Handshake("closed before Hello".to_string()),
                });
            }
            // Control frames are answered by tungstenite
            _ => {}
        }
    }

    Err(GatewayError::Handshake("closed before Hello".to_string()))
}
