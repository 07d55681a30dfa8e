#![forbid(unsafe_code)]

// Realtime channel client over tokio-tungstenite

use super::protocol::RealtimeMessage;
use super::types::RealtimeError;
use super::{RealtimeConnection, RealtimeConnector};
use async_trait::async_trait;
use futures_util::SinkExt;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::debug;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connects to a fixed realtime endpoint, bounding each step by `timeout`.
#[derive(Debug, Clone)]
pub struct WsConnector {
    url: String,
    timeout: Duration,
}

impl WsConnector {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// An open WebSocket. Only the write half is ever used.
pub struct WsConnection {
    stream: WsStream,
    timeout: Duration,
}

#[async_trait]
impl RealtimeConnector for WsConnector {
    type Connection = WsConnection;

    async fn connect(&self) -> Result<WsConnection, RealtimeError> {
        let (stream, _) = timeout(self.timeout, connect_async(self.url.as_str()))
            .await
            .map_err(|_| RealtimeError::ConnectTimeout(self.timeout))?
            .map_err(|e| RealtimeError::Connect(e.to_string()))?;

        debug!("WebSocket connected to {}", self.url());

        Ok(WsConnection {
            stream,
            timeout: self.timeout,
        })
    }
}

#[async_trait]
impl RealtimeConnection for WsConnection {
    async fn send(&mut self, message: &RealtimeMessage) -> Result<(), RealtimeError> {
        let json = serde_json::to_string(message)?;
        timeout(self.timeout, self.stream.send(Message::Text(json.into())))
            .await
            .map_err(|_| RealtimeError::SendTimeout(self.timeout))?
            .map_err(|e| RealtimeError::Send(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), RealtimeError> {
        timeout(self.timeout, self.stream.close(None))
            .await
            .map_err(|_| RealtimeError::Close("timed out".to_string()))?
            .map_err(|e| RealtimeError::Close(e.to_string()))
    }
}
