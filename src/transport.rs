use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use log::debug;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tungstenite::Message;

use crate::endpoint::Endpoint;
use crate::error::{HarnessError, Result};

/// Opens connections to an endpoint. Connection setup is the only operation here,
/// frame exchange lives on [`Connection`].
#[async_trait]
pub trait Transport: Send + Sync {
    type Conn: Connection;

    async fn connect(&self, endpoint: &Endpoint) -> Result<Self::Conn>;
}

/// One live, frame-oriented connection. Implementations do not bound their own waits,
/// the session layer wraps every call in its timeout.
#[async_trait]
pub trait Connection: Send {
    async fn send_text(&mut self, text: String) -> Result<()>;

    async fn recv_text(&mut self) -> Result<String>;

    async fn close(&mut self) -> Result<()>;
}

#[derive(Clone, Debug, Default)]
pub struct WsTransport;

impl WsTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for WsTransport {
    type Conn = WsConnection;

    async fn connect(&self, endpoint: &Endpoint) -> Result<WsConnection> {
        let (stream, response) = connect_async(endpoint.url())
            .await
            .map_err(|e| HarnessError::Connect(format!("{}: {}", endpoint, e)))?;

        debug!("Connected to {} ({})", endpoint, response.status());

        Ok(WsConnection { stream })
    }
}

pub struct WsConnection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl Connection for WsConnection {
    async fn send_text(&mut self, text: String) -> Result<()> {
        self.stream
            .send(Message::Text(text))
            .await
            .map_err(|e| HarnessError::Transport(e.to_string()))
    }

    async fn recv_text(&mut self) -> Result<String> {
        while let Some(msg) = self.stream.next().await {
            match msg.map_err(|e| HarnessError::Transport(e.to_string()))? {
                Message::Text(text) => return Ok(text),
                Message::Binary(data) => return Ok(String::from_utf8_lossy(&data).into_owned()),
                Message::Close(frame) => {
                    return Err(HarnessError::Transport(format!(
                        "Connection closed by peer: {:?}",
                        frame
                    )));
                }
                // Pings are answered by tungstenite on the next write or flush
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
            }
        }

        Err(HarnessError::Transport("Connection stream ended".to_string()))
    }

    async fn close(&mut self) -> Result<()> {
        match self.stream.close(None).await {
            Ok(()) | Err(tungstenite::Error::ConnectionClosed) => Ok(()),
            Err(e) => Err(HarnessError::Transport(e.to_string())),
        }
    }
}
