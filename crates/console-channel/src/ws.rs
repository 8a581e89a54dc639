//! WebSocket transport for the push channel.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, warn};

use crate::{ChannelError, PushChannel, Subscription, SUBSCRIPTION_BUFFER};

/// Authentication frame sent immediately after the socket opens.
#[derive(Debug, Serialize)]
struct ConnectFrame<'a> {
    connect: ConnectParams<'a>,
}

#[derive(Debug, Serialize)]
struct ConnectParams<'a> {
    token: &'a str,
}

/// Topic subscription frame sent after authentication.
#[derive(Debug, Serialize)]
struct SubscribeFrame<'a> {
    subscribe: SubscribeParams<'a>,
}

#[derive(Debug, Serialize)]
struct SubscribeParams<'a> {
    topic: &'a str,
}

/// Push channel over a WebSocket connection.
pub struct WebSocketChannel {
    ws_url: String,
}

impl WebSocketChannel {
    #[must_use]
    pub fn new(ws_url: impl Into<String>) -> Self {
        Self {
            ws_url: ws_url.into(),
        }
    }
}

#[async_trait]
impl PushChannel for WebSocketChannel {
    async fn connect(&self, token: &str, topic: &str) -> Result<Subscription, ChannelError> {
        let (ws_stream, _) = connect_async(&self.ws_url)
            .await
            .map_err(|e| ChannelError::Connect(e.to_string()))?;

        let (mut write, mut read) = ws_stream.split();

        let connect_frame = serde_json::to_string(&ConnectFrame {
            connect: ConnectParams { token },
        })
        .map_err(|e| ChannelError::Connect(e.to_string()))?;
        write
            .send(Message::Text(connect_frame.into()))
            .await
            .map_err(|e| ChannelError::Connect(e.to_string()))?;

        let subscribe_frame = serde_json::to_string(&SubscribeFrame {
            subscribe: SubscribeParams { topic },
        })
        .map_err(|e| ChannelError::Subscribe(e.to_string()))?;
        write
            .send(Message::Text(subscribe_frame.into()))
            .await
            .map_err(|e| ChannelError::Subscribe(e.to_string()))?;

        debug!(%topic, "push subscription established");

        let (event_tx, event_rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
        tokio::spawn(async move {
            while let Some(message) = read.next().await {
                match message {
                    Ok(Message::Text(text)) => match serde_json::from_str::<Value>(&text) {
                        Ok(event) => {
                            if event_tx.send(event).await.is_err() {
                                // Subscriber dropped; stop reading.
                                break;
                            }
                        }
                        Err(err) => {
                            warn!(%err, "discarding unparseable push frame");
                        }
                    },
                    Ok(Message::Ping(data)) => {
                        if write.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => {
                        debug!("push connection closed by server");
                        break;
                    }
                    Err(err) => {
                        warn!(%err, "push connection failed");
                        break;
                    }
                    _ => {}
                }
            }
        });

        Ok(Subscription::new(event_rx))
    }
}
