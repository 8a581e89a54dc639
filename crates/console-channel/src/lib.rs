//! # Console Channel - Notification Push Client
//!
//! One long-lived publish/subscribe connection per authenticated session,
//! subscribed to a merchant-scoped topic (`merchant#<merchantId>`). Each
//! delivered message is one notification event JSON object.
//!
//! The channel is additive: history comes from a REST fetch before the
//! connection opens, and only *new* events arrive here. No reconnect state
//! machine is modeled; reconnection policy belongs to the transport layer.
//!
//! Partitions depend on the [`PushChannel`] trait; production wires
//! [`WebSocketChannel`], tests and the demo host wire [`InMemoryChannel`].

mod memory;
mod ws;

pub use memory::InMemoryChannel;
pub use ws::WebSocketChannel;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;

/// Buffered events per subscription before the reader applies backpressure.
pub const SUBSCRIPTION_BUFFER: usize = 64;

/// Errors from establishing a push subscription.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// The connection could not be established.
    #[error("failed to connect: {0}")]
    Connect(String),

    /// The server rejected the token or topic.
    #[error("subscribe rejected: {0}")]
    Subscribe(String),
}

/// A live subscription handing out pushed events in delivery order.
#[derive(Debug)]
pub struct Subscription {
    receiver: mpsc::Receiver<Value>,
}

impl Subscription {
    pub(crate) fn new(receiver: mpsc::Receiver<Value>) -> Self {
        Self { receiver }
    }

    /// Next pushed event; `None` once the connection closed.
    pub async fn recv(&mut self) -> Option<Value> {
        self.receiver.recv().await
    }
}

/// The seam between the notifications partition and the transport.
#[async_trait]
pub trait PushChannel: Send + Sync {
    /// Open a token-authenticated subscription to one topic.
    async fn connect(&self, token: &str, topic: &str) -> Result<Subscription, ChannelError>;
}

/// Topic key for a merchant's notification stream.
#[must_use]
pub fn merchant_topic(merchant_id: &str) -> String {
    format!("merchant#{merchant_id}")
}
