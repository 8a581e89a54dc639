//! In-memory push channel for tests and the demo host.
//!
//! Broadcast-backed: publishing to a topic fans the event out to every live
//! subscription on that topic, preserving publish order.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::{broadcast, mpsc};
use tracing::debug;

use crate::{ChannelError, PushChannel, Subscription, SUBSCRIPTION_BUFFER};

/// Fake transport with a local publish handle.
pub struct InMemoryChannel {
    topics: RwLock<HashMap<String, broadcast::Sender<Value>>>,
    connects: AtomicUsize,
}

impl InMemoryChannel {
    #[must_use]
    pub fn new() -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
            connects: AtomicUsize::new(0),
        }
    }

    fn sender_for(&self, topic: &str) -> broadcast::Sender<Value> {
        let mut topics = self.topics.write();
        topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(SUBSCRIPTION_BUFFER).0)
            .clone()
    }

    /// Publish an event to a topic. Returns the number of live subscriptions
    /// that received it.
    pub fn publish(&self, topic: &str, event: Value) -> usize {
        let sender = self.sender_for(topic);
        let receivers = sender.send(event).unwrap_or(0);
        debug!(%topic, receivers, "published test event");
        receivers
    }

    /// How many subscriptions have been established through this channel.
    ///
    /// The watch-start guard tests assert this stays at exactly one.
    #[must_use]
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::Relaxed)
    }
}

impl Default for InMemoryChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PushChannel for InMemoryChannel {
    async fn connect(&self, token: &str, topic: &str) -> Result<Subscription, ChannelError> {
        if token.is_empty() {
            return Err(ChannelError::Connect("missing channel token".into()));
        }

        self.connects.fetch_add(1, Ordering::Relaxed);
        let mut source = self.sender_for(topic).subscribe();

        let (event_tx, event_rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
        tokio::spawn(async move {
            loop {
                match source.recv().await {
                    Ok(event) => {
                        if event_tx.send(event).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(count)) => {
                        debug!(lagged = count, "in-memory subscription lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Ok(Subscription::new(event_rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_publish_reaches_subscriber_in_order() {
        let channel = InMemoryChannel::new();
        let mut sub = channel.connect("token", "merchant#m1").await.unwrap();

        channel.publish("merchant#m1", json!({ "id": "a" }));
        channel.publish("merchant#m1", json!({ "id": "b" }));

        let first = timeout(Duration::from_millis(200), sub.recv())
            .await
            .expect("timeout")
            .expect("event");
        let second = timeout(Duration::from_millis(200), sub.recv())
            .await
            .expect("timeout")
            .expect("event");

        assert_eq!(first["id"], "a");
        assert_eq!(second["id"], "b");
    }

    #[tokio::test]
    async fn test_topics_are_isolated() {
        let channel = InMemoryChannel::new();
        let mut sub = channel.connect("token", "merchant#m1").await.unwrap();

        channel.publish("merchant#m2", json!({ "id": "other" }));

        let outcome = timeout(Duration::from_millis(100), sub.recv()).await;
        assert!(outcome.is_err(), "event from another topic must not arrive");
    }

    #[tokio::test]
    async fn test_empty_token_rejected() {
        let channel = InMemoryChannel::new();
        let err = channel.connect("", "merchant#m1").await.unwrap_err();
        assert!(matches!(err, ChannelError::Connect(_)));
        assert_eq!(channel.connect_count(), 0);
    }

    #[tokio::test]
    async fn test_connect_count_tracks_subscriptions() {
        let channel = InMemoryChannel::new();
        let _a = channel.connect("token", "merchant#m1").await.unwrap();
        let _b = channel.connect("token", "merchant#m2").await.unwrap();
        assert_eq!(channel.connect_count(), 2);
    }
}
