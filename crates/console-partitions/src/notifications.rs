//! `User.Notifications` - ordered notification feed + push watch.
//!
//! The feed is newest-first. History arrives through one REST fetch during
//! bootstrap; everything after that is pushed over the channel and
//! prepended. The watch is guarded by the `initialized` latch: the first
//! start wins, every later start is a no-op, so one session never opens two
//! connections.
//!
//! Notifications are an enhancement, not a correctness-critical path:
//! fetch/mark/watch failures are logged and swallowed, and the feed degrades
//! to stale-but-consistent state.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use console_channel::{merchant_topic, PushChannel};
use console_gateway::ApiGateway;
use console_store::{Context, Partition, RootStore, StoreError};
use shared_types::{ItemsEnvelope, Merchant, NotificationEvent, Timestamp};

use crate::NS_NOTIFICATIONS;

/// Path the delivery task commits pushed events through.
const PUSH_PATH: &str = "User.Notifications/pushNotification";

/// The live-subscription bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct WatchSession {
    channel_token: String,
    topic: String,
}

#[derive(Debug, Default)]
struct NotificationsState {
    initialized: bool,
    session: WatchSession,
    notifications: Vec<NotificationEvent>,
}

/// Partition holding the notification feed and the watch latch.
pub struct NotificationsPartition {
    state: RwLock<NotificationsState>,
    gateway: Arc<dyn ApiGateway>,
    channel: Arc<dyn PushChannel>,
}

impl NotificationsPartition {
    #[must_use]
    pub fn new(gateway: Arc<dyn ApiGateway>, channel: Arc<dyn PushChannel>) -> Self {
        Self {
            state: RwLock::new(NotificationsState::default()),
            gateway,
            channel,
        }
    }

    fn merchant(&self, ctx: &Context) -> Result<Merchant, StoreError> {
        serde_json::from_value(ctx.getter_root("User.Merchant/merchant")?)
            .map_err(|e| StoreError::payload("User.Merchant/merchant", e))
    }

    async fn fetch_notifications(&self, ctx: &Context) -> Result<Value, StoreError> {
        let merchant = self.merchant(ctx)?;
        let path = format!(
            "admin/api/v1/merchants/{}/notifications?sort[]=-created_at",
            merchant.id
        );

        match self.gateway.get(&path).await {
            Ok(body) => {
                let envelope: ItemsEnvelope<NotificationEvent> = serde_json::from_value(body)
                    .unwrap_or_default();
                ctx.commit(
                    "notifications",
                    serde_json::to_value(envelope.items).unwrap_or_default(),
                )?;
            }
            Err(err) => {
                warn!(%err, "notification history fetch failed, keeping stale feed");
            }
        }
        Ok(Value::Null)
    }

    async fn mark_as_read(&self, ctx: &Context, payload: Value) -> Result<Value, StoreError> {
        let notification_id: String = serde_json::from_value(payload)
            .map_err(|e| StoreError::payload("User.Notifications/markNotificationAsRead", e))?;
        let merchant = self.merchant(ctx)?;
        let path = format!(
            "admin/api/v1/merchants/{}/notifications/{notification_id}/mark-as-read",
            merchant.id
        );

        match self.gateway.put(&path, None).await {
            Ok(body) => match serde_json::from_value::<NotificationEvent>(body) {
                Ok(updated) => {
                    // Replace the matching entry in place: order preserved,
                    // no re-sort, no duplicates.
                    let replaced: Vec<NotificationEvent> = self
                        .state
                        .read()
                        .notifications
                        .iter()
                        .map(|item| {
                            if item.id == updated.id {
                                updated.clone()
                            } else {
                                item.clone()
                            }
                        })
                        .collect();
                    ctx.commit(
                        "notifications",
                        serde_json::to_value(replaced).unwrap_or_default(),
                    )?;
                }
                Err(err) => {
                    warn!(%err, "mark-as-read response unparseable, keeping feed unchanged");
                }
            },
            Err(err) => {
                warn!(%err, %notification_id, "mark-as-read failed, keeping feed unchanged");
            }
        }
        Ok(Value::Null)
    }

    /// Start watching the merchant-scoped topic, at most once per session.
    async fn watch(&self, ctx: &Context) -> Result<Value, StoreError> {
        if self.state.read().initialized {
            debug!("notification watch already initialized, ignoring start");
            return Ok(Value::Null);
        }

        let merchant = self.merchant(ctx)?;
        if merchant.id.is_empty() {
            warn!("no authenticated merchant, notification watch not started");
            return Ok(Value::Null);
        }
        let topic = merchant_topic(&merchant.id);

        // Latch before the connect suspension point: a second start
        // interleaving with the connect is refused, never queued.
        ctx.commit("isWatchingInited", Value::Bool(true))?;

        let subscription = match self.channel.connect(&merchant.channel_token, &topic).await {
            Ok(subscription) => subscription,
            Err(err) => {
                warn!(%err, %topic, "push channel connect failed, feed stays fetch-only");
                ctx.commit("isWatchingInited", Value::Bool(false))?;
                return Ok(Value::Null);
            }
        };

        let session = WatchSession {
            channel_token: merchant.channel_token,
            topic,
        };
        ctx.commit("watchSession", serde_json::to_value(session).unwrap_or_default())?;

        tokio::spawn(deliver(ctx.root(), subscription));
        Ok(Value::Null)
    }
}

/// Folds pushed events into the feed until the connection closes.
///
/// Runs concurrently with user-driven operations; it only touches the feed
/// through the root-scoped prepend mutation.
async fn deliver(root: Arc<RootStore>, mut subscription: console_channel::Subscription) {
    while let Some(raw) = subscription.recv().await {
        let event: NotificationEvent = match serde_json::from_value(raw) {
            Ok(event) => event,
            Err(err) => {
                warn!(%err, "discarding unparseable notification event");
                continue;
            }
        };
        let stamped = event.with_received_at(Timestamp::now());
        let payload = match serde_json::to_value(&stamped) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(%err, "discarding unencodable notification event");
                continue;
            }
        };
        if let Err(err) = root.commit(PUSH_PATH, payload) {
            warn!(%err, "failed to fold pushed notification into feed");
        }
    }
    debug!("notification delivery task finished");
}

#[async_trait]
impl Partition for NotificationsPartition {
    fn namespace(&self) -> &'static str {
        NS_NOTIFICATIONS
    }

    async fn handle_action(
        &self,
        ctx: Context,
        action: &str,
        payload: Value,
    ) -> Result<Value, StoreError> {
        match action {
            // History first, then the live channel: the channel is additive,
            // never a replacement fetch. A merchant-less session is a no-op.
            "initState" => {
                if self.merchant(&ctx)?.id.is_empty() {
                    return Ok(Value::Null);
                }
                ctx.dispatch("fetchNotifications", Value::Null).await?;
                ctx.dispatch("watchForNotifications", Value::Null).await?;
                Ok(Value::Null)
            }
            "fetchNotifications" => self.fetch_notifications(&ctx).await,
            "markNotificationAsRead" => self.mark_as_read(&ctx, payload).await,
            "watchForNotifications" => self.watch(&ctx).await,
            other => Err(self.unknown_action(other)),
        }
    }

    fn handle_mutation(&self, mutation: &str, payload: Value) -> Result<(), StoreError> {
        match mutation {
            "notifications" => {
                let items: Vec<NotificationEvent> = serde_json::from_value(payload)
                    .map_err(|e| StoreError::payload("User.Notifications/notifications", e))?;
                self.state.write().notifications = items;
                Ok(())
            }
            "pushNotification" => {
                let event: NotificationEvent = serde_json::from_value(payload)
                    .map_err(|e| StoreError::payload("User.Notifications/pushNotification", e))?;
                self.state.write().notifications.insert(0, event);
                Ok(())
            }
            "isWatchingInited" => {
                let value: bool = serde_json::from_value(payload)
                    .map_err(|e| StoreError::payload("User.Notifications/isWatchingInited", e))?;
                self.state.write().initialized = value;
                Ok(())
            }
            "watchSession" => {
                let session: WatchSession = serde_json::from_value(payload)
                    .map_err(|e| StoreError::payload("User.Notifications/watchSession", e))?;
                self.state.write().session = session;
                Ok(())
            }
            other => Err(self.unknown_mutation(other)),
        }
    }

    fn getter(&self, name: &str) -> Result<Value, StoreError> {
        let state = self.state.read();
        match name {
            "notifications" => serde_json::to_value(&state.notifications)
                .map_err(|e| StoreError::payload("User.Notifications/notifications", e)),
            "isWatchingInited" => Ok(Value::Bool(state.initialized)),
            "watchSession" => serde_json::to_value(&state.session)
                .map_err(|e| StoreError::payload("User.Notifications/watchSession", e)),
            "unreadCount" => {
                let unread = state.notifications.iter().filter(|n| !n.read).count();
                Ok(serde_json::json!(unread))
            }
            other => Err(self.unknown_getter(other)),
        }
    }
}
