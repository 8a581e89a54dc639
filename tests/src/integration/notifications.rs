//! # Notification Channel Integration
//!
//! Drives the full store with the in-memory push channel: history fetch,
//! watch establishment, live delivery ordering, and read-state updates all
//! run against the real registry and partitions.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::{json, Value};

    use console_gateway::HttpMethod;
    use console_store::RootStore;

    use crate::integration::Harness;

    const HISTORY_PATH: &str = "admin/api/v1/merchants/m-42/notifications?sort[]=-created_at";

    async fn seed_session(h: &Harness) {
        h.store
            .bootstrap(
                "User.Merchant",
                json!({ "id": "m-42", "channel_token": "tok-42" }),
            )
            .await
            .unwrap();
    }

    /// Poll the feed until `predicate` holds or give up loudly.
    async fn wait_for_feed(store: &Arc<RootStore>, predicate: impl Fn(&Value) -> bool) -> Value {
        for _ in 0..200 {
            let feed = store.getter("User.Notifications/notifications").unwrap();
            if predicate(&feed) {
                return feed;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("notification feed never reached the expected state");
    }

    #[tokio::test]
    async fn test_bootstrap_fetches_history_then_streams_new_events() {
        let h = Harness::new();
        seed_session(&h).await;
        h.gateway.ok(
            HttpMethod::Get,
            HISTORY_PATH,
            json!({ "items": [
                { "id": "h2", "created_at": { "seconds": 200 }, "read": false },
                { "id": "h1", "created_at": { "seconds": 100 }, "read": true }
            ] }),
        );

        h.store
            .bootstrap("User.Notifications", Value::Null)
            .await
            .unwrap();

        // History is visible immediately, newest first as the server sent it.
        let feed = h.store.getter("User.Notifications/notifications").unwrap();
        let typed: Vec<shared_types::NotificationEvent> =
            serde_json::from_value(feed.clone()).unwrap();
        assert_eq!(typed[0].id, "h2");
        assert_eq!(typed[1].id, "h1");
        assert!(typed[1].read);

        // Live events are additive on top of history, in delivery order.
        h.channel.publish(
            "merchant#m-42",
            json!({ "id": "p1", "created_at": { "seconds": 300 } }),
        );
        h.channel.publish("merchant#m-42", json!({ "id": "p2" }));

        let feed = wait_for_feed(&h.store, |feed| {
            feed.as_array().map(Vec::len).unwrap_or(0) == 4
        })
        .await;

        assert_eq!(feed[0]["id"], "p2");
        assert_eq!(feed[1]["id"], "p1");
        assert_eq!(feed[2]["id"], "h2");
        assert_eq!(feed[3]["id"], "h1");

        // The server timestamp survived; the missing one got a local
        // receipt-time fallback that cannot predate it.
        assert_eq!(feed[1]["created_at"]["seconds"], 300);
        assert!(feed[0]["created_at"]["seconds"].as_i64().unwrap() >= 300);
    }

    #[tokio::test]
    async fn test_repeat_bootstrap_keeps_single_subscription() {
        let h = Harness::new();
        seed_session(&h).await;
        h.gateway
            .ok(HttpMethod::Get, HISTORY_PATH, json!({ "items": [] }));
        h.gateway
            .ok(HttpMethod::Get, HISTORY_PATH, json!({ "items": [] }));

        h.store
            .bootstrap("User.Notifications", Value::Null)
            .await
            .unwrap();
        h.store
            .bootstrap("User.Notifications", Value::Null)
            .await
            .unwrap();

        // The second bootstrap refetched history but did not reopen the
        // channel.
        assert_eq!(h.channel.connect_count(), 1);

        // Events are not duplicated into the feed either.
        let event_id = uuid::Uuid::new_v4().to_string();
        h.channel.publish("merchant#m-42", json!({ "id": event_id }));
        let feed = wait_for_feed(&h.store, |feed| {
            feed.as_array().map(Vec::len).unwrap_or(0) >= 1
        })
        .await;
        assert_eq!(feed.as_array().unwrap().len(), 1);
        assert_eq!(feed[0]["id"], json!(event_id));
    }

    #[tokio::test]
    async fn test_mark_as_read_preserves_live_ordering() {
        let h = Harness::new();
        seed_session(&h).await;
        h.gateway.ok(
            HttpMethod::Get,
            HISTORY_PATH,
            json!({ "items": [
                { "id": "1", "read": false },
                { "id": "2", "read": false }
            ] }),
        );
        h.gateway.ok(
            HttpMethod::Put,
            "admin/api/v1/merchants/m-42/notifications/2/mark-as-read",
            json!({ "id": "2", "read": true }),
        );

        h.store
            .bootstrap("User.Notifications", Value::Null)
            .await
            .unwrap();
        assert_eq!(
            h.store.getter("User.Notifications/unreadCount").unwrap(),
            json!(2)
        );

        // A pushed event interleaves with the user-driven mark-as-read.
        h.channel.publish("merchant#m-42", json!({ "id": "3" }));
        wait_for_feed(&h.store, |feed| {
            feed.as_array().map(Vec::len).unwrap_or(0) == 3
        })
        .await;

        h.store
            .dispatch("User.Notifications/markNotificationAsRead", json!("2"))
            .await
            .unwrap();

        let feed = h.store.getter("User.Notifications/notifications").unwrap();
        assert_eq!(feed[0]["id"], "3");
        assert_eq!(feed[1]["id"], "1");
        assert_eq!(feed[1]["read"], false);
        assert_eq!(feed[2]["id"], "2");
        assert_eq!(feed[2]["read"], true);
        assert_eq!(
            h.store.getter("User.Notifications/unreadCount").unwrap(),
            json!(2)
        );
    }

    #[tokio::test]
    async fn test_failed_history_fetch_still_starts_watch() {
        let h = Harness::new();
        seed_session(&h).await;
        h.gateway.fail_connection(HttpMethod::Get, HISTORY_PATH);

        h.store
            .bootstrap("User.Notifications", Value::Null)
            .await
            .unwrap();

        // Degraded but live: no history, one subscription, no sink entry.
        assert_eq!(h.channel.connect_count(), 1);
        assert!(h.sink.is_empty());

        h.channel.publish("merchant#m-42", json!({ "id": "fresh" }));
        let feed = wait_for_feed(&h.store, |feed| {
            feed.as_array().map(Vec::len).unwrap_or(0) == 1
        })
        .await;
        assert_eq!(feed[0]["id"], "fresh");
    }

    #[tokio::test]
    async fn test_events_for_other_merchants_never_arrive() {
        let h = Harness::new();
        seed_session(&h).await;
        h.gateway
            .ok(HttpMethod::Get, HISTORY_PATH, json!({ "items": [] }));

        h.store
            .bootstrap("User.Notifications", Value::Null)
            .await
            .unwrap();

        h.channel.publish("merchant#someone-else", json!({ "id": "not-ours" }));
        tokio::time::sleep(Duration::from_millis(50)).await;

        let feed = h.store.getter("User.Notifications/notifications").unwrap();
        assert_eq!(feed, json!([]));
    }
}
