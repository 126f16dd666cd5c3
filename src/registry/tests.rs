use std::sync::Arc;

use serde_json::json;

use super::Registry;
use crate::notify::Notifier;
use crate::store::MemoryStore;
use crate::transport::LocalTransport;

fn registry() -> (Registry, Arc<LocalTransport>) {
    let store = Arc::new(MemoryStore::new(86_400));
    let transport = Arc::new(LocalTransport::new());
    let (notifier, _rx) = Notifier::new();
    (Registry::new(store, transport.clone(), notifier), transport)
}

fn connect_event(connection_id: &str, user_id: Option<i64>) -> serde_json::Value {
    let mut event = json!({
        "requestContext": {
            "connectionId": connection_id,
            "routeKey": "$connect",
        }
    });
    if let Some(user_id) = user_id {
        event["requestContext"]["authorizer"] = json!({ "userId": user_id });
    }
    event
}

#[test]
fn test_handle_connect_then_disconnect() {
    let (registry, _transport) = registry();

    let response = registry.handle(&connect_event("abc", Some(7)));
    assert_eq!(response.status_code, 200);

    assert!(registry.connection_exists("abc").unwrap());
    assert_eq!(registry.all_connections().unwrap(), vec!["abc".to_string()]);
    assert_eq!(
        registry.get_connection("abc").unwrap().unwrap().user_id,
        Some(7)
    );

    let response = registry.handle(&json!({
        "requestContext": { "connectionId": "abc", "routeKey": "$disconnect" }
    }));
    assert_eq!(response.status_code, 200);

    assert!(!registry.connection_exists("abc").unwrap());
    assert!(registry.get_connection("abc").unwrap().is_none());
    assert!(registry.all_connections().unwrap().is_empty());
}

#[test]
fn test_lookup_by_user_and_channel() {
    let (registry, _transport) = registry();

    registry.handle(&connect_event("A", Some(1)));
    registry.handle(&connect_event("B", Some(2)));
    registry.join_channel("A", "news").unwrap();
    registry.join_channel("B", "sports").unwrap();

    assert_eq!(
        registry.connections_by_user(1).unwrap(),
        vec!["A".to_string()]
    );
    assert_eq!(
        registry.connections_by_channel("sports").unwrap(),
        vec!["B".to_string()]
    );
    assert_eq!(
        registry.channels_of_connection("A").unwrap(),
        vec!["news".to_string()]
    );
    assert_eq!(
        registry.all_channels().unwrap(),
        vec!["news".to_string(), "sports".to_string()]
    );
}

#[test]
fn test_stats_reflect_fresh_snapshot() {
    let (registry, _transport) = registry();

    registry.handle(&connect_event("A", Some(1)));
    registry.handle(&connect_event("B", Some(2)));
    registry.join_channel("A", "news").unwrap();
    registry.join_channel("B", "news").unwrap();
    registry.join_channel("B", "sports").unwrap();

    let stats = registry.stats().unwrap();
    assert_eq!(stats.total_connections, 2);
    assert_eq!(stats.total_channels, 2);
    assert_eq!(stats.channels["news"], 2);
    assert_eq!(stats.channels["sports"], 1);

    registry.handle(&json!({
        "requestContext": { "connectionId": "B", "routeKey": "$disconnect" }
    }));

    let stats = registry.stats().unwrap();
    assert_eq!(stats.total_connections, 1);
    assert_eq!(stats.total_channels, 1);
}

#[tokio::test]
async fn test_send_to_user_targets_their_connections() {
    let (registry, transport) = registry();

    let (sender_a, mut rx_a) = tokio::sync::mpsc::unbounded_channel();
    let (sender_b, mut rx_b) = tokio::sync::mpsc::unbounded_channel();
    transport.register("A", sender_a);
    transport.register("B", sender_b);

    registry.handle(&connect_event("A", Some(1)));
    registry.handle(&connect_event("B", Some(2)));

    let results = registry.send_to_user(1, &json!({"ping": true})).await.unwrap();

    assert_eq!(results.len(), 1);
    assert!(results["A"]);
    assert!(rx_a.try_recv().is_ok());
    assert!(rx_b.try_recv().is_err());
}

#[tokio::test]
async fn test_send_to_users_maps_results_per_user() {
    let (registry, transport) = registry();

    let (sender_a, _rx_a) = tokio::sync::mpsc::unbounded_channel();
    transport.register("A", sender_a);
    registry.handle(&connect_event("A", Some(1)));
    registry.handle(&connect_event("B", Some(2)));

    let results = registry
        .send_to_users(&[1, 2], &json!({}))
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert!(results[&1]["A"]);
    // User 2's connection was never registered with the transport: gone.
    assert!(!results[&2]["B"]);
}

#[tokio::test]
async fn test_broadcast_prunes_gone_connections() {
    let (registry, transport) = registry();

    let (sender_a, _rx_a) = tokio::sync::mpsc::unbounded_channel();
    transport.register("A", sender_a);
    registry.handle(&connect_event("A", Some(1)));
    registry.handle(&connect_event("B", Some(2)));

    let results = registry.broadcast(&json!({"all": true})).await.unwrap();

    assert!(results["A"]);
    assert!(!results["B"]);
    // The gone connection was evicted from the store.
    assert!(!registry.connection_exists("B").unwrap());
    assert_eq!(registry.all_connections().unwrap(), vec!["A".to_string()]);
}

#[tokio::test]
async fn test_send_to_channel_hits_members_only() {
    let (registry, transport) = registry();

    let (sender_a, mut rx_a) = tokio::sync::mpsc::unbounded_channel();
    let (sender_b, mut rx_b) = tokio::sync::mpsc::unbounded_channel();
    transport.register("A", sender_a);
    transport.register("B", sender_b);

    registry.handle(&connect_event("A", Some(1)));
    registry.handle(&connect_event("B", Some(2)));
    registry.join_channel("A", "news").unwrap();

    let results = registry
        .send_to_channel("news", &json!({"headline": "x"}))
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert!(results["A"]);
    assert!(rx_a.try_recv().is_ok());
    assert!(rx_b.try_recv().is_err());
}

#[test]
fn test_cleanup_uses_configured_threshold() {
    let store = Arc::new(MemoryStore::new(86_400));
    let transport = Arc::new(LocalTransport::new());
    let (notifier, _rx) = Notifier::new();
    let registry = Registry::new(store.clone(), transport, notifier).with_sweep_max_age(0);

    registry.handle(&connect_event("abc", None));

    // Threshold zero: anything connected more than a minute ago would be
    // swept; a just-connected record is exactly at age zero and survives.
    let removed = registry.cleanup().unwrap();
    assert_eq!(removed, 0);
    assert!(registry.connection_exists("abc").unwrap());
}
