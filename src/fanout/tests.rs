use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use super::Fanout;
use crate::store::{Connection, ConnectionStore, MemoryStore};
use crate::transport::Transport;
use crate::utils::error::TransportError;

/// Transport double: records every delivery, reports configured ids as
/// gone or failing.
#[derive(Default)]
struct FakeTransport {
    gone: HashSet<String>,
    failing: HashSet<String>,
    sent: Mutex<Vec<(String, String)>>,
}

impl FakeTransport {
    fn gone(mut self, connection_id: &str) -> Self {
        self.gone.insert(connection_id.to_string());
        self
    }

    fn failing(mut self, connection_id: &str) -> Self {
        self.failing.insert(connection_id.to_string());
        self
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn post_to_connection(
        &self,
        connection_id: &str,
        data: &str,
    ) -> Result<(), TransportError> {
        if self.gone.contains(connection_id) {
            return Err(TransportError::Gone);
        }
        if self.failing.contains(connection_id) {
            return Err(TransportError::Failed("boom".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((connection_id.to_string(), data.to_string()));
        Ok(())
    }
}

fn store_with(ids: &[&str]) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new(60));
    for id in ids {
        store.put(&Connection::new(id, "$connect", None)).unwrap();
    }
    store
}

#[tokio::test]
async fn test_send_one_serializes_payload() {
    let store = store_with(&["abc"]);
    let transport = Arc::new(FakeTransport::default());
    let fanout = Fanout::new(transport.clone(), store);

    assert!(fanout.send_one("abc", &json!({"hello": "world"})).await);

    let sent = transport.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "abc");
    assert_eq!(sent[0].1, json!({"hello": "world"}).to_string());
}

#[tokio::test]
async fn test_send_one_gone_evicts_connection() {
    let store = store_with(&["abc"]);
    let transport = Arc::new(FakeTransport::default().gone("abc"));
    let fanout = Fanout::new(transport, store.clone());

    assert!(!fanout.send_one("abc", &json!({})).await);

    assert!(store.get("abc").unwrap().is_none());
    assert!(store.list_all().unwrap().is_empty());
}

#[tokio::test]
async fn test_send_one_other_failure_keeps_connection() {
    let store = store_with(&["abc"]);
    let transport = Arc::new(FakeTransport::default().failing("abc"));
    let fanout = Fanout::new(transport, store.clone());

    assert!(!fanout.send_one("abc", &json!({})).await);

    assert!(store.get("abc").unwrap().is_some());
}

#[tokio::test]
async fn test_send_many_reports_per_connection_outcomes() {
    let store = store_with(&["a", "b", "c"]);
    let transport = Arc::new(FakeTransport::default().gone("b"));
    let fanout = Fanout::new(transport, store);

    let ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let results = fanout.send_many(&ids, &json!({"x": 1})).await;

    assert_eq!(results.len(), 3);
    assert!(results["a"]);
    assert!(!results["b"]);
    assert!(results["c"]);
}

#[tokio::test]
async fn test_broadcast_targets_every_stored_connection() {
    let store = store_with(&["a", "b"]);
    let transport = Arc::new(FakeTransport::default());
    let fanout = Fanout::new(transport.clone(), store);

    let results = fanout.broadcast(&json!({"all": true})).await.unwrap();

    assert_eq!(results.len(), 2);
    assert!(results.values().all(|delivered| *delivered));
    assert_eq!(transport.sent.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_bounded_parallelism_still_reaches_everyone() {
    let ids: Vec<String> = (0..50).map(|i| format!("conn-{i}")).collect();
    let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    let store = store_with(&id_refs);
    let transport = Arc::new(FakeTransport::default());
    let fanout = Fanout::new(transport.clone(), store).with_max_in_flight(4);

    let results = fanout.send_many(&ids, &json!({})).await;

    assert_eq!(results.len(), 50);
    assert_eq!(transport.sent.lock().unwrap().len(), 50);
}
