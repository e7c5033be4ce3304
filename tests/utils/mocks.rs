use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use tkd_scoreboard::websockets::{Broadcaster, WebSocketMessage};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Broadcaster that records every message per match channel instead of
/// delivering it to sockets.
#[derive(Clone)]
pub struct MockBroadcaster {
    broadcasts: Arc<RwLock<HashMap<String, Vec<String>>>>,
}

impl MockBroadcaster {
    pub fn new() -> Self {
        Self {
            broadcasts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn messages_for(&self, match_id: &str) -> Vec<String> {
        self.broadcasts
            .read()
            .await
            .get(match_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Recorded messages parsed back into the typed envelope.
    pub async fn parsed_messages_for(&self, match_id: &str) -> Vec<WebSocketMessage> {
        self.messages_for(match_id)
            .await
            .iter()
            .map(|raw| serde_json::from_str(raw).expect("broadcast should be a valid envelope"))
            .collect()
    }

    pub async fn clear(&self) {
        self.broadcasts.write().await.clear();
    }
}

#[async_trait]
impl Broadcaster for MockBroadcaster {
    async fn subscribe(
        &self,
        _match_id: &str,
        _connection_id: String,
        _sender: mpsc::UnboundedSender<String>,
    ) {
    }

    async fn unsubscribe(&self, _match_id: &str, _connection_id: &str) {}

    async fn broadcast(&self, match_id: &str, message: &str) {
        self.broadcasts
            .write()
            .await
            .entry(match_id.to_string())
            .or_default()
            .push(message.to_string());
    }
}
