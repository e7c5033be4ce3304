use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;

/// Publish/subscribe channel abstraction keyed by match id.
///
/// Subscribers outlive the match state itself: a concluded match leaves its
/// channel in place so clients stay connected (and a later scoreboard join of
/// the same id starts a fresh match on the same channel).
#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn subscribe(
        &self,
        match_id: &str,
        connection_id: String,
        sender: mpsc::UnboundedSender<String>,
    );

    async fn unsubscribe(&self, match_id: &str, connection_id: &str);

    /// Delivers a message to every subscriber of the match channel.
    /// Broadcasting to a channel with no subscribers is harmless.
    async fn broadcast(&self, match_id: &str, message: &str);
}

pub struct InMemoryBroadcaster {
    // match_id -> (connection_id -> sender)
    channels: Arc<RwLock<HashMap<String, HashMap<String, mpsc::UnboundedSender<String>>>>>,
}

impl InMemoryBroadcaster {
    pub fn new() -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Broadcaster for InMemoryBroadcaster {
    async fn subscribe(
        &self,
        match_id: &str,
        connection_id: String,
        sender: mpsc::UnboundedSender<String>,
    ) {
        let mut channels = self.channels.write().await;
        channels
            .entry(match_id.to_string())
            .or_default()
            .insert(connection_id, sender);
    }

    async fn unsubscribe(&self, match_id: &str, connection_id: &str) {
        let mut channels = self.channels.write().await;
        if let Some(subscribers) = channels.get_mut(match_id) {
            subscribers.remove(connection_id);
            if subscribers.is_empty() {
                channels.remove(match_id);
                debug!(match_id = %match_id, "Last subscriber left, dropping channel");
            }
        }
    }

    async fn broadcast(&self, match_id: &str, message: &str) {
        let channels = self.channels.read().await;
        match channels.get(match_id) {
            Some(subscribers) => {
                for sender in subscribers.values() {
                    // A closed receiver only means the connection is tearing
                    // down; it will unsubscribe itself.
                    let _ = sender.send(message.to_string());
                }
            }
            None => {
                debug!(match_id = %match_id, "Broadcast to empty channel dropped");
            }
        }
    }
}
