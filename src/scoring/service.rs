use std::sync::Arc;

use tracing::{debug, instrument};

use super::model::{Role, Side};
use super::store::{MatchStore, RoundTransition};
use crate::websockets::broadcaster::Broadcaster;
use crate::websockets::messages::WebSocketMessage;

/// Service applying scoreboard events to the match store and fanning the
/// resulting notifications out to the match channel.
///
/// Invalid input is dropped without error: the only observable failure mode
/// is the absence of an expected broadcast.
pub struct ScoringService {
    store: Arc<MatchStore>,
    broadcaster: Arc<dyn Broadcaster>,
}

impl ScoringService {
    pub fn new(store: Arc<MatchStore>, broadcaster: Arc<dyn Broadcaster>) -> Self {
        Self { store, broadcaster }
    }

    /// Applies a join. For a scoreboard join this creates the match if it is
    /// unseen and returns the snapshot message destined for the joining
    /// caller only; the caller's channel subscription happens at the
    /// connection layer.
    #[instrument(skip(self))]
    pub fn join(&self, match_id: &str, role: Role) -> Option<WebSocketMessage> {
        self.store
            .join(match_id, role)
            .map(|snapshot| WebSocketMessage::update_score(&snapshot))
    }

    /// Records a referee vote. Every recorded vote broadcasts the updated
    /// snapshot, whether or not a majority decision was applied.
    #[instrument(skip(self))]
    pub async fn cast_vote(&self, match_id: &str, referee_id: &str, side: Side, points: i8) {
        let Some(snapshot) = self.store.cast_vote(match_id, referee_id, side, points) else {
            debug!(match_id = %match_id, "Vote dropped, no broadcast");
            return;
        };
        self.send(match_id, &WebSocketMessage::update_score(&snapshot))
            .await;
    }

    /// Pure relay of an opaque clock value. No state mutation and no
    /// existence check; relaying into an empty channel is harmless.
    #[instrument(skip(self, time))]
    pub async fn relay_timer(&self, match_id: &str, time: serde_json::Value) {
        self.send(match_id, &WebSocketMessage::timer_update(time))
            .await;
    }

    /// Ends the current round and broadcasts the round-end notification,
    /// followed by either a match-end notification or the reset state of the
    /// next round.
    #[instrument(skip(self))]
    pub async fn end_round(&self, match_id: &str) {
        let Some(outcome) = self.store.end_round(match_id) else {
            debug!(match_id = %match_id, "End-round dropped, no broadcast");
            return;
        };

        self.send(
            match_id,
            &WebSocketMessage::round_end(outcome.winner, outcome.round_wins),
        )
        .await;

        match outcome.transition {
            RoundTransition::MatchOver(verdict) => {
                self.send(match_id, &WebSocketMessage::match_end(verdict.winner()))
                    .await;
            }
            RoundTransition::NextRound(snapshot) => {
                self.send(match_id, &WebSocketMessage::update_score(&snapshot))
                    .await;
            }
        }
    }

    async fn send(&self, match_id: &str, message: &WebSocketMessage) {
        match serde_json::to_string(message) {
            Ok(json) => self.broadcaster.broadcast(match_id, &json).await,
            Err(e) => {
                tracing::warn!(match_id = %match_id, error = %e, "Failed to serialize message");
            }
        }
    }
}
