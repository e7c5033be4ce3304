use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::model::{Side, SidePair, StateSnapshot};

/// Message types for WebSocket communication
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    // Client -> Server
    GiveScore,
    UpdateTimer,
    EndRound,

    // Server -> Client
    UpdateScore,
    TimerUpdate,
    RoundEnd,
    MatchEnd,
}

/// Metadata for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessageMeta {
    pub timestamp: DateTime<Utc>,
}

/// Base structure for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub payload: serde_json::Value,
    pub meta: Option<WebSocketMessageMeta>,
}

/// Client-to-Server message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GiveScorePayload {
    pub referee_id: String,
    pub side: Side,
    /// Raw point value; domain checking happens in the store.
    pub points: i8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTimerPayload {
    /// Opaque clock value, relayed verbatim to subscribers.
    pub time: serde_json::Value,
}

/// Server-to-Client message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundEndPayload {
    pub winner: Option<Side>,
    pub round_wins: SidePair<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchEndPayload {
    /// `None` signals a drawn match.
    pub winner: Option<Side>,
}

/// Helper functions for creating messages
impl WebSocketMessage {
    pub fn new(message_type: MessageType, payload: serde_json::Value) -> Self {
        Self {
            message_type,
            payload,
            meta: Some(WebSocketMessageMeta {
                timestamp: Utc::now(),
            }),
        }
    }

    /// Create an UPDATE_SCORE message carrying the full-state snapshot
    pub fn update_score(snapshot: &StateSnapshot) -> Self {
        Self::new(
            MessageType::UpdateScore,
            serde_json::to_value(snapshot).unwrap(),
        )
    }

    /// Create a TIMER_UPDATE message relaying the raw time value
    pub fn timer_update(time: serde_json::Value) -> Self {
        Self::new(MessageType::TimerUpdate, time)
    }

    /// Create a ROUND_END message
    pub fn round_end(winner: Option<Side>, round_wins: SidePair<u8>) -> Self {
        let payload = RoundEndPayload { winner, round_wins };
        Self::new(
            MessageType::RoundEnd,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a MATCH_END message
    pub fn match_end(winner: Option<Side>) -> Self {
        let payload = MatchEndPayload { winner };
        Self::new(
            MessageType::MatchEnd,
            serde_json::to_value(payload).unwrap(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::model::MatchState;
    use serde_json::json;

    #[test]
    fn test_message_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&MessageType::GiveScore).unwrap(),
            "\"GIVE_SCORE\""
        );
        assert_eq!(
            serde_json::to_string(&MessageType::MatchEnd).unwrap(),
            "\"MATCH_END\""
        );
    }

    #[test]
    fn test_message_constructors_and_serialization() {
        let snapshot = MatchState::new().snapshot();
        let m = WebSocketMessage::update_score(&snapshot);
        assert!(matches!(m.message_type, MessageType::UpdateScore));
        let s = serde_json::to_string(&m).unwrap();
        let back: WebSocketMessage = serde_json::from_str(&s).unwrap();
        assert!(matches!(back.message_type, MessageType::UpdateScore));
        assert_eq!(back.payload["current_round"], 1);

        let t = WebSocketMessage::timer_update(json!({"seconds": 90}));
        assert!(matches!(t.message_type, MessageType::TimerUpdate));
        assert_eq!(t.payload["seconds"], 90);

        let r = WebSocketMessage::round_end(Some(Side::Chong), SidePair { chong: 1, hong: 0 });
        assert_eq!(r.payload["winner"], "chong");
        assert_eq!(r.payload["round_wins"]["chong"], 1);

        let tie = WebSocketMessage::round_end(None, SidePair::default());
        assert_eq!(tie.payload["winner"], serde_json::Value::Null);

        let e = WebSocketMessage::match_end(Some(Side::Hong));
        assert_eq!(e.payload["winner"], "hong");

        let draw = WebSocketMessage::match_end(None);
        assert_eq!(draw.payload["winner"], serde_json::Value::Null);
    }

    #[test]
    fn test_give_score_payload_parsing() {
        let payload: GiveScorePayload =
            serde_json::from_value(json!({"referee_id": "r1", "side": "hong", "points": -1}))
                .unwrap();
        assert_eq!(payload.referee_id, "r1");
        assert_eq!(payload.side, Side::Hong);
        assert_eq!(payload.points, -1);

        // Invalid side is a parse failure, dropped at the wire boundary
        let bad = serde_json::from_value::<GiveScorePayload>(
            json!({"referee_id": "r1", "side": "blue", "points": 1}),
        );
        assert!(bad.is_err());
    }
}
