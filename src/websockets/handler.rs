use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State, WebSocketUpgrade},
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::scoring::model::Role;
use crate::scoring::ScoringService;
use crate::shared::{AppError, AppState};
use crate::websockets::messages::{
    GiveScorePayload, MessageType, UpdateTimerPayload, WebSocketMessage,
};

use super::socket::{Connection, MessageHandler};

/// Message handler for receiving WebSocket messages from the client
pub struct ScoreboardReceiveHandler {
    scoring: Arc<ScoringService>,
}

impl ScoreboardReceiveHandler {
    pub fn new(scoring: Arc<ScoringService>) -> Self {
        Self { scoring }
    }
}

#[async_trait]
impl MessageHandler for ScoreboardReceiveHandler {
    async fn handle_message(&self, match_id: &str, message: String) {
        debug!(
            match_id = %match_id,
            message = %message,
            "Received message"
        );

        // Parse message and apply the matching scoreboard event. Anything
        // malformed is logged and dropped; a bad frame never takes down the
        // connection or another match.
        match serde_json::from_str::<WebSocketMessage>(&message) {
            Ok(ws_message) => match ws_message.message_type {
                MessageType::GiveScore => {
                    match serde_json::from_value::<GiveScorePayload>(ws_message.payload) {
                        Ok(vote) => {
                            self.scoring
                                .cast_vote(match_id, &vote.referee_id, vote.side, vote.points)
                                .await;
                        }
                        Err(e) => {
                            warn!(
                                match_id = %match_id,
                                error = %e,
                                "Invalid GIVE_SCORE payload dropped"
                            );
                        }
                    }
                }
                MessageType::UpdateTimer => {
                    match serde_json::from_value::<UpdateTimerPayload>(ws_message.payload) {
                        Ok(timer) => {
                            self.scoring.relay_timer(match_id, timer.time).await;
                        }
                        Err(e) => {
                            warn!(
                                match_id = %match_id,
                                error = %e,
                                "Invalid UPDATE_TIMER payload dropped"
                            );
                        }
                    }
                }
                MessageType::EndRound => {
                    self.scoring.end_round(match_id).await;
                }
                _ => {
                    debug!(
                        message_type = ?ws_message.message_type,
                        "Unhandled message type"
                    );
                }
            },
            Err(e) => {
                warn!(
                    match_id = %match_id,
                    error = %e,
                    "Failed to parse WebSocket message"
                );
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct JoinParams {
    #[serde(default = "default_role")]
    role: Role,
}

fn default_role() -> Role {
    Role::Viewer
}

/// WebSocket endpoint subscribing the caller to a match channel
/// GET /ws/{match_id}?role=scoreboard|referee|viewer
#[instrument(name = "websocket_handler", skip(state, ws))]
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Path(match_id): Path<String>,
    Query(params): Query<JoinParams>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    if match_id.trim().is_empty() {
        warn!("Rejecting join with blank match id");
        return Err(AppError::InvalidMatchId);
    }

    info!(
        match_id = %match_id,
        role = %params.role,
        "WebSocket connection requested"
    );

    Ok(ws.on_upgrade(move |socket| {
        handle_scoreboard_connection(socket, match_id, params.role, state)
    }))
}

/// Handle the upgraded WebSocket connection
async fn handle_scoreboard_connection(
    socket: axum::extract::ws::WebSocket,
    match_id: String,
    role: Role,
    state: AppState,
) {
    let connection_id = Uuid::new_v4().to_string();
    info!(
        match_id = %match_id,
        connection_id = %connection_id,
        role = %role,
        "WebSocket connection established"
    );

    // Outbound channel (app -> client), registered on the match channel
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();
    state
        .broadcaster
        .subscribe(&match_id, connection_id.clone(), outbound_sender.clone())
        .await;

    // A scoreboard join creates the match if unseen and gets the snapshot
    // delivered to this subscriber only.
    if let Some(snapshot_message) = state.scoring.join(&match_id, role) {
        if let Ok(message_json) = serde_json::to_string(&snapshot_message) {
            let _ = outbound_sender.send(message_json);
            debug!(
                match_id = %match_id,
                connection_id = %connection_id,
                "Sent initial snapshot to joining scoreboard"
            );
        }
    }

    let message_handler = Arc::new(ScoreboardReceiveHandler::new(Arc::clone(&state.scoring)));

    let connection = Connection::new(
        match_id.clone(),
        Box::new(socket),
        outbound_receiver,
        message_handler,
    );

    // Run the connection until disconnect
    match connection.run().await {
        Ok(()) => {
            info!(
                match_id = %match_id,
                connection_id = %connection_id,
                "WebSocket connection closed cleanly"
            );
        }
        Err(e) => {
            warn!(
                match_id = %match_id,
                connection_id = %connection_id,
                error = ?e,
                "WebSocket connection error"
            );
        }
    }

    state.broadcaster.unsubscribe(&match_id, &connection_id).await;
}
