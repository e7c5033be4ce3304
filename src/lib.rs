// Library crate for the taekwondo scoreboard server
// This file exposes the public API for integration tests

pub mod config;
pub mod scoring;
pub mod shared;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use scoring::{MatchStore, MatchVerdict, Role, ScoringService, Side};
pub use shared::{AppError, AppState};
pub use websockets::{
    Broadcaster, InMemoryBroadcaster, MessageType, ScoreboardReceiveHandler, WebSocketMessage,
};
