use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::scoring::ScoringService;
use crate::websockets::broadcaster::Broadcaster;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub scoring: Arc<ScoringService>,
    pub broadcaster: Arc<dyn Broadcaster>,
}

impl AppState {
    pub fn new(scoring: Arc<ScoringService>, broadcaster: Arc<dyn Broadcaster>) -> Self {
        Self {
            scoring,
            broadcaster,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Match id must not be blank")]
    InvalidMatchId,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidMatchId => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
