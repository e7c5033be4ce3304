use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tkd_scoreboard::config::Config;
use tkd_scoreboard::scoring::{MatchStore, ScoringService};
use tkd_scoreboard::shared::AppState;
use tkd_scoreboard::websockets::{self, InMemoryBroadcaster};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tkd_scoreboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting taekwondo scoreboard server");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let store = Arc::new(MatchStore::new());
    let broadcaster = Arc::new(InMemoryBroadcaster::new());
    let scoring = Arc::new(ScoringService::new(store, broadcaster.clone()));
    let app_state = AppState::new(scoring, broadcaster);

    let app = Router::new()
        .route("/ws/:match_id", get(websockets::websocket_handler))
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    info!("Server running on http://localhost:{}", config.port);
    axum::serve(listener, app).await.unwrap();
}
