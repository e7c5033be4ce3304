use std::path::PathBuf;

use tracing::debug;

use crate::shared::AppError;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_STATIC_DIR: &str = "frontend";

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Directory of static scoreboard assets served at the root path.
    pub static_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::Config(format!("invalid PORT value: {}", raw)))?,
            Err(_) => DEFAULT_PORT,
        };

        let static_dir = std::env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATIC_DIR));

        debug!(port, static_dir = %static_dir.display(), "Configuration loaded");
        Ok(Self { port, static_dir })
    }
}
