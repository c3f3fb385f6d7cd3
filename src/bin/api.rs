//! Habesha Feedback API Server
//!
//! Run with: cargo run --bin habesha-api
//!
//! # Configuration
//!
//! Read from `config.toml` (see `habesha config`), then overridden by:
//! - `HABESHA_DB_PATH`: SQLite database file
//! - `HABESHA_API_HOST` / `HABESHA_API_PORT`: Bind address (default: 0.0.0.0:8082)
//! - `HABESHA_CHAT_PROVIDER`: `faq` or `gemini`
//! - `HABESHA_GEMINI_API_KEY`: Key for the Gemini backend
//! - `HABESHA_LOG_LEVEL` / `HABESHA_LOG_FORMAT`: Logging (`pretty` or `json`)
//! - `RUST_LOG`: Overrides the log filter entirely

use habesha_feedback::api::{serve, AppState};
use habesha_feedback::config::{Config, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_default();
    init_tracing(&config.logging);

    tracing::info!(
        "Starting Habesha feedback API server v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("Database: {}", config.storage.db_path);
    tracing::info!("Chat provider: {:?}", config.chat.provider);

    let state = AppState::from_config(config)?;
    let store = std::sync::Arc::clone(&state.store);

    match store.purge_expired_tokens(chrono::Utc::now()) {
        Ok(0) => {}
        Ok(purged) => tracing::info!(purged, "Removed expired session tokens"),
        Err(e) => tracing::warn!("Could not purge expired session tokens: {}", e),
    }

    serve(state).await?;

    tracing::info!("Habesha feedback API server stopped");
    Ok(())
}

/// Install the tracing subscriber; `RUST_LOG` wins over the config file
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.filter_directive().into());

    let registry = tracing_subscriber::registry().with(filter);

    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
