//! Habesha Feedback REST API
//!
//! HTTP API layer for the feedback system, built with Axum.
//!
//! # Endpoints
//!
//! ## Feedback
//! - `GET /api/feedback` - List entries (`?source=guest|staff&limit=n`)
//! - `POST /api/feedback/guest` - General guest feedback
//! - `POST /api/feedback/staff` - Staff observation log
//! - `POST /api/feedback/contextual` - QR-code location feedback
//! - `GET /api/feedback/stats` - Dashboard widgets and rating distribution
//!
//! ## Sessions
//! - `GET /api/feedback/validate-token` - Validate a QR link token
//! - `POST /api/feedback/session-tokens` - Issue a token for a QR link
//!
//! ## Chat
//! - `POST /api/chat/message` - HahuBot reply
//!
//! ## Auth
//! - `POST /api/auth/login` - Mock login
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use habesha_feedback::api::{serve, AppState};
//! use habesha_feedback::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = AppState::from_config(Config::load_default())?;
//!     serve(state).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ApiConfig;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Feedback routes
        .route("/feedback", get(routes::feedback::list_feedback))
        .route("/feedback/guest", post(routes::feedback::submit_guest))
        .route("/feedback/staff", post(routes::feedback::submit_staff))
        .route("/feedback/contextual", post(routes::feedback::submit_contextual))
        .route("/feedback/stats", get(routes::feedback::get_stats))
        // Session token routes
        .route("/feedback/validate-token", get(routes::sessions::validate_token))
        .route("/feedback/session-tokens", post(routes::sessions::issue_token))
        // Chat and auth
        .route("/chat/message", post(routes::chat::chat_message))
        .route("/auth/login", post(routes::auth::login));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.api);
    let mut router = Router::new()
        .nest("/api", api_routes)
        .nest("/health", health_routes);

    if state.config.api.request_timeout_secs > 0 {
        router = router.layer(TimeoutLayer::new(Duration::from_secs(
            state.config.api.request_timeout_secs,
        )));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

/// CORS from configured origins; an empty list allows any origin
fn cors_layer(config: &ApiConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the API server
pub async fn serve(state: AppState) -> Result<(), ApiError> {
    let addr = state.addr();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Habesha feedback API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Habesha feedback API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
