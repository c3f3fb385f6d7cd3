//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::api::error::ApiError;
use crate::chat::ChatService;
use crate::config::Config;
use crate::sessions::SessionManager;
use crate::storage::FeedbackStore;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Feedback entries and session tokens
    pub store: Arc<FeedbackStore>,
    /// Contextual session token issuing and validation
    pub sessions: Arc<SessionManager>,
    /// Chat backend behind `/chat/message`
    pub chat: ChatService,
    /// Full configuration (API limits, mock accounts)
    pub config: Arc<Config>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create state from an opened store and chat service
    pub fn new(store: Arc<FeedbackStore>, chat: ChatService, config: Config) -> Self {
        let sessions = Arc::new(SessionManager::new(Arc::clone(&store), &config.sessions));
        Self {
            store,
            sessions,
            chat,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Open the configured database and chat backend
    pub fn from_config(config: Config) -> Result<Self, ApiError> {
        let store = Arc::new(FeedbackStore::open(Path::new(&config.storage.db_path))?);
        let chat = ChatService::from_config(&config.chat).map_err(|e| {
            ApiError::Internal(format!("Chat backend setup failed: {}", e))
        })?;

        tracing::info!(
            db_path = %config.storage.db_path,
            chat_backend = chat.backend_name(),
            "Application state initialized"
        );
        Ok(Self::new(store, chat, config))
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Socket address the server binds to
    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.api.host, self.config.api.port)
    }
}
