//! # Habesha Feedback
//!
//! Hotel guest feedback service: guests rate their stay from general or
//! QR-code location forms, staff log verbal observations, and admins
//! watch a live dashboard. A chat assistant answers common questions.
//!
//! ## Features
//!
//! - **Feedback capture**: guest, staff and contextual (QR-code) forms
//! - **Session tokens**: room and checkout links bound to a guest's stay
//! - **Dashboard**: statistics, rating distribution, polling refresh
//! - **Chat**: FAQ answers or a proxied LLM backend
//!
//! ## Modules
//!
//! - [`storage`]: SQLite persistence for entries and session tokens
//! - [`sessions`]: Issuing and validating contextual session tokens
//! - [`chat`]: Chat backends behind `/api/chat/message`
//! - [`api`]: REST API server with Axum
//! - [`client`]: HTTP client for the API
//! - [`dashboard`]: Background poller feeding a dashboard renderer
//! - [`export`]: CSV export
//! - [`config`]: TOML and environment configuration
//!
//! Form rules, statistics and the dashboard state machine live in the
//! [`habesha_core`] crate so the browser UI shares them.
//!
//! ## Quick Start
//!
//! ```rust,no_run
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

pub mod api;
pub mod chat;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod export;
pub mod sessions;
pub mod storage;

pub use habesha_core;

pub use api::{build_router, serve, ApiError, AppState};

pub use chat::{ChatBackend, ChatError, ChatService, FaqBackend, GeminiClient, GeminiConfig};

pub use client::{ApiClient, ClientError};

pub use config::{Config, ConfigError, LoggingConfig};

pub use dashboard::{DashboardPoller, DashboardSnapshot, FeedbackFeed, PollerCommand, PollerEvent};

pub use sessions::{IssueRequest, SessionError, SessionManager};

pub use storage::{FeedbackStore, ListFilter, SessionToken, StorageError, StorageResult};
