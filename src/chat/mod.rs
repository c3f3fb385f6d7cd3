//! Chat Backends
//!
//! Answers for the HahuBot widget. The built-in FAQ responder needs no
//! network; the Gemini backend proxies the question to Google's
//! `generateContent` API so the API key never reaches the browser.

mod gemini;

pub use gemini::{GeminiClient, GeminiConfig};

use async_trait::async_trait;
use habesha_core::chat::faq_reply;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{ChatConfig, ChatProvider};

/// Returned when the model answers without any text
pub const NO_AI_RESPONSE: &str = "No response from AI.";

/// Errors that can occur while producing a chat reply
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Chat backend unavailable")]
    Unavailable,

    #[error("Chat backend timed out")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(reqwest::Error),

    #[error("Chat backend error {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("Chat backend not configured: {0}")]
    Config(String),
}

// Request URLs can carry credentials, keep them out of logs
impl From<reqwest::Error> for ChatError {
    fn from(e: reqwest::Error) -> Self {
        ChatError::Request(e.without_url())
    }
}

/// Something that can answer a guest's question
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Short name for logs and health output
    fn name(&self) -> &str;

    /// Reply to an already trimmed, non-empty message
    async fn reply(&self, message: &str) -> Result<String, ChatError>;
}

/// Keyword FAQ answers
#[derive(Debug, Default, Clone, Copy)]
pub struct FaqBackend;

#[async_trait]
impl ChatBackend for FaqBackend {
    fn name(&self) -> &str {
        "faq"
    }

    async fn reply(&self, message: &str) -> Result<String, ChatError> {
        faq_reply(message)
            .map(str::to_string)
            .ok_or(ChatError::EmptyMessage)
    }
}

/// Front door used by the `/chat/message` route
#[derive(Clone)]
pub struct ChatService {
    backend: Arc<dyn ChatBackend>,
}

impl ChatService {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    /// Build the backend selected in configuration
    pub fn from_config(config: &ChatConfig) -> Result<Self, ChatError> {
        let backend: Arc<dyn ChatBackend> = match config.provider {
            ChatProvider::Faq => Arc::new(FaqBackend),
            ChatProvider::Gemini => {
                let api_key = config
                    .gemini_api_key
                    .clone()
                    .filter(|k| !k.is_empty())
                    .ok_or_else(|| ChatError::Config("gemini_api_key is not set".to_string()))?;

                Arc::new(GeminiClient::new(GeminiConfig {
                    base_url: config.gemini_url.clone(),
                    model: config.gemini_model.clone(),
                    api_key,
                    request_timeout_secs: config.timeout_secs,
                })?)
            }
        };
        Ok(Self::new(backend))
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub async fn reply(&self, message: &str) -> Result<String, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let started = std::time::Instant::now();
        let result = self.backend.reply(message).await;

        match &result {
            Ok(reply) => tracing::debug!(
                backend = self.backend.name(),
                reply_chars = reply.chars().count(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Chat reply produced"
            ),
            Err(e) => tracing::warn!(
                backend = self.backend.name(),
                error = %e,
                "Chat backend failed"
            ),
        }

        result
    }
}
