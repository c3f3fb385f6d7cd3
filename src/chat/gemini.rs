//! Gemini REST API Client
//!
//! Minimal client for `models/{model}:generateContent`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ChatBackend, ChatError, NO_AI_RESPONSE};

/// Instructions sent ahead of every guest question
const HOTEL_PROMPT: &str = "You are HahuBot, the friendly assistant of the Habesha Hub hotel. \
Answer guest questions briefly and politely. Breakfast is served 7:00 AM to 10:00 AM, \
check-out is at 11:00 AM, and the guest Wi-Fi network is 'HabeshaHub_Guest'.";

/// Configuration for the Gemini client
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API root, e.g. "https://generativelanguage.googleapis.com/v1beta"
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub request_timeout_secs: u64,
}

/// Gemini `generateContent` client
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Ask the model a question
    pub async fn generate(&self, message: &str) -> Result<String, ChatError> {
        let body = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(format!("{}\n\nGuest: {}", HOTEL_PROMPT, message)),
                }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChatError::Timeout
                } else if e.is_connect() {
                    ChatError::Unavailable
                } else {
                    ChatError::from(e)
                }
            })?;

        if response.status().is_success() {
            let result: GenerateResponse = response.json().await?;
            Ok(first_text(&result).unwrap_or_else(|| NO_AI_RESPONSE.to_string()))
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            Err(ChatError::Backend {
                status: status.as_u16(),
                message: text,
            })
        }
    }
}

#[async_trait]
impl ChatBackend for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn reply(&self, message: &str) -> Result<String, ChatError> {
        self.generate(message).await
    }
}

/// Text of the first part of the first candidate, if any
fn first_text(response: &GenerateResponse) -> Option<String> {
    response
        .candidates
        .first()?
        .content
        .as_ref()?
        .parts
        .iter()
        .find_map(|p| p.text.as_deref())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

// ============================================
// Request/Response DTOs
// ============================================

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}
