//! Feedback API Client
//!
//! HTTP client used by the CLI to talk to a running API server.

use async_trait::async_trait;
use habesha_core::wire::{failure_message, parse_error_body};
use habesha_core::{
    ChatReply, ChatRequest, FeedbackEntry, FeedbackSource, FormErrors, GuestSubmission,
    StaffLog,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::api::dto::{HealthResponse, IssueTokenRequest, IssueTokenResponse, StatsResponse};
use crate::dashboard::FeedbackFeed;

/// REST client for the feedback API
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url` (e.g. "http://localhost:8082")
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET /health
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.send(self.client.get(self.url("/health"))).await
    }

    /// GET /api/feedback
    pub async fn list(
        &self,
        source: Option<FeedbackSource>,
        limit: Option<usize>,
    ) -> Result<Vec<FeedbackEntry>, ClientError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(source) = source {
            query.push(("source", source.as_str().to_string()));
        }
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }

        self.send(self.client.get(self.url("/api/feedback")).query(&query))
            .await
    }

    /// GET /api/feedback/stats
    pub async fn stats(&self) -> Result<StatsResponse, ClientError> {
        self.send(self.client.get(self.url("/api/feedback/stats")))
            .await
    }

    /// POST /api/feedback/guest
    pub async fn submit_guest(&self, sub: &GuestSubmission) -> Result<FeedbackEntry, ClientError> {
        self.post("/api/feedback/guest", sub).await
    }

    /// POST /api/feedback/staff
    pub async fn submit_staff(&self, log: &StaffLog) -> Result<FeedbackEntry, ClientError> {
        self.post("/api/feedback/staff", log).await
    }

    /// POST /api/feedback/session-tokens
    pub async fn issue_token(
        &self,
        req: &IssueTokenRequest,
    ) -> Result<IssueTokenResponse, ClientError> {
        self.post("/api/feedback/session-tokens", req).await
    }

    /// POST /api/chat/message
    pub async fn chat(&self, message: &str) -> Result<String, ClientError> {
        let reply: ChatReply = self
            .post(
                "/api/chat/message",
                &ChatRequest {
                    message: message.to_string(),
                },
            )
            .await?;
        Ok(reply.reply)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.send(self.client.post(self.url(path)).json(body)).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await.map_err(ClientError::from_transport)?;

        if response.status().is_success() {
            return response.json().await.map_err(ClientError::Request);
        }
        Err(ClientError::from_response(response).await)
    }
}

#[async_trait]
impl FeedbackFeed for ApiClient {
    async fn fetch(&self) -> Result<Vec<FeedbackEntry>, String> {
        self.list(None, None).await.map_err(|e| e.to_string())
    }
}

// ============================================
// Errors
// ============================================

/// Errors returned by [`ApiClient`]
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("API server unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with an error body
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        fields: Option<FormErrors>,
    },
}

impl ClientError {
    fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else if e.is_connect() {
            ClientError::Unavailable
        } else {
            ClientError::Request(e)
        }
    }

    async fn from_response(response: Response) -> Self {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let transport = format!("HTTP {}", status);

        ClientError::Api {
            status: status.as_u16(),
            message: failure_message(Some(&text), Some(&transport)),
            fields: parse_error_body(&text).and_then(|detail| detail.fields),
        }
    }

    /// Per-field form errors, when the server rejected a form
    pub fn fields(&self) -> Option<&FormErrors> {
        match self {
            ClientError::Api { fields, .. } => fields.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ApiClient::new("http://localhost:8082/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8082");
        assert_eq!(client.url("/health"), "http://localhost:8082/health");
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let client = ApiClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let err = client.health().await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Unavailable | ClientError::Timeout | ClientError::Request(_)
        ));
    }
}
