//! HTTP API Client
//!
//! Functions for communicating with the Habesha Feedback REST API. Every
//! call goes through [`send`], which returns the decoded body or the
//! message to show the user.

use gloo_net::http::{Request, Response};
use habesha_core::auth::LoginRequest;
use habesha_core::chat::{ChatReply, ChatRequest};
use habesha_core::session::{ContextLink, TokenValidation};
use habesha_core::wire::failure_message;
use habesha_core::{ContextualSubmission, FeedbackEntry, GuestSubmission, StaffLog, User};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8082/api";

const API_URL_KEY: &str = "habesha_api_url";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_URL_KEY).ok().flatten())
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    url.trim_end_matches('/').to_string()
}

fn url(path: &str) -> String {
    format!("{}{}", get_api_base(), path)
}

/// Send a request and decode a JSON body.
///
/// Failures carry the server's `error.message`, else the transport error,
/// else a generic message.
async fn send<T: DeserializeOwned>(request: Result<Request, gloo_net::Error>) -> Result<T, String> {
    let request = request.map_err(|e| failure_message(None, Some(&e.to_string())))?;

    let response: Response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            web_sys::console::error_1(&format!("Network error: {}", e).into());
            return Err(failure_message(None, Some(&format!("Network error: {}", e))));
        }
    };

    if !response.ok() {
        let status = response.status();
        let body = response.text().await.ok();
        let message = failure_message(
            body.as_deref(),
            Some(&format!("Request failed with status {}", status)),
        );
        web_sys::console::error_1(&format!("API error ({}): {}", status, message).into());
        return Err(message);
    }

    response
        .json::<T>()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

async fn post<B: Serialize, T: DeserializeOwned>(path: &str, body: &B) -> Result<T, String> {
    send(Request::post(&url(path)).json(body)).await
}

// ============ API Functions ============

/// Fetch all feedback entries, newest first
pub async fn fetch_feedback() -> Result<Vec<FeedbackEntry>, String> {
    send(Request::get(&url("/feedback")).build()).await
}

pub async fn submit_guest(submission: &GuestSubmission) -> Result<FeedbackEntry, String> {
    post("/feedback/guest", submission).await
}

pub async fn submit_staff(log: &StaffLog) -> Result<FeedbackEntry, String> {
    post("/feedback/staff", log).await
}

pub async fn submit_contextual(
    submission: &ContextualSubmission,
) -> Result<FeedbackEntry, String> {
    post("/feedback/contextual", submission).await
}

/// Check the session token of a room or check-out link
pub async fn validate_token(link: &ContextLink) -> Result<TokenValidation, String> {
    let path = format!("/feedback/validate-token?{}", link.validation_query());
    send(Request::get(&url(&path)).build()).await
}

pub async fn login(request: &LoginRequest) -> Result<User, String> {
    post("/auth/login", request).await
}

pub async fn send_chat(message: String) -> Result<ChatReply, String> {
    post("/chat/message", &ChatRequest { message }).await
}
