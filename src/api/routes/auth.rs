//! Auth Routes
//!
//! - POST /api/auth/login - Mock login against configured accounts
//!
//! No session or token is created; the UI stores the returned user.

use axum::{extract::State, Json};
use habesha_core::{LoginRequest, User};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<User>> {
    req.validate()
        .map_err(|msg| ApiError::Validation(msg.to_string()))?;

    let username = req.username.trim();
    let account = state
        .config
        .auth
        .accounts
        .iter()
        .find(|a| a.username.eq_ignore_ascii_case(username) && a.password == req.password);

    match account {
        Some(account) => {
            tracing::info!(username = %account.username, role = %account.role, "Mock login");
            Ok(Json(User {
                name: account.name.clone(),
                role: account.role,
            }))
        }
        None => {
            tracing::info!(username = %username, "Mock login rejected");
            Err(ApiError::Unauthorized(
                "Invalid username or password.".to_string(),
            ))
        }
    }
}
