//! Session Token Routes
//!
//! - GET /api/feedback/validate-token - Check a QR link's token
//! - POST /api/feedback/session-tokens - Mint a token for a QR code

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use habesha_core::{ContextLink, LocationCode, TokenValidation};
use std::sync::Arc;

use crate::api::dto::{IssueTokenRequest, IssueTokenResponse, ValidateTokenQuery};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::sessions::IssueRequest;

/// GET /api/feedback/validate-token?tok=&loc=&id=
///
/// Always answers 200 for link problems so the page can show the message;
/// only storage failures are errors.
pub async fn validate_token(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ValidateTokenQuery>,
) -> ApiResult<Json<TokenValidation>> {
    let link = match ContextLink::from_query(
        query.loc.as_deref(),
        query.id.as_deref(),
        query.tok.as_deref(),
        None,
    ) {
        Ok(link) => link,
        Err(e) => return Ok(Json(TokenValidation::rejected(e.to_string()))),
    };

    let token = link.token.as_deref().unwrap_or_default();
    let result = state
        .sessions
        .validate(token, link.loc, link.id.as_deref(), Utc::now())?;

    tracing::debug!(loc = %link.loc, valid = result.valid, "Validated session token");
    Ok(Json(result))
}

/// POST /api/feedback/session-tokens
///
/// Unauthenticated: login is a mock with no server-side identity.
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IssueTokenRequest>,
) -> ApiResult<(StatusCode, Json<IssueTokenResponse>)> {
    let loc: LocationCode = req
        .loc
        .parse()
        .map_err(|_| ApiError::Validation(format!("Unsupported feedback location code: {}.", req.loc)))?;

    let token = state.sessions.issue(
        IssueRequest {
            loc,
            id: req.id,
            guest_name: req.guest_name,
            ttl_hours: req.ttl_hours,
        },
        Utc::now(),
    )?;

    let mut link = format!(
        "/f?loc={}&tok={}",
        token.loc.as_str(),
        urlencoding::encode(&token.token)
    );
    if let Some(id) = &token.location_id {
        link.push_str("&id=");
        link.push_str(&urlencoding::encode(id));
    }

    Ok((
        StatusCode::CREATED,
        Json(IssueTokenResponse {
            token: token.token,
            loc: token.loc.as_str().to_string(),
            id: token.location_id,
            guest_name: token.guest_name,
            expires_at: token.expires_at,
            link,
        }),
    ))
}
