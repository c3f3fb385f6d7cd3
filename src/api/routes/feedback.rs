//! Feedback Routes
//!
//! Endpoints for submitting and reading feedback.
//!
//! - GET /api/feedback - List entries, newest first
//! - POST /api/feedback/guest - General guest form
//! - POST /api/feedback/staff - Staff observation log
//! - POST /api/feedback/contextual - QR-code location form
//! - GET /api/feedback/stats - Dashboard statistics

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use habesha_core::validation::{validate_contextual, validate_guest, validate_staff};
use habesha_core::{
    ContextualSubmission, DashboardStats, FeedbackEntry, FeedbackSource, GuestSubmission,
    RatingDistribution, StaffLog,
};
use std::sync::Arc;

use crate::api::dto::{ListFeedbackQuery, StatsResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::storage::ListFilter;

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// GET /api/feedback
///
/// List stored entries, optionally filtered by source. Without a `limit`
/// every entry is returned; a given `limit` is capped by `api.list_limit`.
pub async fn list_feedback(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListFeedbackQuery>,
) -> ApiResult<Json<Vec<FeedbackEntry>>> {
    let source = match query.source.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(s) => Some(
            s.parse::<FeedbackSource>()
                .map_err(|e| ApiError::Validation(e.to_string()))?,
        ),
    };

    let max = state.config.api.list_limit;
    let limit = query.limit.map(|l| l.min(max));

    let entries = state.store.list(ListFilter { source, limit })?;

    Ok(Json(entries))
}

/// POST /api/feedback/guest
pub async fn submit_guest(
    State(state): State<Arc<AppState>>,
    Json(sub): Json<GuestSubmission>,
) -> ApiResult<(StatusCode, Json<FeedbackEntry>)> {
    validate_guest(&sub).map_err(ApiError::InvalidForm)?;

    let entry = FeedbackEntry::guest(new_id(), Utc::now(), &sub);
    state.store.insert(&entry)?;

    tracing::info!(
        id = %entry.id,
        rating = sub.rating,
        negative = entry.is_negative,
        "Guest feedback stored"
    );
    Ok((StatusCode::CREATED, Json(entry)))
}

/// POST /api/feedback/staff
pub async fn submit_staff(
    State(state): State<Arc<AppState>>,
    Json(log): Json<StaffLog>,
) -> ApiResult<(StatusCode, Json<FeedbackEntry>)> {
    validate_staff(&log).map_err(ApiError::InvalidForm)?;

    let entry = FeedbackEntry::staff(new_id(), Utc::now(), &log);
    state.store.insert(&entry)?;

    tracing::info!(
        id = %entry.id,
        category = ?entry.category,
        severity = ?entry.severity,
        "Staff log stored"
    );
    Ok((StatusCode::CREATED, Json(entry)))
}

/// POST /api/feedback/contextual
///
/// Locations that need a session token are re-validated here; the guest
/// name is taken from the token, not from the request.
pub async fn submit_contextual(
    State(state): State<Arc<AppState>>,
    Json(mut sub): Json<ContextualSubmission>,
) -> ApiResult<(StatusCode, Json<FeedbackEntry>)> {
    validate_contextual(&sub).map_err(ApiError::InvalidForm)?;

    let now = Utc::now();
    sub.context.guest_name = None;

    if sub.context.loc.requires_token() {
        let token = sub.context.token.as_deref().unwrap_or_default();
        let validation =
            state
                .sessions
                .validate(token, sub.context.loc, sub.context.id.as_deref(), now)?;

        if !validation.valid {
            return Err(ApiError::InvalidSession(
                validation.failure_message().to_string(),
            ));
        }
        let info = validation.context.unwrap_or_default();
        sub.context.guest_name = info.guest_name;
        // A room-bound token still names its room when the link omits it
        if sub.context.id.as_deref().map_or(true, |id| id.trim().is_empty()) {
            sub.context.id = info.location_id;
        }
    }

    let entry = FeedbackEntry::contextual(new_id(), now, &sub);
    state.store.insert(&entry)?;

    tracing::info!(
        id = %entry.id,
        loc = %sub.context.loc,
        overall = ?entry.overall_rating,
        attachments = entry.attachments.len(),
        "Contextual feedback stored"
    );
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/feedback/stats
///
/// Widget statistics and rating distribution over all stored entries.
pub async fn get_stats(State(state): State<Arc<AppState>>) -> ApiResult<Json<StatsResponse>> {
    let entries = state.store.list(ListFilter::default())?;

    let stats = DashboardStats::compute(&entries);
    let distribution = RatingDistribution::from_entries(&entries);

    Ok(Json(StatsResponse::new(stats, &distribution)))
}
