//! Chat Routes
//!
//! - POST /api/chat/message - Ask HahuBot a question

use axum::{extract::State, Json};
use habesha_core::{ChatReply, ChatRequest};
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::state::AppState;

/// POST /api/chat/message
pub async fn chat_message(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Json<ChatReply>> {
    let reply = state.chat.reply(&req.message).await?;
    Ok(Json(ChatReply { reply }))
}
