//! 참여자 핸들러

use super::identity::{User, ValidJson};
use crate::error::ChatError;
use crate::protocol::NewParticipant;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

/// 참여자 등록
pub async fn handle_register(
    State(state): State<Arc<AppState>>,
    ValidJson(body): ValidJson<NewParticipant>,
) -> Result<StatusCode, ChatError> {
    let name = body.validate()?;
    state.room.register(&name).await?;
    Ok(StatusCode::CREATED)
}

/// 참여자 목록 (필터링 없음)
pub async fn handle_list_participants(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ChatError> {
    let participants = state.room.participants().await?;
    Ok(Json(participants))
}

/// Heartbeat (POST /status)
pub async fn handle_status(
    State(state): State<Arc<AppState>>,
    User(name): User,
) -> Result<StatusCode, ChatError> {
    state.room.heartbeat(&name).await?;
    Ok(StatusCode::OK)
}
