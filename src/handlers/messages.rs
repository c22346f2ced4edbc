//! 메시지 핸들러

use super::identity::{User, ValidJson};
use crate::error::ChatError;
use crate::protocol::{ListMessagesQuery, NewMessage};
use crate::state::AppState;
use crate::store::MessageId;
use crate::visibility;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

/// 메시지 전송
pub async fn handle_post_message(
    State(state): State<Arc<AppState>>,
    User(from): User,
    ValidJson(body): ValidJson<NewMessage>,
) -> Result<StatusCode, ChatError> {
    let body = body.validate()?;
    state
        .room
        .post(&from, &body.to, &body.text, body.kind)
        .await?;
    Ok(StatusCode::CREATED)
}

/// 메시지 목록 (가시성 필터 + limit)
pub async fn handle_list_messages(
    State(state): State<Arc<AppState>>,
    User(viewer): User,
    query: Result<Query<ListMessagesQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ChatError> {
    // 해석할 수 없는 쿼리(예: limit 중복)는 limit 없음으로 취급
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Ignoring unparsable message query");
            ListMessagesQuery::default()
        }
    };
    let limit = visibility::parse_limit(query.limit.as_deref());
    let messages = state.room.messages_for(&viewer, limit).await?;
    Ok(Json(messages))
}

/// 메시지 수정. 본문 전체 형식을 받지만 `text`만 반영한다.
pub async fn handle_edit_message(
    State(state): State<Arc<AppState>>,
    User(requester): User,
    Path(id): Path<String>,
    ValidJson(body): ValidJson<NewMessage>,
) -> Result<StatusCode, ChatError> {
    let body = body.validate()?;
    let id = parse_message_id(&id)?;
    state.room.edit_message(id, &body.text, &requester).await?;
    Ok(StatusCode::OK)
}

/// 메시지 삭제
pub async fn handle_delete_message(
    State(state): State<Arc<AppState>>,
    User(requester): User,
    Path(id): Path<String>,
) -> Result<StatusCode, ChatError> {
    let id = parse_message_id(&id)?;
    state.room.delete_message(id, &requester).await?;
    Ok(StatusCode::OK)
}

// 형식이 틀린 id는 존재하지 않는 메시지와 같게 취급
fn parse_message_id(raw: &str) -> Result<MessageId, ChatError> {
    raw.parse::<MessageId>()
        .map_err(|_| ChatError::NotFound(format!("message {}", raw)))
}
