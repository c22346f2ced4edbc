//! 에러 타입 정의

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// 저장소 계층 에러
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// 요청 처리 에러
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("participant '{0}' already exists")]
    Conflict(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("only the sender may change this message")]
    Forbidden,

    #[error("recipient '{0}' is not in the room")]
    UnprocessableRecipient(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl ChatError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ChatError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ChatError::Conflict(_) => StatusCode::CONFLICT,
            ChatError::NotFound(_) => StatusCode::NOT_FOUND,
            ChatError::Forbidden => StatusCode::UNAUTHORIZED,
            ChatError::UnprocessableRecipient(_) => StatusCode::NOT_ACCEPTABLE,
            ChatError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 저장소 에러는 내부 사유를 노출하지 않음
        let body = match &self {
            ChatError::Storage(err) => {
                tracing::error!(error = %err, "Storage failure while handling request");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, body).into_response()
    }
}
