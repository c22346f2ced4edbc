//! HTTP 요청 본문/쿼리 정의 및 검증

use crate::error::ChatError;
use crate::store::MessageKind;
use serde::Deserialize;

/// POST /participants
#[derive(Debug, Clone, Deserialize)]
pub struct NewParticipant {
    pub name: String,
}

impl NewParticipant {
    /// 검증 후 이름 반환
    pub fn validate(self) -> Result<String, ChatError> {
        non_blank("name", self.name)
    }
}

/// POST /messages, PUT /messages/:id
#[derive(Debug, Clone, Deserialize)]
pub struct NewMessage {
    pub to: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
}

impl NewMessage {
    pub fn validate(self) -> Result<Self, ChatError> {
        // status는 시스템 알림 전용
        if self.kind == MessageKind::Status {
            return Err(ChatError::validation(
                "type must be 'message' or 'private_message'",
            ));
        }

        Ok(Self {
            to: non_blank("to", self.to)?,
            text: non_blank("text", self.text)?,
            kind: self.kind,
        })
    }
}

/// GET /messages?limit=N
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListMessagesQuery {
    pub limit: Option<String>,
}

fn non_blank(field: &str, value: String) -> Result<String, ChatError> {
    if value.trim().is_empty() {
        return Err(ChatError::validation(format!("{} must not be empty", field)));
    }
    Ok(value)
}
