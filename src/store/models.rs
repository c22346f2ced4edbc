//! 저장되는 레코드 정의

use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type MessageId = Uuid;

/// 채팅방 참여자
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub name: String,
    /// 마지막 heartbeat 시각 (epoch millis)
    pub last_status: i64,
}

impl Participant {
    pub fn new(name: impl Into<String>, last_status: i64) -> Self {
        Self {
            name: name.into(),
            last_status,
        }
    }

    /// `now` 기준으로 `threshold_ms` 이상 heartbeat가 없었는지
    pub fn is_stale(&self, now: i64, threshold_ms: u64) -> bool {
        now.saturating_sub(self.last_status) >= threshold_millis(threshold_ms)
    }
}

/// i64 범위를 넘는 임계값은 i64::MAX로 고정 (아무도 만료되지 않음)
pub fn threshold_millis(threshold_ms: u64) -> i64 {
    i64::try_from(threshold_ms).unwrap_or(i64::MAX)
}

/// 메시지 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Message,
    PrivateMessage,
    Status,
}

/// 채팅 메시지
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: MessageId,
    pub from: String,
    pub to: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// HH:mm:ss
    pub time: String,
}

impl Message {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        text: impl Into<String>,
        kind: MessageKind,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            from: from.into(),
            to: to.into(),
            text: text.into(),
            kind,
            time: Local::now().format("%H:%M:%S").to_string(),
        }
    }

    pub fn is_private(&self) -> bool {
        self.kind == MessageKind::PrivateMessage
    }
}
