//! 문서 저장소 추상화

pub mod memory;
pub mod models;

pub use memory::MemoryStore;
pub use models::{Message, MessageId, MessageKind, Participant};

use crate::error::StoreResult;
use async_trait::async_trait;

/// 참여자/메시지 두 컬렉션을 가진 저장소 핸들.
///
/// 각 연산은 문서 하나 단위로 원자적이어야 한다.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// 같은 이름이 없을 때만 삽입. 삽입했으면 `true`.
    async fn insert_participant(&self, participant: Participant) -> StoreResult<bool>;

    /// 입장 순서대로 모든 참여자
    async fn participants(&self) -> StoreResult<Vec<Participant>>;

    async fn find_participant(&self, name: &str) -> StoreResult<Option<Participant>>;

    /// `last_status` 갱신. 참여자가 없으면 `false`.
    async fn touch_participant(&self, name: &str, at: i64) -> StoreResult<bool>;

    /// `last_status <= cutoff` 인 경우에만 삭제하고 삭제된 레코드 반환
    async fn remove_participant_if_stale(
        &self,
        name: &str,
        cutoff: i64,
    ) -> StoreResult<Option<Participant>>;

    async fn insert_message(&self, message: Message) -> StoreResult<MessageId>;

    /// 삽입 순서(오래된 것 먼저)대로 모든 메시지
    async fn messages(&self) -> StoreResult<Vec<Message>>;

    async fn find_message(&self, id: MessageId) -> StoreResult<Option<Message>>;

    /// 메시지가 없으면 `false`
    async fn update_message_text(&self, id: MessageId, text: &str) -> StoreResult<bool>;

    /// 메시지가 없으면 `false`
    async fn delete_message(&self, id: MessageId) -> StoreResult<bool>;

    /// 핸들 종료. 이후 모든 연산은 실패한다.
    async fn close(&self);
}
