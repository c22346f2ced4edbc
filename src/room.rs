//! 채팅방 비즈니스 로직

use crate::error::ChatError;
use crate::store::models::threshold_millis;
use crate::store::{ChatStore, Message, MessageId, MessageKind, Participant};
use crate::visibility;
use std::sync::Arc;

/// 전체 수신자
pub const BROADCAST_RECIPIENT: &str = "Todos";
pub const JOIN_NOTICE: &str = "entra na sala...";
pub const LEAVE_NOTICE: &str = "sai da sala...";

/// 현재 시각 (epoch millis)
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// 주입된 저장소 핸들 위에서 동작하는 채팅방
#[derive(Clone)]
pub struct ChatRoom {
    store: Arc<dyn ChatStore>,
}

impl ChatRoom {
    pub fn new(store: Arc<dyn ChatStore>) -> Self {
        Self { store }
    }

    /// 참여자 등록 + 입장 알림
    pub async fn register(&self, name: &str) -> Result<Participant, ChatError> {
        let participant = Participant::new(name, now_millis());

        if !self.store.insert_participant(participant.clone()).await? {
            tracing::debug!(name = %name, "Registration rejected, name taken");
            return Err(ChatError::Conflict(name.to_string()));
        }

        self.store
            .insert_message(Message::new(
                name,
                BROADCAST_RECIPIENT,
                JOIN_NOTICE,
                MessageKind::Status,
            ))
            .await?;

        tracing::info!(name = %name, "Participant joined");
        Ok(participant)
    }

    pub async fn participants(&self) -> Result<Vec<Participant>, ChatError> {
        Ok(self.store.participants().await?)
    }

    /// Heartbeat 처리
    pub async fn heartbeat(&self, name: &str) -> Result<(), ChatError> {
        if !self.store.touch_participant(name, now_millis()).await? {
            return Err(ChatError::NotFound(format!("participant '{}'", name)));
        }
        tracing::debug!(name = %name, "Heartbeat");
        Ok(())
    }

    /// 메시지 전송. 수신자는 "Todos" 또는 현재 참여자여야 한다.
    pub async fn post(
        &self,
        from: &str,
        to: &str,
        text: &str,
        kind: MessageKind,
    ) -> Result<MessageId, ChatError> {
        if to != BROADCAST_RECIPIENT && self.store.find_participant(to).await?.is_none() {
            tracing::debug!(from = %from, to = %to, "Recipient not in room");
            return Err(ChatError::UnprocessableRecipient(to.to_string()));
        }

        let id = self
            .store
            .insert_message(Message::new(from, to, text, kind))
            .await?;

        tracing::info!(message_id = %id, from = %from, to = %to, kind = ?kind, "Message posted");
        Ok(id)
    }

    /// `viewer`에게 보이는 메시지 (선택적으로 마지막 `limit`개)
    pub async fn messages_for(
        &self,
        viewer: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Message>, ChatError> {
        let messages = self.store.messages().await?;
        Ok(visibility::limit(
            limit,
            visibility::visible_to(viewer, messages),
        ))
    }

    pub async fn find_message(&self, id: MessageId) -> Result<Message, ChatError> {
        self.store
            .find_message(id)
            .await?
            .ok_or_else(|| ChatError::NotFound(format!("message {}", id)))
    }

    /// 본문 수정 (보낸 사람만)
    pub async fn edit_message(
        &self,
        id: MessageId,
        text: &str,
        requester: &str,
    ) -> Result<(), ChatError> {
        self.ensure_owner(id, requester).await?;

        // 확인 이후 삭제된 경우
        if !self.store.update_message_text(id, text).await? {
            return Err(ChatError::NotFound(format!("message {}", id)));
        }

        tracing::info!(message_id = %id, requester = %requester, "Message edited");
        Ok(())
    }

    /// 메시지 삭제 (보낸 사람만)
    pub async fn delete_message(&self, id: MessageId, requester: &str) -> Result<(), ChatError> {
        self.ensure_owner(id, requester).await?;

        if !self.store.delete_message(id).await? {
            return Err(ChatError::NotFound(format!("message {}", id)));
        }

        tracing::info!(message_id = %id, requester = %requester, "Message deleted");
        Ok(())
    }

    async fn ensure_owner(&self, id: MessageId, requester: &str) -> Result<Message, ChatError> {
        let message = self.find_message(id).await?;
        if message.from != requester {
            tracing::warn!(message_id = %id, requester = %requester, "Rejected change by non-owner");
            return Err(ChatError::Forbidden);
        }
        Ok(message)
    }

    /// 오래된 참여자 퇴장 처리.
    ///
    /// 참여자 하나의 저장소 실패는 로그만 남기고 나머지는 계속 처리한다.
    pub async fn evict_stale(
        &self,
        now: i64,
        threshold_ms: u64,
    ) -> Result<Vec<Participant>, ChatError> {
        let participants = self.store.participants().await?;
        let cutoff = now.saturating_sub(threshold_millis(threshold_ms));
        let mut evicted = Vec::new();

        for participant in participants
            .into_iter()
            .filter(|p| p.is_stale(now, threshold_ms))
        {
            let removed = match self
                .store
                .remove_participant_if_stale(&participant.name, cutoff)
                .await
            {
                Ok(Some(removed)) => removed,
                Ok(None) => {
                    tracing::debug!(name = %participant.name, "Heartbeat arrived before eviction");
                    continue;
                }
                Err(err) => {
                    tracing::error!(name = %participant.name, error = %err, "Failed to evict participant");
                    continue;
                }
            };

            // 삭제는 이미 끝났으므로 알림 실패와 구분해서 기록
            if let Err(err) = self.announce_departure(&removed.name).await {
                tracing::error!(
                    name = %removed.name,
                    error = %err,
                    "Participant removed but leave notice was not stored"
                );
            } else {
                tracing::info!(name = %removed.name, last_status = removed.last_status, "Participant left (inactive)");
            }
            evicted.push(removed);
        }

        Ok(evicted)
    }

    async fn announce_departure(&self, name: &str) -> Result<MessageId, ChatError> {
        Ok(self
            .store
            .insert_message(Message::new(
                name,
                BROADCAST_RECIPIENT,
                LEAVE_NOTICE,
                MessageKind::Status,
            ))
            .await?)
    }

    /// 저장소 핸들 종료
    pub async fn close(&self) {
        self.store.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{StoreError, StoreResult};
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use futures::future::join_all;

    fn room() -> (ChatRoom, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (ChatRoom::new(store.clone()), store)
    }

    #[tokio::test]
    async fn register_appends_join_notice() {
        let (room, _) = room();
        room.register("Ann").await.unwrap();

        let messages = room.messages_for("Anyone", None).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].from, "Ann");
        assert_eq!(messages[0].to, BROADCAST_RECIPIENT);
        assert_eq!(messages[0].text, JOIN_NOTICE);
        assert_eq!(messages[0].kind, MessageKind::Status);
    }

    #[tokio::test]
    async fn concurrent_registration_of_one_name_succeeds_once() {
        let (room, _) = room();

        let attempts = join_all((0..16).map(|_| {
            let room = room.clone();
            async move { room.register("Ann").await }
        }))
        .await;

        let ok = attempts.iter().filter(|r| r.is_ok()).count();
        let conflicts = attempts
            .iter()
            .filter(|r| matches!(r, Err(ChatError::Conflict(_))))
            .count();
        assert_eq!(ok, 1);
        assert_eq!(conflicts, 15);
        assert_eq!(room.participants().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn heartbeat_requires_registration() {
        let (room, store) = room();
        assert!(matches!(
            room.heartbeat("Ghost").await,
            Err(ChatError::NotFound(_))
        ));

        store.insert_participant(Participant::new("Ann", 0)).await.unwrap();
        room.heartbeat("Ann").await.unwrap();
        let refreshed = store.find_participant("Ann").await.unwrap().unwrap();
        assert!(refreshed.last_status > 0);
    }

    #[tokio::test]
    async fn post_checks_recipient_exists() {
        let (room, _) = room();
        room.register("Ann").await.unwrap();

        room.post("Carl", "Ann", "secret", MessageKind::PrivateMessage)
            .await
            .unwrap();
        room.post("Carl", BROADCAST_RECIPIENT, "hi", MessageKind::Message)
            .await
            .unwrap();
        assert_eq!(
            room.post("Carl", "Nobody", "hey", MessageKind::Message).await,
            Err(ChatError::UnprocessableRecipient("Nobody".to_string()))
        );
    }

    #[tokio::test]
    async fn non_owner_cannot_edit_or_delete() {
        let (room, _) = room();
        let id = room
            .post("Ann", BROADCAST_RECIPIENT, "original", MessageKind::Message)
            .await
            .unwrap();

        assert_eq!(
            room.edit_message(id, "hacked", "Bob").await,
            Err(ChatError::Forbidden)
        );
        assert_eq!(room.delete_message(id, "Bob").await, Err(ChatError::Forbidden));
        assert_eq!(room.find_message(id).await.unwrap().text, "original");

        room.edit_message(id, "edited", "Ann").await.unwrap();
        assert_eq!(room.find_message(id).await.unwrap().text, "edited");

        room.delete_message(id, "Ann").await.unwrap();
        assert!(matches!(
            room.delete_message(id, "Ann").await,
            Err(ChatError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn eviction_removes_only_stale_participants() {
        let (room, store) = room();
        let now = 1_000_000;
        store
            .insert_participant(Participant::new("Old", now - 11_000))
            .await
            .unwrap();
        store
            .insert_participant(Participant::new("Fresh", now - 9_000))
            .await
            .unwrap();

        let evicted = room.evict_stale(now, 10_000).await.unwrap();
        assert_eq!(evicted, vec![Participant::new("Old", now - 11_000)]);

        let names: Vec<String> = room
            .participants()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Fresh"]);

        let messages = room.messages_for("Fresh", None).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].from, "Old");
        assert_eq!(messages[0].to, BROADCAST_RECIPIENT);
        assert_eq!(messages[0].text, LEAVE_NOTICE);
        assert_eq!(messages[0].kind, MessageKind::Status);
    }

    /// 특정 참여자 삭제만 실패하는 저장소
    struct FlakyStore {
        inner: MemoryStore,
        broken: &'static str,
        broken_notices: bool,
    }

    #[async_trait]
    impl ChatStore for FlakyStore {
        async fn insert_participant(&self, participant: Participant) -> StoreResult<bool> {
            self.inner.insert_participant(participant).await
        }
        async fn participants(&self) -> StoreResult<Vec<Participant>> {
            self.inner.participants().await
        }
        async fn find_participant(&self, name: &str) -> StoreResult<Option<Participant>> {
            self.inner.find_participant(name).await
        }
        async fn touch_participant(&self, name: &str, at: i64) -> StoreResult<bool> {
            self.inner.touch_participant(name, at).await
        }
        async fn remove_participant_if_stale(
            &self,
            name: &str,
            cutoff: i64,
        ) -> StoreResult<Option<Participant>> {
            if name == self.broken {
                return Err(StoreError::Unavailable("disk on fire".to_string()));
            }
            self.inner.remove_participant_if_stale(name, cutoff).await
        }
        async fn insert_message(&self, message: Message) -> StoreResult<MessageId> {
            if self.broken_notices && message.text == LEAVE_NOTICE {
                return Err(StoreError::Unavailable("log is read-only".to_string()));
            }
            self.inner.insert_message(message).await
        }
        async fn messages(&self) -> StoreResult<Vec<Message>> {
            self.inner.messages().await
        }
        async fn find_message(&self, id: MessageId) -> StoreResult<Option<Message>> {
            self.inner.find_message(id).await
        }
        async fn update_message_text(&self, id: MessageId, text: &str) -> StoreResult<bool> {
            self.inner.update_message_text(id, text).await
        }
        async fn delete_message(&self, id: MessageId) -> StoreResult<bool> {
            self.inner.delete_message(id).await
        }
        async fn close(&self) {
            self.inner.close().await
        }
    }

    #[tokio::test]
    async fn one_failed_eviction_does_not_stop_the_rest() {
        let store = Arc::new(FlakyStore {
            inner: MemoryStore::new(),
            broken: "Bob",
            broken_notices: false,
        });
        for name in ["Ann", "Bob", "Cid"] {
            store.insert_participant(Participant::new(name, 0)).await.unwrap();
        }
        let room = ChatRoom::new(store.clone());

        let evicted: Vec<String> = room
            .evict_stale(60_000, 10_000)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(evicted, vec!["Ann", "Cid"]);

        let remaining = room.participants().await.unwrap();
        assert_eq!(remaining, vec![Participant::new("Bob", 0)]);
    }

    #[tokio::test]
    async fn failed_leave_notice_still_reports_removal() {
        let store = Arc::new(FlakyStore {
            inner: MemoryStore::new(),
            broken: "",
            broken_notices: true,
        });
        store.insert_participant(Participant::new("Ann", 0)).await.unwrap();
        let room = ChatRoom::new(store.clone());

        let evicted = room.evict_stale(60_000, 10_000).await.unwrap();
        assert_eq!(evicted, vec![Participant::new("Ann", 0)]);
        assert!(room.participants().await.unwrap().is_empty());
        assert!(store.messages().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn huge_threshold_keeps_everyone() {
        let (room, _) = room();
        room.register("Ann").await.unwrap();

        let evicted = room.evict_stale(now_millis(), u64::MAX).await.unwrap();
        assert!(evicted.is_empty());
        assert_eq!(room.participants().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn closed_store_surfaces_storage_errors() {
        let (room, _) = room();
        room.close().await;
        assert!(matches!(
            room.register("Ann").await,
            Err(ChatError::Storage(_))
        ));
    }
}
