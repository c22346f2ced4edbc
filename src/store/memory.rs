//! 인메모리 저장소

use super::{ChatStore, Message, MessageId, Participant};
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;

struct ParticipantEntry {
    joined_seq: u64,
    participant: Participant,
}

/// `DashMap` 참여자 맵 + 삽입 순서 메시지 로그
#[derive(Default)]
pub struct MemoryStore {
    /// 참여자 (name -> entry)
    participants: DashMap<String, ParticipantEntry>,
    join_seq: AtomicU64,
    /// 메시지 로그
    messages: RwLock<Vec<Message>>,
    closed: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Unavailable("store is closed".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ChatStore for MemoryStore {
    async fn insert_participant(&self, participant: Participant) -> StoreResult<bool> {
        self.ensure_open()?;

        // entry()가 샤드 락을 잡고 있으므로 확인과 삽입이 한 단계
        match self.participants.entry(participant.name.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(vacant) => {
                let joined_seq = self.join_seq.fetch_add(1, Ordering::Relaxed);
                vacant.insert(ParticipantEntry {
                    joined_seq,
                    participant,
                });
                Ok(true)
            }
        }
    }

    async fn participants(&self) -> StoreResult<Vec<Participant>> {
        self.ensure_open()?;

        let mut entries: Vec<(u64, Participant)> = self
            .participants
            .iter()
            .map(|entry| (entry.joined_seq, entry.participant.clone()))
            .collect();
        entries.sort_by_key(|(seq, _)| *seq);

        Ok(entries.into_iter().map(|(_, p)| p).collect())
    }

    async fn find_participant(&self, name: &str) -> StoreResult<Option<Participant>> {
        self.ensure_open()?;
        Ok(self
            .participants
            .get(name)
            .map(|entry| entry.participant.clone()))
    }

    async fn touch_participant(&self, name: &str, at: i64) -> StoreResult<bool> {
        self.ensure_open()?;

        match self.participants.get_mut(name) {
            Some(mut entry) => {
                entry.participant.last_status = at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_participant_if_stale(
        &self,
        name: &str,
        cutoff: i64,
    ) -> StoreResult<Option<Participant>> {
        self.ensure_open()?;

        Ok(self
            .participants
            .remove_if(name, |_, entry| entry.participant.last_status <= cutoff)
            .map(|(_, entry)| entry.participant))
    }

    async fn insert_message(&self, message: Message) -> StoreResult<MessageId> {
        self.ensure_open()?;

        let id = message.id;
        self.messages.write().await.push(message);
        Ok(id)
    }

    async fn messages(&self) -> StoreResult<Vec<Message>> {
        self.ensure_open()?;
        Ok(self.messages.read().await.clone())
    }

    async fn find_message(&self, id: MessageId) -> StoreResult<Option<Message>> {
        self.ensure_open()?;
        Ok(self
            .messages
            .read()
            .await
            .iter()
            .find(|message| message.id == id)
            .cloned())
    }

    async fn update_message_text(&self, id: MessageId, text: &str) -> StoreResult<bool> {
        self.ensure_open()?;

        let mut messages = self.messages.write().await;
        match messages.iter_mut().find(|message| message.id == id) {
            Some(message) => {
                message.text = text.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_message(&self, id: MessageId) -> StoreResult<bool> {
        self.ensure_open()?;

        let mut messages = self.messages.write().await;
        match messages.iter().position(|message| message.id == id) {
            Some(index) => {
                messages.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
        tracing::info!("Memory store closed");
    }
}
