//! 애플리케이션 상태 관리

use crate::config::Config;
use crate::room::ChatRoom;
use crate::store::ChatStore;
use std::sync::Arc;

/// 핸들러와 정리 스케줄러가 공유하는 상태
pub struct AppState {
    /// 채팅방 (저장소 핸들 보유)
    pub room: ChatRoom,
    /// 설정
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn ChatStore>) -> Self {
        Self {
            room: ChatRoom::new(store),
            config: Arc::new(config),
        }
    }
}
