//! Bate-Papo 채팅방 서버
//!
//! 참여자 등록, 공개/귓속말 메시지, 비활성 참여자 자동 퇴장을 제공하는
//! 폴링 방식 JSON/HTTP 백엔드.

pub mod config;
pub mod error;
pub mod handlers;
pub mod protocol;
pub mod room;
pub mod routes;
pub mod state;
pub mod store;
pub mod visibility;

pub use config::Config;
pub use error::{ChatError, StoreError};
pub use room::ChatRoom;
pub use routes::router;
pub use state::AppState;
pub use store::{ChatStore, MemoryStore};
