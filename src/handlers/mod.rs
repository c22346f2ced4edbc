//! 핸들러 모듈

pub mod identity;
pub mod messages;
pub mod participants;
pub mod presence;

pub use identity::*;
pub use messages::*;
pub use participants::*;
pub use presence::*;
