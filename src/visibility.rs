//! 메시지 가시성 필터

use crate::store::Message;

/// `viewer`가 볼 수 있는 메시지만 남긴다. 순서 유지.
///
/// 귓속말(`private_message`)은 보낸 사람과 받는 사람에게만 보인다.
pub fn visible_to(viewer: &str, messages: Vec<Message>) -> Vec<Message> {
    messages
        .into_iter()
        .filter(|message| can_see(viewer, message))
        .collect()
}

pub fn can_see(viewer: &str, message: &Message) -> bool {
    !message.is_private() || message.from == viewer || message.to == viewer
}

/// 마지막 `n`개만 남긴다. `n`이 없거나 길이 이상이면 그대로 반환.
pub fn limit<T>(n: Option<usize>, mut items: Vec<T>) -> Vec<T> {
    match n {
        Some(n) if n < items.len() => items.split_off(items.len() - n),
        _ => items,
    }
}

/// 쿼리 문자열의 limit 파싱. 음이 아닌 정수가 아니면 `None`.
pub fn parse_limit(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
}
