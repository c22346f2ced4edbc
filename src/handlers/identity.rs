//! 요청 추출기: `user` 헤더 신원, 검증용 JSON 본문

use crate::error::ChatError;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

pub const USER_HEADER: &str = "user";

/// `user` 헤더로 전달된 호출자 이름. 인증은 하지 않는다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for User
where
    S: Send + Sync,
{
    type Rejection = ChatError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_HEADER)
            .ok_or_else(|| ChatError::validation("missing 'user' header"))?;

        // 비 ASCII 이름(예: "João")도 UTF-8이면 허용
        let name = std::str::from_utf8(value.as_bytes())
            .map_err(|_| ChatError::validation("'user' header is not valid UTF-8"))?;

        if name.trim().is_empty() {
            return Err(ChatError::validation("'user' header must not be empty"));
        }

        Ok(Self(name.to_string()))
    }
}

/// axum 기본 JSON 거부(400/415)를 422로 바꾸는 추출기
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ChatError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ChatError::validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}
