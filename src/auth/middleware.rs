//! 令牌请求头提取

use axum::{extract::FromRequestParts, http::HeaderMap};
use std::convert::Infallible;

/// Header carrying the bearer token.
pub const TOKEN_HEADER: &str = "token";

/// Raw value of the `token` header, if any. Never rejects: a missing or
/// malformed token is reported by the operation after the target user lookup.
#[derive(Debug, Clone, Default)]
pub struct TokenHeader(pub Option<String>);

impl TokenHeader {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for TokenHeader
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        Ok(TokenHeader(extract_token(&parts.headers)))
    }
}

/// 从 `token` 头提取令牌
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}
