//! Token store: issuing and resolving opaque bearer tokens
//!
//! Malformed, unknown and expired tokens all resolve to the same
//! `Forbidden("incorrect token")` so callers cannot probe for existence.

use crate::{
    config::SecurityConfig,
    error::AppError,
    models::{token::Token, user::User},
    repository::TokenRepository,
};
use chrono::{DateTime, Duration, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

pub const INCORRECT_TOKEN: &str = "incorrect token";

#[derive(Debug, Clone, Copy)]
pub struct TokenStore {
    ttl: Duration,
}

impl TokenStore {
    pub fn new(ttl_secs: u64) -> Self {
        let ttl = i64::try_from(ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);

        Self { ttl }
    }

    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(config.token_ttl_secs)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 为用户签发新令牌
    pub async fn issue(&self, conn: &mut PgConnection, user: &User) -> Result<Token, AppError> {
        let token = TokenRepository::insert(conn, Uuid::new_v4(), user.id, Utc::now()).await?;

        tracing::debug!(user_id = user.id, "Token issued");
        Ok(token)
    }

    /// 解析请求头中的令牌并检查有效期
    pub async fn resolve(
        &self,
        conn: &mut PgConnection,
        raw: Option<&str>,
    ) -> Result<Token, AppError> {
        let id = parse_token_id(raw)?;

        let token = TokenRepository::find_by_id(conn, id).await?.ok_or_else(|| {
            tracing::debug!("Token not found");
            AppError::forbidden(INCORRECT_TOKEN)
        })?;

        self.ensure_fresh(token, Utc::now())
    }

    fn ensure_fresh(&self, token: Token, now: DateTime<Utc>) -> Result<Token, AppError> {
        if token.is_expired_at(now, self.ttl) {
            tracing::debug!(user_id = token.user_id, "Token expired");
            return Err(AppError::forbidden(INCORRECT_TOKEN));
        }

        Ok(token)
    }
}

/// 令牌必须是合法的 UUID
pub fn parse_token_id(raw: Option<&str>) -> Result<Uuid, AppError> {
    raw.map(str::trim)
        .and_then(|value| Uuid::parse_str(value).ok())
        .ok_or_else(|| {
            tracing::debug!("Malformed or missing token");
            AppError::forbidden(INCORRECT_TOKEN)
        })
}
