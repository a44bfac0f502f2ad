//! Bearer token model

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Opaque bearer credential bound to one user.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Token {
    pub id: Uuid,
    pub user_id: i64,
    pub creation_time: DateTime<Utc>,
}

impl Token {
    /// A token is still valid while `now - creation_time <= ttl`.
    pub fn is_expired_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.creation_time > ttl
    }
}
