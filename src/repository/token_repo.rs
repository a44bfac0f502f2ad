//! Token repository (令牌数据访问)

use crate::{error::AppError, models::token::Token};
use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

pub struct TokenRepository;

impl TokenRepository {
    /// 存储令牌
    pub async fn insert(
        conn: &mut PgConnection,
        id: Uuid,
        user_id: i64,
        creation_time: DateTime<Utc>,
    ) -> Result<Token, AppError> {
        let token = sqlx::query_as::<_, Token>(
            r#"
            INSERT INTO tokens (id, user_id, creation_time)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, creation_time
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(creation_time)
        .fetch_one(conn)
        .await?;

        Ok(token)
    }

    /// 根据 ID 查找令牌
    pub async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<Token>, AppError> {
        let token = sqlx::query_as::<_, Token>(
            "SELECT id, user_id, creation_time FROM tokens WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(token)
    }

    /// 删除用户的全部令牌
    pub async fn delete_by_user(conn: &mut PgConnection, user_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}
