//! User repository (数据库访问层)
//!
//! 所有方法接收 `&mut PgConnection`，由调用方决定是否在事务中执行。

use crate::{error::AppError, models::user::User};
use sqlx::PgConnection;

/// Field changes for a partial update. `None` leaves the column untouched.
#[derive(Debug, Default, Clone)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password_hash.is_none()
    }
}

pub struct UserRepository;

impl UserRepository {
    /// 创建用户，邮箱唯一约束由数据库保证
    pub async fn create(
        conn: &mut PgConnection,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, registration_time
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(conn)
        .await
        .map_err(|e| conflict_or(e, "such user already exists"))
    }

    /// 根据 ID 查找用户
    pub async fn find_by_id(conn: &mut PgConnection, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, registration_time FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(user)
    }

    /// 根据邮箱查找用户
    pub async fn find_by_email(
        conn: &mut PgConnection,
        email: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, registration_time FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(conn)
        .await?;

        Ok(user)
    }

    /// 部分更新用户
    pub async fn update(
        conn: &mut PgConnection,
        id: i64,
        changes: &UserUpdate,
    ) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET
                email = COALESCE($2, email),
                password_hash = COALESCE($3, password_hash)
            WHERE id = $1
            RETURNING id, email, password_hash, registration_time
            "#,
        )
        .bind(id)
        .bind(&changes.email)
        .bind(&changes.password_hash)
        .fetch_optional(conn)
        .await
        .map_err(|e| conflict_or(e, "attr already exists"))
    }

    /// 删除用户
    pub async fn delete(conn: &mut PgConnection, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// 唯一约束冲突映射为 Conflict，其余保持数据库错误
fn conflict_or(error: sqlx::Error, message: &str) -> AppError {
    match &error {
        sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
            tracing::debug!(constraint = ?db_error.constraint(), "Unique constraint violated");
            AppError::conflict(message)
        }
        _ => AppError::Database(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_update_is_empty() {
        assert!(UserUpdate::default().is_empty());
        assert!(!UserUpdate {
            email: Some("a@b.cd".to_string()),
            password_hash: None,
        }
        .is_empty());
    }

    #[test]
    fn test_non_unique_errors_stay_database_errors() {
        let error = conflict_or(sqlx::Error::RowNotFound, "such user already exists");
        assert!(matches!(error, AppError::Database(_)));
    }
}
