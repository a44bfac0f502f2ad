//! Ownership checks: only the owning user may modify or delete their record

use crate::{error::AppError, models::token::Token};

pub const NO_ACCESS: &str = "user has no access";

/// 令牌所属用户必须与目标用户一致
pub fn authorize(token: &Token, target_user_id: i64) -> Result<(), AppError> {
    if token.user_id != target_user_id {
        tracing::warn!(
            token_user_id = token.user_id,
            target_user_id,
            "Ownership check failed"
        );
        return Err(AppError::forbidden(NO_ACCESS));
    }

    Ok(())
}
