//! HTTP 处理器模块

pub mod auth;
pub mod health;
pub mod user;

use crate::{
    error::{AppError, FieldError},
    services::account_service::USER_NOT_FOUND,
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path,
    },
    http::StatusCode,
    Json,
};

pub const BODY_TOO_LARGE: &str = "request body too large";
pub const ROUTE_NOT_FOUND: &str = "not found";

/// 请求体解析失败统一映射为字段错误
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::debug!(error = %rejection.body_text(), "Request body over limit");
            Err(AppError::PayloadTooLarge(BODY_TOO_LARGE.to_string()))
        }
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "Rejected request body");
            Err(AppError::field(FieldError::new(
                "body",
                &rejection.body_text(),
                "json_invalid",
            )))
        }
    }
}

/// 非整数的用户 ID 不可能对应任何用户
pub(crate) fn user_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    path.map(|Path(id)| id).map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected user id");
        AppError::not_found(USER_NOT_FOUND)
    })
}

/// 未匹配任何路由
pub async fn route_not_found() -> AppError {
    AppError::not_found(ROUTE_NOT_FOUND)
}

/// 路由存在但方法不支持
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
