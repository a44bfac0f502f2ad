//! 用户资源的 HTTP 处理器

use super::{json_body, user_id};
use crate::{
    auth::TokenHeader,
    error::AppError,
    middleware::AppState,
    models::user::PatchUserRequest,
    validation,
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

/// 获取用户详情
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = user_id(path)?;

    let user = state.account_service.get_user(id).await?;

    Ok(Json(user))
}

/// 更新用户
pub async fn patch_user(
    State(state): State<Arc<AppState>>,
    token: TokenHeader,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PatchUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    // 先校验请求体，再查找目标用户
    let req = json_body(payload)?;
    let changes = validation::validate_patch(req, state.account_service.password_policy())?;
    let id = user_id(path)?;

    let user = state
        .account_service
        .patch_user(id, token.as_deref(), changes)
        .await?;

    Ok(Json(user))
}

/// 删除用户
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    token: TokenHeader,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = user_id(path)?;

    let response = state
        .account_service
        .delete_user(id, token.as_deref())
        .await?;

    Ok(Json(response))
}
