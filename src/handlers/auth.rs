//! 注册与登录的 HTTP 处理器

use super::json_body;
use crate::{
    error::AppError,
    middleware::AppState,
    models::user::{LoginRequest, RegisterRequest},
    validation,
};
use axum::{extract::rejection::JsonRejection, extract::State, response::IntoResponse, Json};
use std::sync::Arc;

/// 注册
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let req = json_body(payload)?;
    let credentials =
        validation::validate_register(req, state.account_service.password_policy())?;

    let response = state.account_service.register(credentials).await?;

    Ok(Json(response))
}

/// 登录
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let req = json_body(payload)?;
    let credentials = validation::validate_login(req)?;

    let response = state.account_service.login(credentials).await?;

    Ok(Json(response))
}
