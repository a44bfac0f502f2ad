//! 请求体校验
//!
//! Each function turns a raw payload into validated values, or collects every
//! failing field into `AppError::BadRequest` before any core operation runs.

use crate::{
    auth::PasswordPolicy,
    error::{AppError, FieldError},
    models::user::{LoginRequest, PatchUserRequest, RegisterRequest},
};
use validator::ValidateEmail;

pub const INVALID_EMAIL: &str = "value is not a valid email address";
pub const WEAK_PASSWORD: &str = "password is too easy";

/// Email and plaintext password that passed validation.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Validated subset of user fields to change.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub fn validate_register(
    req: RegisterRequest,
    policy: &PasswordPolicy,
) -> Result<Credentials, AppError> {
    let mut errors = Vec::new();

    let email = required("email", req.email, &mut errors)
        .and_then(|e| check_email("email", e, &mut errors));
    let password = required("password", req.password, &mut errors)
        .and_then(|p| strong_password("password", p, policy, &mut errors));

    match (email, password) {
        (Some(email), Some(password)) if errors.is_empty() => Ok(Credentials { email, password }),
        _ => Err(AppError::BadRequest(errors)),
    }
}

pub fn validate_login(req: LoginRequest) -> Result<Credentials, AppError> {
    let mut errors = Vec::new();

    let email = required("email", req.email, &mut errors)
        .and_then(|e| check_email("email", e, &mut errors));
    let password = required("password", req.password, &mut errors);

    match (email, password) {
        (Some(email), Some(password)) if errors.is_empty() => Ok(Credentials { email, password }),
        _ => Err(AppError::BadRequest(errors)),
    }
}

pub fn validate_patch(
    req: PatchUserRequest,
    policy: &PasswordPolicy,
) -> Result<UserChanges, AppError> {
    let mut errors = Vec::new();

    let email = req.email.and_then(|e| check_email("email", e, &mut errors));
    let password = req
        .password
        .and_then(|p| strong_password("password", p, policy, &mut errors));

    if !errors.is_empty() {
        return Err(AppError::BadRequest(errors));
    }

    Ok(UserChanges { email, password })
}

fn required(field: &str, value: Option<String>, errors: &mut Vec<FieldError>) -> Option<String> {
    if value.is_none() {
        errors.push(FieldError::missing(field));
    }
    value
}

/// 邮箱去除首尾空白并转为小写
fn check_email(field: &str, value: String, errors: &mut Vec<FieldError>) -> Option<String> {
    let normalized = value.trim().to_lowercase();

    if !normalized.validate_email() {
        errors.push(FieldError::new(field, INVALID_EMAIL, "value_error.email"));
        return None;
    }

    Some(normalized)
}

fn strong_password(
    field: &str,
    value: String,
    policy: &PasswordPolicy,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    if !policy.is_satisfied_by(&value) {
        errors.push(FieldError::new(field, WEAK_PASSWORD, "value_error"));
        return None;
    }

    Some(value)
}
