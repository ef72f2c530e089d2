/*!
 * 请求校验模块
 *
 * 每个路由在进入处理函数之前都会先经过这里的校验：
 * - `Validated<T>`：解析 JSON 或 URL 编码的请求体并执行对应 schema
 * - `TodoId`：校验路径参数 `:id` 只包含数字
 *
 * 校验失败会直接短路为 `AppError::Validation`（400）。
 */

use crate::error::AppError;
use crate::models::{CreateTodoRequest, UpdateTodoRequest};
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header::CONTENT_TYPE, request::Parts},
    Form, Json,
};
use regex::Regex;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::OnceLock;

/// 单个字段的校验失败
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Invalid {}: {}", self.field, self.reason)
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(())
}

impl Validate for CreateTodoRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("title", &self.title)
    }
}

impl Validate for UpdateTodoRequest {
    // An empty object is structurally valid.
    fn validate(&self) -> Result<(), ValidationError> {
        match &self.title {
            Some(title) => require_non_empty("title", title),
            None => Ok(()),
        }
    }
}

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]+$").expect("id pattern is valid"))
}

/// 校验并解析路径中的 todo id
pub fn parse_todo_id(raw: &str) -> Result<i64, ValidationError> {
    if !id_pattern().is_match(raw) {
        return Err(ValidationError::new("id", "must be a non-negative integer"));
    }

    raw.parse::<i64>()
        .map_err(|_| ValidationError::new("id", "is out of range"))
}

/// 经过 schema 校验的请求体
///
/// 根据 `Content-Type` 选择 JSON 或 URL 编码解析，解析失败和校验失败都返回 400。
#[derive(Debug, Clone)]
pub struct Validated<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Validated<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false);

        let value = if is_form {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
            value
        } else {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
            value
        };

        value.validate()?;
        Ok(Validated(value))
    }
}

/// 已校验的 `:id` 路径参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for TodoId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        Ok(TodoId(parse_todo_id(&raw)?))
    }
}
