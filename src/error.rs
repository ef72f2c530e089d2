/*!
 * 错误处理模块
 *
 * 定义应用程序中所有可能出现的错误类型，并提供唯一的集中错误处理路径。
 * 业务错误（校验失败、资源不存在、数据冲突等）会按原样返回给客户端；
 * 未预期的错误只在服务端记录详细信息，客户端只会收到通用的 500 响应。
 */

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

/// 应用程序结果类型的别名
pub type AppResult<T> = Result<T, AppError>;

/// 返回给客户端的固定状态码集合
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    BadRequest = 400,
    NotFound = 404,
    Conflict = 409,
    InternalError = 500,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// 应用程序错误枚举
///
/// 前四个变体是业务错误（operational），其消息可以直接暴露给客户端；
/// 其余变体是未预期的错误，只在服务端日志中出现。
#[derive(Error, Debug)]
pub enum AppError {
    /// 请求验证错误
    /// 请求体格式错误、必填字段缺失、路径参数非法等
    #[error("{0}")]
    Validation(String),

    /// 资源未找到错误
    #[error("{0}")]
    NotFound(String),

    /// 数据冲突错误
    /// 写入时违反了数据库约束
    #[error("{0}")]
    Conflict(String),

    /// 已分类的内部错误
    /// 消息由服务层给出，不包含底层细节
    #[error("{0}")]
    Internal(String),

    /// 数据库操作错误
    /// 未经服务层翻译的底层失败
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 数据库迁移错误
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// 配置错误
    /// 环境变量缺失、配置格式错误等
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO 错误
    /// 端口绑定失败、日志文件无法打开等
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation(_) => ErrorCode::BadRequest,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::Conflict(_) => ErrorCode::Conflict,
            AppError::Internal(_)
            | AppError::Database(_)
            | AppError::Migration(_)
            | AppError::Config(_)
            | AppError::Io(_) => ErrorCode::InternalError,
        }
    }

    /// 是否为预期内的业务错误
    pub fn is_operational(&self) -> bool {
        match self {
            AppError::Validation(_)
            | AppError::NotFound(_)
            | AppError::Conflict(_)
            | AppError::Internal(_) => true,
            AppError::Database(_)
            | AppError::Migration(_)
            | AppError::Config(_)
            | AppError::Io(_) => false,
        }
    }
}

impl IntoResponse for AppError {
    /// 将错误转换为 HTTP 响应
    ///
    /// 响应体统一为 `{"status": "error", "message": ...}`
    fn into_response(self) -> Response {
        let code = self.code();

        let message = if self.is_operational() {
            debug!(status = code.status().as_u16(), "Request failed: {}", self);
            self.to_string()
        } else {
            error!("Unhandled error: {:?}", self);
            "Internal Server Error".to_string()
        };

        let body = Json(json!({
            "status": "error",
            "message": message
        }));

        (code.status(), body).into_response()
    }
}
