use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::{ApiResponse, DomainError, TodoError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Todo not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // 内部エラーの詳細はログにのみ残し、クライアントには汎用メッセージを返す
        let message = match &self {
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                "Internal Server Error".to_string()
            }
            other => {
                tracing::debug!(error = %other, status = status.as_u16(), "Request rejected");
                other.to_string()
            }
        };

        (status, Json(ApiResponse::<()>::failure(message))).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvalidTodoId(_) => ApiError::BadRequest("Invalid todo ID".to_string()),
            DomainError::Validation(message) => ApiError::BadRequest(message),
        }
    }
}

impl From<TodoError> for ApiError {
    fn from(e: TodoError) -> Self {
        match e {
            TodoError::Validation(message) => ApiError::BadRequest(message),
            TodoError::NotFound(_) => ApiError::NotFound,
            TodoError::Storage(detail) => ApiError::Internal(detail),
            TodoError::Domain(inner) => inner.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid JSON: {}", e.body_text()))
    }
}

/// パスから ID を取り出せない場合（不正な UTF-8 など）も ID 不正として扱う
impl From<PathRejection> for ApiError {
    fn from(e: PathRejection) -> Self {
        tracing::debug!(error = %e.body_text(), "Path rejected");
        ApiError::BadRequest("Invalid todo ID".to_string())
    }
}
