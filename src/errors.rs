use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use thiserror::Error;

/// Failures from the external narrative-generation capability.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM provider is not configured")]
    NotConfigured,
    #[error("LLM request timed out")]
    Timeout,
    #[error("Rate limited by LLM provider")]
    RateLimited,
    #[error("LLM network error: {0}")]
    NetworkError(String),
    #[error("LLM API error: {0}")]
    ApiError(String),
    #[error("Invalid LLM response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Db(sqlx::Error),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
    #[error("Generation already in flight: {0}")]
    ConcurrentGeneration(String),
    #[error("LLM error: {0}")]
    Llm(LlmError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::InsufficientData(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, msg).into_response()
            }
            AppError::ConcurrentGeneration(msg) => (StatusCode::CONFLICT, msg).into_response(),
            AppError::Llm(LlmError::RateLimited) => {
                let mut headers = HeaderMap::new();
                headers.insert("Retry-After", HeaderValue::from_static("60"));
                (StatusCode::TOO_MANY_REQUESTS, headers, "Rate limited").into_response()
            }
            AppError::Llm(LlmError::NotConfigured) => {
                (StatusCode::SERVICE_UNAVAILABLE, "AI service is not configured").into_response()
            }
            AppError::Llm(err) => (StatusCode::BAD_GATEWAY, err.to_string()).into_response(),
            AppError::Db(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(value: sqlx::Error) -> Self {
        AppError::Db(value)
    }
}

impl From<LlmError> for AppError {
    fn from(value: LlmError) -> Self {
        AppError::Llm(value)
    }
}
