use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use common::api::ErrorResponse;
use tracing::error;

/// Application error type for the agent's HTTP handlers.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

pub type ApiResult<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn forbidden_origin() -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            code: "forbidden_origin",
            message: "forbidden: caller address not allowed".to_string(),
        }
    }

    pub fn invalid_key() -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            code: "invalid_key",
            message: "invalid activation key".to_string(),
        }
    }

    pub fn invalid_status(raw: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "invalid_status",
            message: format!("invalid status provided: \"{raw}\""),
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "internal_error",
            message: msg.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message,
            code: self.code.to_string(),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        error!(?err, "internal error");
        AppError::internal("internal server error")
    }
}
