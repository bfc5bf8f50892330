use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use vs_core::error::AppError;

/// HTTP-facing error. Wraps [`AppError`] and renders a JSON body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] AppError),

    #[error("template rendering failed: {0}")]
    Render(#[from] askama::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Core(AppError::ValidationRejected(_)) => "VALIDATION_REJECTED",
            ApiError::Core(AppError::SubmissionInFlight) => "SUBMISSION_IN_FLIGHT",
            ApiError::Core(AppError::StoreUnavailable(_)) => "STORE_UNAVAILABLE",
            ApiError::Core(AppError::FeedUnavailable(_)) => "FEED_UNAVAILABLE",
            ApiError::Render(_) => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Core(AppError::ValidationRejected(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Core(AppError::SubmissionInFlight) => StatusCode::CONFLICT,
            ApiError::Core(AppError::StoreUnavailable(_) | AppError::FeedUnavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
            tracing::error!(error = %self, "internal error");
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(status).json(json!({ "error": self.code(), "message": message }))
    }
}
