// ABOUTME: Shared API response types and error handling
// ABOUTME: Provides consistent response format across all API endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
};
use serde::Serialize;
use tracing::error;

use taskdeck_tasks::{ServiceError, ValidationError};

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ErrorBody>,
}

/// Structured failure payload: machine-readable code plus human detail
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<ValidationError>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: &'static str, detail: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ErrorBody {
                code,
                detail,
                fields: None,
            }),
        }
    }
}

/// Wrapper that converts service errors into HTTP responses at the API edge
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        ApiError(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let code = self.0.code();

        let (status, body) = match &self.0 {
            ServiceError::Validation(errors) => {
                let detail = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join("; ");
                let body = ApiResponse::<()> {
                    success: false,
                    data: None,
                    error: Some(ErrorBody {
                        code,
                        detail,
                        fields: Some(errors.clone()),
                    }),
                };
                (StatusCode::BAD_REQUEST, body)
            }
            ServiceError::NotFound => (
                StatusCode::NOT_FOUND,
                ApiResponse::<()>::error(code, self.0.to_string()),
            ),
            ServiceError::Duplicate(_) => (
                StatusCode::CONFLICT,
                ApiResponse::<()>::error(code, self.0.to_string()),
            ),
            ServiceError::TitleMismatch => (
                StatusCode::BAD_REQUEST,
                ApiResponse::<()>::error(code, self.0.to_string()),
            ),
            ServiceError::Storage(source) => {
                // Never leak storage internals to the caller
                error!("Storage failure: {}", source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::<()>::error(code, "Internal storage error".to_string()),
                )
            }
        };

        (status, ResponseJson(body)).into_response()
    }
}
