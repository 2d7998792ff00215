use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_typed_multipart::TypedMultipartError;
use common::storage::StorageError;
use sea_orm::DbErr;
use serde::Serialize;

/// Structured error response returned by all API endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `UNAUTHORIZED`,
    /// `TOKEN_INVALID`, `FORBIDDEN`, `NOT_FOUND`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Name and image are required")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    Unauthorized,
    TokenInvalid,
    Forbidden,
    NotFound(String),
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized | AppError::TokenInvalid => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn into_body(self) -> ErrorBody {
        match self {
            AppError::Validation(msg) => ErrorBody {
                code: "VALIDATION_ERROR",
                message: msg,
            },
            AppError::Unauthorized => ErrorBody {
                code: "UNAUTHORIZED",
                message: "Unauthorized".into(),
            },
            AppError::TokenInvalid => ErrorBody {
                code: "TOKEN_INVALID",
                message: "Invalid or expired session".into(),
            },
            AppError::Forbidden => ErrorBody {
                code: "FORBIDDEN",
                message: "Forbidden".into(),
            },
            AppError::NotFound(msg) => ErrorBody {
                code: "NOT_FOUND",
                message: msg,
            },
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorBody {
                    code: "INTERNAL_ERROR",
                    message: "An unexpected error occurred".into(),
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(self.into_body())).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<TypedMultipartError> for AppError {
    fn from(err: TypedMultipartError) -> Self {
        AppError::Validation(format!("Multipart error: {err}"))
    }
}
