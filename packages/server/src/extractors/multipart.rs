use axum_typed_multipart::BaseMultipart;

use crate::error::AppError;

/// A typed multipart form whose parse failures surface as
/// `AppError::Validation`, so clients always receive structured JSON errors.
pub type AppMultipart<T> = BaseMultipart<T, AppError>;
