pub mod auth;
pub mod pages;
pub mod project;
pub mod stash;

use uuid::Uuid;

use crate::error::AppError;

/// Parse a path id. Anything that is not a UUID cannot name a row.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Not found".into()))
}
