use common::SessionUser;
use serde::{Deserialize, Serialize};

use crate::entity::user;
use crate::error::AppError;

/// Identity asserted by the sign-in provider callback.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SignInRequest {
    /// Account email; the stable key used to find or create the user.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Display name.
    #[schema(example = "Ada")]
    pub name: Option<String>,
    /// Avatar URL.
    pub image: Option<String>,
}

pub fn validate_sign_in_request(payload: &SignInRequest) -> Result<(), AppError> {
    let email = payload.email.trim();
    if email.is_empty() || email.chars().count() > 254 {
        return Err(AppError::Validation("Email must be 1-254 characters".into()));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(AppError::Validation("Email must be a valid address".into())),
    }
}

/// Successful sign-in response. The token is also set as a cookie.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SignInResponse {
    pub token: String,
    pub user: SessionUser,
}

impl From<user::Model> for SessionUser {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            image: user.image,
        }
    }
}
