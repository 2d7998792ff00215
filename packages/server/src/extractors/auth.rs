use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{header, request::Parts},
};
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Authenticated user resolved from the session token.
///
/// The token is taken from `Authorization: Bearer <token>` or, failing that,
/// from the session cookie set at sign-in. Add `AuthUser` as a handler
/// parameter to require a session; use `Option<AuthUser>` where anonymous
/// callers are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
}

impl AuthUser {
    /// `Ok(())` if this user owns the resource, `Err(Forbidden)` otherwise.
    ///
    /// Legacy resources without an owner belong to nobody.
    pub fn require_owner(&self, owner: Option<Uuid>) -> Result<(), AppError> {
        if owner == Some(self.user_id) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

fn session_token(parts: &Parts, cookie_name: &str) -> Option<String> {
    let bearer = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    bearer.or_else(|| {
        CookieJar::from_headers(&parts.headers)
            .get(cookie_name)
            .map(|c| c.value().to_string())
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token =
            session_token(parts, &state.config.auth.cookie_name).ok_or(AppError::Unauthorized)?;

        let claims =
            jwt::verify(&token, &state.config.auth.jwt_secret).map_err(|_| AppError::TokenInvalid)?;

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}

impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    /// Missing and invalid sessions both resolve to `None`.
    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        match <AuthUser as FromRequestParts<AppState>>::from_request_parts(parts, state).await {
            Ok(user) => Ok(Some(user)),
            Err(AppError::Unauthorized) => Ok(None),
            Err(AppError::TokenInvalid) => {
                tracing::debug!("Ignoring invalid session token on optional-auth route");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
