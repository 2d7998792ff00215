use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use common::{SessionResponse, SessionUser};
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::user;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::auth::{SignInRequest, SignInResponse, validate_sign_in_request};
use crate::state::AppState;
use crate::utils::jwt;

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((state.config.auth.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(state.config.auth.session_ttl_days))
        .build()
}

/// Find the user by email, creating it on first sign-in. Profile fields from
/// the provider refresh the stored ones when present.
pub async fn upsert_user(
    db: &DatabaseConnection,
    email: &str,
    name: Option<String>,
    image: Option<String>,
) -> Result<user::Model, AppError> {
    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?;

    if let Some(existing) = existing {
        if name.is_none() && image.is_none() {
            return Ok(existing);
        }
        let mut active: user::ActiveModel = existing.into();
        if let Some(name) = name {
            active.name = Set(Some(name));
        }
        if let Some(image) = image {
            active.image = Set(Some(image));
        }
        return Ok(active.update(db).await?);
    }

    let new_user = user::ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set(name),
        email: Set(Some(email.to_string())),
        image: Set(image),
    };

    match new_user.insert(db).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "Created user on first sign-in");
            Ok(user)
        }
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            tracing::debug!("Sign-in race: unique constraint caught on insert");
            user::Entity::find()
                .filter(user::Column::Email.eq(email))
                .one(db)
                .await?
                .ok_or_else(|| AppError::Internal("user missing after unique violation".into()))
        }
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/signin",
    tag = "Auth",
    operation_id = "signIn",
    summary = "Complete sign-in for a provider-verified identity",
    description = "Creates the user on first sign-in and issues a session token, returned in the \
        body and set as an HttpOnly cookie.",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = SignInResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, jar, payload))]
pub async fn sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<SignInRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_sign_in_request(&payload)?;

    let email = payload.email.trim().to_lowercase();
    let user = upsert_user(&state.db, &email, payload.name, payload.image).await?;

    let token = jwt::sign(
        user.id,
        state.config.auth.session_ttl_days,
        &state.config.auth.jwt_secret,
    )
    .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

    let jar = jar.add(session_cookie(&state, token.clone()));
    Ok((
        jar,
        Json(SignInResponse {
            token,
            user: SessionUser::from(user),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/auth/signout",
    tag = "Auth",
    operation_id = "signOut",
    summary = "Clear the session cookie",
    responses((status = 204, description = "Signed out")),
)]
#[instrument(skip(state, jar))]
pub async fn sign_out(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(Cookie::build(state.config.auth.cookie_name.clone()).path("/"));
    (jar, StatusCode::NO_CONTENT)
}

/// Resolve the optional session to the stored user.
pub async fn current_user(
    db: &DatabaseConnection,
    auth_user: Option<AuthUser>,
) -> Result<Option<SessionUser>, AppError> {
    let Some(auth_user) = auth_user else {
        return Ok(None);
    };
    Ok(user::Entity::find_by_id(auth_user.user_id)
        .one(db)
        .await?
        .map(SessionUser::from))
}

#[utoipa::path(
    get,
    path = "/auth/session",
    tag = "Auth",
    operation_id = "getSession",
    summary = "Return the current session, if any",
    responses((status = 200, description = "Session (user is null when signed out)", body = SessionResponse)),
)]
#[instrument(skip(state, auth_user))]
pub async fn session(
    auth_user: Option<AuthUser>,
    State(state): State<AppState>,
) -> Result<Json<SessionResponse>, AppError> {
    let user = current_user(&state.db, auth_user).await?;
    Ok(Json(SessionResponse { user }))
}
