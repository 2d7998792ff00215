use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use common::{DeleteResponse, StashItem};
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::stash_item;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::multipart::AppMultipart;
use crate::handlers::parse_id;
use crate::models::shared::ListQuery;
use crate::models::stash::{StashForm, validate_stash_form};
use crate::state::AppState;
use crate::upload::{insert_with_image, stage_image};
use crate::utils::search::{like_any, matches_query, normalize_query};

/// Filename prefix for stash photos.
const STASH_PREFIX: &str = "stash-";

#[utoipa::path(
    get,
    path = "/stash",
    tag = "Stash",
    operation_id = "listStash",
    summary = "List the caller's stash, newest first",
    description = "Only items owned by the signed-in user are returned. With `q`, only items whose \
        name or description contains `q` (case-sensitive) are returned.",
    params(ListQuery),
    responses(
        (status = 200, description = "Stash items", body = Vec<StashItem>),
        (status = 401, description = "Not signed in (UNAUTHORIZED, TOKEN_INVALID)", body = ErrorBody),
        (status = 500, description = "Internal error (INTERNAL_ERROR)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id = %auth_user.user_id))]
pub async fn list_stash(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<StashItem>>, AppError> {
    let q = normalize_query(query.q.as_deref());

    let mut select = stash_item::Entity::find()
        .filter(stash_item::Column::UserId.eq(auth_user.user_id))
        .order_by_desc(stash_item::Column::CreatedAt)
        .order_by_desc(stash_item::Column::Id);
    if let Some(q) = q {
        select = select.filter(like_any(
            [stash_item::Column::Name, stash_item::Column::Description],
            q,
        ));
    }

    let items = select
        .all(&state.db)
        .await?
        .into_iter()
        .filter(|item| q.is_none_or(|q| matches_query(&item.name, &item.description, q)))
        .map(StashItem::from)
        .collect();

    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/stash",
    tag = "Stash",
    operation_id = "createStashItem",
    summary = "Add an item to the caller's stash",
    description = "`name` and `description` are required; `image` is optional and ignored when \
        the file part is empty or unnamed.",
    request_body(content = StashForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Item created", body = StashItem),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Not signed in (UNAUTHORIZED, TOKEN_INVALID)", body = ErrorBody),
        (status = 500, description = "Internal error (INTERNAL_ERROR)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user, form), fields(user_id = %auth_user.user_id))]
pub async fn create_stash_item(
    auth_user: AuthUser,
    State(state): State<AppState>,
    form: AppMultipart<StashForm>,
) -> Result<impl IntoResponse, AppError> {
    let input = validate_stash_form(form.data)?;

    let image = match &input.image {
        Some(image) => Some(stage_image(&*state.uploads, STASH_PREFIX, image).await?),
        None => None,
    };

    let build = |url: Option<String>| stash_item::ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set(input.name),
        description: Set(input.description),
        image_url: Set(url),
        user_id: Set(auth_user.user_id),
        created_at: Set(Utc::now()),
    };

    let model = insert_with_image(&state.db, &*state.uploads, image, build).await?;
    tracing::info!(item_id = %model.id, "Stash item created");

    Ok((StatusCode::CREATED, Json(StashItem::from(model))))
}

#[utoipa::path(
    delete,
    path = "/stash/{id}",
    tag = "Stash",
    operation_id = "deleteStashItem",
    summary = "Delete a stash item",
    description = "Only the owner may delete an item.",
    params(("id" = String, Path, description = "Stash item ID")),
    responses(
        (status = 200, description = "Item deleted", body = DeleteResponse),
        (status = 401, description = "Not signed in (UNAUTHORIZED, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Item not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Internal error (INTERNAL_ERROR)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn delete_stash_item(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = parse_id(&id)?;

    let txn = state.db.begin().await?;

    let item = stash_item::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Not found".into()))?;

    auth_user.require_owner(Some(item.user_id))?;

    stash_item::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(item_id = %id, "Stash item deleted");
    Ok(Json(DeleteResponse::OK))
}
