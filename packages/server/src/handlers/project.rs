use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use common::{DeleteResponse, Project};
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::project;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::multipart::AppMultipart;
use crate::handlers::parse_id;
use crate::models::project::{ProjectForm, validate_project_form};
use crate::models::shared::ListQuery;
use crate::state::AppState;
use crate::upload::{insert_with_image, stage_image};
use crate::utils::search::{like_any, matches_query, normalize_query};

#[utoipa::path(
    get,
    path = "/projects",
    tag = "Projects",
    operation_id = "listProjects",
    summary = "List all projects, newest first",
    description = "Returns every project regardless of owner. With `q`, only projects whose name or \
        description contains `q` (case-sensitive) are returned.",
    params(ListQuery),
    responses(
        (status = 200, description = "Projects", body = Vec<Project>),
        (status = 500, description = "Internal error (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Project>>, AppError> {
    let q = normalize_query(query.q.as_deref());

    let mut select = project::Entity::find()
        .order_by_desc(project::Column::CreatedAt)
        .order_by_desc(project::Column::Id);
    if let Some(q) = q {
        select = select.filter(like_any(
            [project::Column::Name, project::Column::Description],
            q,
        ));
    }

    let projects = select
        .all(&state.db)
        .await?
        .into_iter()
        .filter(|p| q.is_none_or(|q| matches_query(&p.name, &p.description, q)))
        .map(Project::from)
        .collect();

    Ok(Json(projects))
}

#[utoipa::path(
    post,
    path = "/projects",
    tag = "Projects",
    operation_id = "createProject",
    summary = "Create a project with a cover photo",
    description = "`name` and `image` are required. The project is owned by the signed-in user, \
        or left without an owner for anonymous callers.",
    request_body(content = ProjectForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Project created", body = Project),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Internal error (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, auth_user, form))]
pub async fn create_project(
    auth_user: Option<AuthUser>,
    State(state): State<AppState>,
    form: AppMultipart<ProjectForm>,
) -> Result<impl IntoResponse, AppError> {
    let input = validate_project_form(form.data)?;
    let image = stage_image(&*state.uploads, "", &input.image).await?;

    let owner = auth_user.map(|u| u.user_id);
    let now = Utc::now();
    let build = |url: Option<String>| project::ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set(input.name),
        description: Set(input.description),
        image_url: Set(url.unwrap_or_default()),
        user_id: Set(owner),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = insert_with_image(&state.db, &*state.uploads, Some(image), build).await?;
    tracing::info!(project_id = %model.id, "Project created");

    Ok((StatusCode::CREATED, Json(Project::from(model))))
}

#[utoipa::path(
    delete,
    path = "/projects/{id}",
    tag = "Projects",
    operation_id = "deleteProject",
    summary = "Delete a project",
    description = "Only the owner may delete a project.",
    params(("id" = String, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project deleted", body = DeleteResponse),
        (status = 401, description = "Not signed in (UNAUTHORIZED, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Project not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Internal error (INTERNAL_ERROR)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn delete_project(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = parse_id(&id)?;

    let txn = state.db.begin().await?;

    let project = project::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Not found".into()))?;

    auth_user.require_owner(project.user_id)?;

    project::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(project_id = %id, "Project deleted");
    Ok(Json(DeleteResponse::OK))
}
