use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

/// Room for multipart boundaries and the text fields around the photo.
const FORM_OVERHEAD: usize = 64 * 1024;

/// JSON API, nested under `/api` by the caller.
pub fn api_routes(max_upload_size: usize) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(auth_routes())
        .merge(project_routes(max_upload_size))
        .merge(stash_routes(max_upload_size))
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::sign_in))
        .routes(routes!(handlers::auth::sign_out))
        .routes(routes!(handlers::auth::session))
}

fn project_routes(max_upload_size: usize) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::project::list_projects,
            handlers::project::create_project
        ))
        .routes(routes!(handlers::project::delete_project))
        .layer(upload_body_limit(max_upload_size))
}

fn stash_routes(max_upload_size: usize) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::stash::list_stash,
            handlers::stash::create_stash_item
        ))
        .routes(routes!(handlers::stash::delete_stash_item))
        .layer(upload_body_limit(max_upload_size))
}

fn upload_body_limit(max_size: usize) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_size.saturating_add(FORM_OVERHEAD))
}

/// Server-rendered HTML views.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::pages::home))
        .route("/projects/{id}", get(handlers::pages::project_detail))
        .route("/stash/{id}", get(handlers::pages::stash_detail))
        .route("/profile/{id}", get(handlers::pages::profile))
}
