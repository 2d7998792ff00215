//! Server-rendered HTML views. Data is read at request time; every piece of
//! stored text goes through [`escape`] before it reaches the markup.

use std::fmt::Write;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Html;
use chrono::{DateTime, Utc};
use common::SessionUser;
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::{project, stash_item, user};
use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::handlers::auth::current_user;
use crate::state::AppState;
use crate::utils::html::escape;

type Page = Result<(StatusCode, Html<String>), AppError>;

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{} | CraftyKeep</title>\n</head>\n<body>\n\
         <nav><a href=\"/\">CraftyKeep</a></nav>\n<main>\n{}</main>\n</body>\n</html>\n",
        escape(title),
        body
    )
}

fn ok(title: &str, body: &str) -> Page {
    Ok((StatusCode::OK, Html(layout(title, body))))
}

fn not_found() -> Page {
    Ok((
        StatusCode::NOT_FOUND,
        Html(layout("Not found", "<h1>Not found</h1>\n<p><a href=\"/\">Back home</a></p>\n")),
    ))
}

fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}

/// Resolve a path id to a row id, or `None` when it cannot name one.
fn page_id(raw: &str) -> Option<Uuid> {
    super::parse_id(raw).ok()
}

#[instrument(skip(state, auth_user))]
pub async fn home(auth_user: Option<AuthUser>, State(state): State<AppState>) -> Page {
    let user = current_user(&state.db, auth_user).await?;

    let body = match user {
        Some(SessionUser { name, email, .. }) => {
            let who = name.or(email).unwrap_or_else(|| "crafter".into());
            format!(
                "<h1>Welcome back, {}!</h1>\n\
                 <p><a href=\"/projects\">Projects</a> | <a href=\"/stash\">Stash</a></p>\n",
                escape(&who)
            )
        }
        None => "<h1>CraftyKeep</h1>\n<p>Sign in to keep track of your projects and stash.</p>\n"
            .to_string(),
    };

    ok("Home", &body)
}

#[instrument(skip(state))]
pub async fn project_detail(State(state): State<AppState>, Path(id): Path<String>) -> Page {
    let Some(id) = page_id(&id) else {
        return not_found();
    };
    let Some(project) = project::Entity::find_by_id(id).one(&state.db).await? else {
        return not_found();
    };

    let body = format!(
        "<article>\n<h1>{name}</h1>\n<img src=\"{image}\" alt=\"{name}\">\n<p>{description}</p>\n\
         <p>Created {created}. Updated {updated}.</p>\n</article>\n\
         <p><a href=\"/projects\">Back to projects</a></p>\n",
        name = escape(&project.name),
        image = escape(&project.image_url),
        description = escape(&project.description),
        created = format_date(&project.created_at),
        updated = format_date(&project.updated_at),
    );

    ok(&project.name, &body)
}

#[instrument(skip(state))]
pub async fn stash_detail(State(state): State<AppState>, Path(id): Path<String>) -> Page {
    let Some(id) = page_id(&id) else {
        return not_found();
    };
    let Some(item) = stash_item::Entity::find_by_id(id).one(&state.db).await? else {
        return not_found();
    };

    let picture = match &item.image_url {
        Some(url) => format!(
            "<img src=\"{}\" alt=\"{}\">",
            escape(url),
            escape(&item.name)
        ),
        None => "<div class=\"placeholder\">No photo</div>".to_string(),
    };

    let body = format!(
        "<article>\n<h1>{}</h1>\n{}\n<p>{}</p>\n<p>Added {}.</p>\n</article>\n\
         <p><a href=\"/stash\">Back to stash</a></p>\n",
        escape(&item.name),
        picture,
        escape(&item.description),
        format_date(&item.created_at),
    );

    ok(&item.name, &body)
}

#[instrument(skip(state))]
pub async fn profile(State(state): State<AppState>, Path(id): Path<String>) -> Page {
    let Some(id) = page_id(&id) else {
        return not_found();
    };
    let Some(owner) = user::Entity::find_by_id(id).one(&state.db).await? else {
        return not_found();
    };

    let projects = project::Entity::find()
        .filter(project::Column::UserId.eq(owner.id))
        .order_by_desc(project::Column::CreatedAt)
        .order_by_desc(project::Column::Id)
        .all(&state.db)
        .await?;

    let owner = SessionUser::from(owner);
    let display = owner
        .name
        .clone()
        .or_else(|| owner.email.clone())
        .unwrap_or_else(|| "Unknown crafter".into());

    let mut body = String::from("<header>\n");
    match &owner.image {
        Some(image) => {
            let _ = writeln!(
                body,
                "<img class=\"avatar\" src=\"{}\" alt=\"{}\">",
                escape(image),
                escape(&display)
            );
        }
        None => {
            let _ = writeln!(
                body,
                "<div class=\"avatar\">{}</div>",
                escape(&owner.initial('?').to_string())
            );
        }
    }
    let _ = writeln!(body, "<h1>{}</h1>\n</header>", escape(&display));

    if projects.is_empty() {
        body.push_str("<p>No projects yet.</p>\n");
    } else {
        body.push_str("<ul>\n");
        for p in &projects {
            let _ = writeln!(
                body,
                "<li><a href=\"/projects/{}\">{}</a></li>",
                p.id,
                escape(&p.name)
            );
        }
        body.push_str("</ul>\n");
    }

    ok(&display, &body)
}
