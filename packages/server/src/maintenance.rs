//! Offline housekeeping run from the `craftykeep` CLI.

use std::collections::HashSet;

use anyhow::bail;
use common::storage::UploadStore;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::entity::{project, stash_item, user};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// Nobody has signed in yet, so there is no one to link to.
    NoUsers,
    Linked { user_id: Uuid, count: u64 },
}

/// Assign every project without an owner to `user_id`, or to the first user
/// to have signed in when `None`.
pub async fn link_orphan_projects(
    db: &DatabaseConnection,
    user_id: Option<Uuid>,
) -> anyhow::Result<LinkOutcome> {
    let owner = match user_id {
        Some(id) => match user::Entity::find_by_id(id).one(db).await? {
            Some(owner) => owner,
            None => bail!("user {id} does not exist"),
        },
        // UUIDv7 ids sort by creation time.
        None => match user::Entity::find()
            .order_by_asc(user::Column::Id)
            .one(db)
            .await?
        {
            Some(owner) => owner,
            None => return Ok(LinkOutcome::NoUsers),
        },
    };

    info!(user_id = %owner.id, name = ?owner.name, "Linking orphan projects");

    let result = project::Entity::update_many()
        .col_expr(project::Column::UserId, Expr::value(owner.id))
        .filter(project::Column::UserId.is_null())
        .exec(db)
        .await?;

    info!(count = result.rows_affected, "Orphan projects linked");
    Ok(LinkOutcome::Linked {
        user_id: owner.id,
        count: result.rows_affected,
    })
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Staging ids that were (or would be) discarded.
    pub staged: Vec<Uuid>,
    /// Promoted files that no row points at.
    pub unreferenced: Vec<String>,
    pub dry_run: bool,
}

/// Every filename some row still points at.
async fn referenced_filenames(
    db: &DatabaseConnection,
    store: &dyn UploadStore,
) -> anyhow::Result<HashSet<String>> {
    let project_urls: Vec<String> = project::Entity::find()
        .select_only()
        .column(project::Column::ImageUrl)
        .into_tuple()
        .all(db)
        .await?;

    let stash_urls: Vec<Option<String>> = stash_item::Entity::find()
        .select_only()
        .column(stash_item::Column::ImageUrl)
        .into_tuple()
        .all(db)
        .await?;

    Ok(project_urls
        .iter()
        .chain(stash_urls.iter().flatten())
        .filter_map(|url| store.filename_from_url(url))
        .map(str::to_string)
        .collect())
}

/// Remove leftovers from interrupted uploads: everything in the staging area
/// and every promoted file no row references.
///
/// Meant to run while the server is stopped; an upload in flight would have
/// its staged bytes removed.
pub async fn sweep_uploads(
    db: &DatabaseConnection,
    store: &dyn UploadStore,
    dry_run: bool,
) -> anyhow::Result<SweepReport> {
    let referenced = referenced_filenames(db, store).await?;
    let mut report = SweepReport {
        dry_run,
        ..Default::default()
    };

    for staged in store.list_staged().await? {
        if !dry_run {
            store.discard(&staged).await?;
        }
        report.staged.push(staged.id);
    }

    for filename in store.list().await? {
        if referenced.contains(&filename) {
            continue;
        }
        if !dry_run && !store.remove(&filename).await? {
            warn!(%filename, "File vanished during sweep");
            continue;
        }
        report.unreferenced.push(filename);
    }

    info!(
        staged = report.staged.len(),
        unreferenced = report.unreferenced.len(),
        dry_run,
        "Upload sweep finished"
    );
    Ok(report)
}
