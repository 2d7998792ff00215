//! Image persistence that keeps the upload directory and the database in step.
//!
//! Order of operations for a create with an image:
//! 1. compute and validate the filename (400 on bad names),
//! 2. stage the bytes under `.tmp/`,
//! 3. open a transaction,
//! 4. promote the staged file, which settles the final name,
//! 5. insert the row carrying that name's URL,
//! 6. commit.
//!
//! Every failure after step 2 undoes what was done so far. A process crash
//! can still leave a staged or promoted file behind;
//! `maintenance::sweep_uploads` removes those.

use chrono::Utc;
use common::storage::{StagedUpload, UploadStore, upload_filename};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    TransactionTrait,
};

use crate::error::AppError;
use crate::models::shared::ImageUpload;

/// A staged image waiting for its row.
#[derive(Debug)]
pub struct PendingImage {
    staged: StagedUpload,
    /// Requested name; `promote` may add a numbered suffix.
    filename: String,
}

/// Validate the filename and write the bytes to the staging area.
pub async fn stage_image(
    store: &dyn UploadStore,
    prefix: &str,
    image: &ImageUpload,
) -> Result<PendingImage, AppError> {
    let filename = upload_filename(prefix, Utc::now().timestamp_millis(), &image.original_name)
        .map_err(|e| AppError::Validation(e.message().into()))?;

    let staged = store.stage(&image.bytes).await?;
    tracing::debug!(%filename, size = staged.size, "Staged upload");

    Ok(PendingImage { staged, filename })
}

async fn discard(store: &dyn UploadStore, image: Option<&PendingImage>) {
    if let Some(image) = image
        && let Err(e) = store.discard(&image.staged).await
    {
        tracing::warn!(filename = %image.filename, "Failed to discard staged upload: {e}");
    }
}

async fn remove_promoted(store: &dyn UploadStore, filename: Option<&str>) {
    if let Some(filename) = filename
        && let Err(e) = store.remove(filename).await
    {
        tracing::warn!(%filename, "Failed to remove upload after rollback: {e}");
    }
}

/// Publish `image` and insert the row `build` makes from its public URL, as
/// one unit.
pub async fn insert_with_image<A, F>(
    db: &DatabaseConnection,
    store: &dyn UploadStore,
    image: Option<PendingImage>,
    build: F,
) -> Result<<A::Entity as EntityTrait>::Model, AppError>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    F: FnOnce(Option<String>) -> A,
{
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(e) => {
            discard(store, image.as_ref()).await;
            return Err(e.into());
        }
    };

    let promoted = match &image {
        Some(image) => match store.promote(&image.staged, &image.filename).await {
            Ok(name) => {
                if name != image.filename {
                    tracing::debug!(requested = %image.filename, %name, "Upload name was taken");
                }
                Some(name)
            }
            Err(e) => {
                discard(store, Some(image)).await;
                return Err(e.into());
            }
        },
        None => None,
    };

    let active = build(promoted.as_deref().map(|name| store.public_url(name)));
    let model = match active.insert(&txn).await {
        Ok(model) => model,
        Err(e) => {
            // Dropping `txn` rolls back.
            remove_promoted(store, promoted.as_deref()).await;
            return Err(e.into());
        }
    };

    if let Err(e) = txn.commit().await {
        remove_promoted(store, promoted.as_deref()).await;
        return Err(e.into());
    }

    Ok(model)
}
