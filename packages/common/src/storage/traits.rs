use async_trait::async_trait;
use uuid::Uuid;

use super::error::StorageError;

/// Handle for bytes written to the staging area but not yet visible under a
/// public name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedUpload {
    pub id: Uuid,
    pub size: u64,
}

/// Storage for uploaded images.
///
/// Writes are two-phase: `stage` persists the bytes privately, `promote`
/// makes them visible under their final name. Callers write the database row
/// after promoting, inside a transaction, and remove the file if that fails.
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Write bytes to the staging area.
    async fn stage(&self, data: &[u8]) -> Result<StagedUpload, StorageError>;

    /// Move a staged upload to `filename`, or to a numbered variant of it
    /// when that name is taken. Returns the name used. Never overwrites.
    async fn promote(
        &self,
        staged: &StagedUpload,
        filename: &str,
    ) -> Result<String, StorageError>;

    /// Drop a staged upload. Missing files are not an error.
    async fn discard(&self, staged: &StagedUpload) -> Result<(), StorageError>;

    /// Delete a promoted file. Returns `false` if it did not exist.
    async fn remove(&self, filename: &str) -> Result<bool, StorageError>;

    /// Names of all promoted files.
    async fn list(&self) -> Result<Vec<String>, StorageError>;

    /// Everything still sitting in the staging area.
    async fn list_staged(&self) -> Result<Vec<StagedUpload>, StorageError>;

    /// Public-relative URL recorded in rows, e.g. `/uploads/{filename}`.
    fn public_url(&self, filename: &str) -> String;

    /// Inverse of [`UploadStore::public_url`].
    fn filename_from_url<'a>(&self, url: &'a str) -> Option<&'a str>;
}
