/// Errors that can occur while storing uploaded files.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The name and every numbered variant of it are taken.
    #[error("upload already exists: {0}")]
    AlreadyExists(String),
    /// The staged file is gone (already promoted, discarded or swept).
    #[error("staged upload not found: {0}")]
    StagedNotFound(String),
}
