mod error;
mod filename;
mod traits;

pub mod filesystem;

pub use error::StorageError;
pub use filename::{FilenameError, upload_filename, validate_flat_filename};
pub use traits::{StagedUpload, UploadStore};
