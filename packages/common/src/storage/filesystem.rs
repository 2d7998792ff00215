use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use super::error::StorageError;
use super::traits::{StagedUpload, UploadStore};

const STAGING_DIR: &str = ".tmp";

/// Suffixes tried before giving up on a taken name.
const MAX_NAME_ATTEMPTS: u32 = 100;

/// `filename` for attempt 0, then `stem-1.ext`, `stem-2.ext`, ...
fn numbered_name(filename: &str, attempt: u32) -> String {
    if attempt == 0 {
        return filename.to_string();
    }
    match filename.rfind('.') {
        Some(dot) if dot > 0 => format!("{}-{attempt}{}", &filename[..dot], &filename[dot..]),
        _ => format!("{filename}-{attempt}"),
    }
}

/// Filesystem-backed upload store.
///
/// Promoted files live directly under `base_path`; staged files under
/// `{base_path}/.tmp/{uuid}`.
pub struct FilesystemUploadStore {
    base_path: PathBuf,
    public_prefix: String,
}

impl FilesystemUploadStore {
    /// Create the store, making sure both directories exist.
    pub async fn new(
        base_path: PathBuf,
        public_prefix: impl Into<String>,
    ) -> Result<Self, StorageError> {
        fs::create_dir_all(base_path.join(STAGING_DIR)).await?;
        Ok(Self {
            base_path,
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
        })
    }

    fn staged_path(&self, id: &Uuid) -> PathBuf {
        self.base_path.join(STAGING_DIR).join(id.to_string())
    }

    fn final_path(&self, filename: &str) -> PathBuf {
        self.base_path.join(filename)
    }
}

#[async_trait]
impl UploadStore for FilesystemUploadStore {
    async fn stage(&self, data: &[u8]) -> Result<StagedUpload, StorageError> {
        let id = Uuid::new_v4();
        let path = self.staged_path(&id);
        if let Err(e) = fs::write(&path, data).await {
            let _ = fs::remove_file(&path).await;
            return Err(e.into());
        }
        Ok(StagedUpload {
            id,
            size: data.len() as u64,
        })
    }

    async fn promote(
        &self,
        staged: &StagedUpload,
        filename: &str,
    ) -> Result<String, StorageError> {
        let from = self.staged_path(&staged.id);
        if !fs::try_exists(&from).await? {
            return Err(StorageError::StagedNotFound(staged.id.to_string()));
        }

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = numbered_name(filename, attempt);
            let to = self.final_path(&name);

            // `create_new` claims the name atomically; the rename then
            // replaces the empty placeholder with the staged bytes.
            match fs::OpenOptions::new().write(true).create_new(true).open(&to).await {
                Ok(_) => {}
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }

            return match fs::rename(&from, &to).await {
                Ok(()) => Ok(name),
                Err(e) => {
                    let _ = fs::remove_file(&to).await;
                    if e.kind() == std::io::ErrorKind::NotFound {
                        Err(StorageError::StagedNotFound(staged.id.to_string()))
                    } else {
                        Err(e.into())
                    }
                }
            };
        }

        Err(StorageError::AlreadyExists(filename.to_string()))
    }

    async fn discard(&self, staged: &StagedUpload) -> Result<(), StorageError> {
        match fs::remove_file(self.staged_path(&staged.id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&self, filename: &str) -> Result<bool, StorageError> {
        match fs::remove_file(self.final_path(filename)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self) -> Result<Vec<String>, StorageError> {
        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.base_path).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    async fn list_staged(&self) -> Result<Vec<StagedUpload>, StorageError> {
        let mut staged = Vec::new();
        let mut entries = fs::read_dir(self.base_path.join(STAGING_DIR)).await?;
        while let Some(entry) = entries.next_entry().await? {
            let Some(id) = entry
                .file_name()
                .to_str()
                .and_then(|name| Uuid::parse_str(name).ok())
            else {
                tracing::warn!(path = ?entry.path(), "Ignoring unexpected file in staging area");
                continue;
            };
            let size = entry.metadata().await?.len();
            staged.push(StagedUpload { id, size });
        }
        Ok(staged)
    }

    fn public_url(&self, filename: &str) -> String {
        format!("{}/{}", self.public_prefix, filename)
    }

    fn filename_from_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(self.public_prefix.as_str())?
            .strip_prefix('/')
            .filter(|name| !name.is_empty() && !name.contains('/'))
    }
}
