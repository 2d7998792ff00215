use std::sync::Arc;

use common::storage::UploadStore;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub uploads: Arc<dyn UploadStore>,
    pub config: AppConfig,
}
