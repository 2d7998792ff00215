use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;

/// Open the process-wide connection pool and sync the schema.
///
/// Called once at startup; the returned handle is cloned into every request
/// and closed with [`close_db`] after the server stops.
pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    // In-memory SQLite is per-connection; a single connection keeps one database.
    let in_memory = db_url.contains(":memory:");
    opt.max_connections(if in_memory { 1 } else { 20 })
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(false);
    if !in_memory {
        opt.idle_timeout(Duration::from_secs(300));
    }

    let db = Database::connect(opt).await?;
    db.get_schema_registry("server::entity::*")
        .sync(&db)
        .await?;

    info!("Database pool ready");
    Ok(db)
}

/// Drain and close the pool.
pub async fn close_db(db: DatabaseConnection) {
    match db.close().await {
        Ok(()) => info!("Database pool closed"),
        Err(e) => tracing::warn!("Error while closing database pool: {e}"),
    }
}
