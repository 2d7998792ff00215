use std::sync::Arc;

use anyhow::Context;
use common::config::{AppEnvironment, redact_url};
use common::storage::filesystem::FilesystemUploadStore;
use server::config::AppConfig;
use server::database::{close_db, init_db};
use server::state::AppState;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

const DEV_JWT_SECRET: &str = "craftykeep-dev-secret";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    if config.app.environment == AppEnvironment::Production
        && config.auth.jwt_secret == DEV_JWT_SECRET
    {
        tracing::warn!("Running in production with the default JWT secret");
    }

    let db_url = config.database_url();
    info!(url = %redact_url(&db_url), env = ?config.app.environment, "Connecting to database");
    let db = init_db(&db_url).await.context("failed to open database")?;

    let uploads = FilesystemUploadStore::new(
        config.uploads.dir.clone(),
        config.uploads.public_prefix.clone(),
    )
    .await
    .context("failed to prepare upload directory")?;
    info!(dir = %config.uploads.dir.display(), "Upload store ready");

    let address = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        db: db.clone(),
        uploads: Arc::new(uploads),
        config,
    };
    let app = server::build_router(state);

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("Server running on http://{address}");
    info!("Swagger UI at http://{address}/swagger-ui");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    close_db(db).await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
