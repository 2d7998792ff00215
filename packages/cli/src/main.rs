use anyhow::Context;
use clap::{Parser, Subcommand};
use common::config::redact_url;
use common::storage::filesystem::FilesystemUploadStore;
use console::style;
use dialoguer::Confirm;
use sea_orm::DatabaseConnection;
use server::config::AppConfig;
use server::database::{close_db, init_db};
use server::maintenance::{LinkOutcome, link_orphan_projects, sweep_uploads};
use tracing_subscriber::{EnvFilter, fmt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "craftykeep", version, about = "Maintenance commands for CraftyKeep")]
struct Cli {
    /// Database URL; overrides the configured one.
    #[arg(long, global = true, env = "CRAFTYKEEP__DATABASE__URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Give every project without an owner to a user.
    LinkProjects {
        /// User to link to. Defaults to the first user who signed in.
        #[arg(long)]
        user: Option<Uuid>,
    },
    /// Delete staged leftovers and uploaded files no row refers to.
    SweepUploads {
        /// Report what would be removed without removing it.
        #[arg(long)]
        dry_run: bool,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_target(false).init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("failed to load configuration")?;
    let db_url = cli.database_url.unwrap_or_else(|| config.database_url());

    println!("{} {}", style("database").dim(), redact_url(&db_url));
    let db = init_db(&db_url).await.context("failed to open database")?;

    let result = match cli.command {
        Command::LinkProjects { user } => link_projects(&db, user).await,
        Command::SweepUploads { dry_run, yes } => sweep(&db, &config, dry_run, yes).await,
    };

    close_db(db).await;
    result
}

async fn link_projects(db: &DatabaseConnection, user: Option<Uuid>) -> anyhow::Result<()> {
    match link_orphan_projects(db, user).await? {
        LinkOutcome::NoUsers => {
            println!(
                "{} No users found. Sign in once, then run this again.",
                style("!").yellow().bold()
            );
        }
        LinkOutcome::Linked { user_id, count } => {
            println!(
                "{} Linked {} project(s) to user {}",
                style("✓").green().bold(),
                style(count).bold(),
                user_id
            );
        }
    }
    Ok(())
}

async fn sweep(
    db: &DatabaseConnection,
    config: &AppConfig,
    dry_run: bool,
    yes: bool,
) -> anyhow::Result<()> {
    let store = FilesystemUploadStore::new(
        config.uploads.dir.clone(),
        config.uploads.public_prefix.clone(),
    )
    .await
    .with_context(|| format!("failed to open {}", config.uploads.dir.display()))?;

    if !dry_run && !yes {
        let proceed = Confirm::new()
            .with_prompt(format!(
                "Delete unreferenced files under {}? The server should be stopped",
                config.uploads.dir.display()
            ))
            .default(false)
            .interact()?;
        if !proceed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let report = sweep_uploads(db, &store, dry_run).await?;
    let verb = if dry_run { "would remove" } else { "removed" };

    for id in &report.staged {
        println!("  {} .tmp/{id}", style(verb).dim());
    }
    for name in &report.unreferenced {
        println!("  {} {name}", style(verb).dim());
    }
    println!(
        "{} {} staged, {} unreferenced",
        style("✓").green().bold(),
        report.staged.len(),
        report.unreferenced.len()
    );
    Ok(())
}
