use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use fbs_api::acl::maintenance::MAINTENANCE_QUERY;
use fbs_api::models::acl::MaintenanceRecord;

#[derive(Parser, Debug)]
#[command(author, version, about = "fbs operator tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new empty migration with the provided name
    MakeMigration { name: String },
    /// Apply pending migrations
    MigrateRun,
    /// Show migration status against the current database
    MigrateStatus,
    /// Flip or inspect the service-wide maintenance flag
    Maintenance {
        #[arg(value_enum)]
        action: MaintenanceAction,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum MaintenanceAction {
    On,
    Off,
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if dotenv().is_err() {
        let crate_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
        let _ = dotenvy::from_path(crate_env);
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::MakeMigration { name } => {
            let path = make_migration_file(&name)?;
            println!("Created migration: {}", path.display());
        }
        Commands::MigrateRun => {
            let pool = get_pool().await?;
            let migrator = get_migrator().await?;
            migrator.run(&pool).await?;
            println!("Migrations applied");
        }
        Commands::MigrateStatus => {
            let pool = get_pool().await?;
            let migrator = get_migrator().await?;
            print_status(&pool, &migrator).await?;
        }
        Commands::Maintenance { action } => {
            let pool = get_pool().await?;
            match action {
                MaintenanceAction::On => set_maintenance(&pool, true).await?,
                MaintenanceAction::Off => set_maintenance(&pool, false).await?,
                MaintenanceAction::Status => {}
            }
            print_maintenance(&pool).await?;
        }
    }

    Ok(())
}

fn make_migration_file(name: &str) -> anyhow::Result<PathBuf> {
    let timestamp = Utc::now().format("%Y%m%d%H%M%S");
    let sanitized = sanitize_name(name);
    let filename = format!("{}_{}.sql", timestamp, sanitized);
    let path = Path::new("migrations").join(filename);

    if path.exists() {
        anyhow::bail!("migration already exists: {}", path.display());
    }

    fs::write(&path, "-- Write your migration SQL here\n")
        .with_context(|| format!("failed to create migration at {}", path.display()))?;

    Ok(path)
}

async fn get_pool() -> anyhow::Result<SqlitePool> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL not set")?;
    SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to database")
}

async fn print_status(pool: &SqlitePool, migrator: &sqlx::migrate::Migrator) -> anyhow::Result<()> {
    let has_table: Option<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type='table' AND name='_sqlx_migrations'")
            .fetch_optional(pool)
            .await?;

    let applied_versions: HashSet<i64> = if has_table.is_some() {
        sqlx::query_scalar::<_, i64>("SELECT version FROM _sqlx_migrations WHERE success = 1")
            .fetch_all(pool)
            .await?
            .into_iter()
            .collect()
    } else {
        HashSet::new()
    };

    println!("{:<8} {:<16} {}", "Status", "Version", "Name");
    for migration in migrator.iter() {
        let status = if applied_versions.contains(&migration.version) {
            "applied"
        } else {
            "pending"
        };
        let desc = migration.description.as_ref().trim();
        let name = if desc.is_empty() { "unknown" } else { desc };
        println!("{:<8} {:<16} {}", status, migration.version, name);
    }

    Ok(())
}

/// Updates the flag row the gate reads, creating it on a fresh database.
async fn set_maintenance(pool: &SqlitePool, is_down: bool) -> anyhow::Result<()> {
    let updated = sqlx::query(
        "UPDATE maintenance SET is_down = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now') \
         WHERE id = (SELECT id FROM maintenance ORDER BY id LIMIT 1)",
    )
    .bind(is_down)
    .execute(pool)
    .await
    .context("failed to update maintenance flag")?
    .rows_affected();

    if updated == 0 {
        sqlx::query("INSERT INTO maintenance (is_down) VALUES (?)")
            .bind(is_down)
            .execute(pool)
            .await
            .context("failed to create maintenance flag")?;
    }

    Ok(())
}

async fn print_maintenance(pool: &SqlitePool) -> anyhow::Result<()> {
    let record = sqlx::query_as::<_, MaintenanceRecord>(MAINTENANCE_QUERY)
        .fetch_optional(pool)
        .await
        .context("failed to read maintenance flag")?;

    match record {
        Some(record) if record.is_down => println!("maintenance: ON (since {})", record.updated_at),
        Some(record) => println!("maintenance: off (updated {})", record.updated_at),
        None => println!("maintenance: off (no flag row)"),
    }

    Ok(())
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '_' => c,
            'A'..='Z' => c.to_ascii_lowercase(),
            _ => '_',
        })
        .collect()
}

async fn get_migrator() -> anyhow::Result<sqlx::migrate::Migrator> {
    let local = Path::new("./migrations");
    let migrator_path = if local.exists() {
        local.to_path_buf()
    } else {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations")
    };

    let migrator_path_display = migrator_path.display().to_string();
    sqlx::migrate::Migrator::new(migrator_path)
        .await
        .with_context(|| format!("failed to load migrations from {}", migrator_path_display))
}
