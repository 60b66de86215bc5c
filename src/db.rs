use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::fs;

use crate::config::Config;

pub type DbPool = SqlitePool;

/// Application state handed to every command
pub struct AppState {
  pub db: DbPool,
  pub config: Config,
}

/// Open the connection pool for the configured file and run migrations
pub async fn initialize_db(config: &Config) -> Result<DbPool, Box<dyn std::error::Error>> {
  // Create parent directory if it doesn't exist
  if let Some(parent) = config.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent)?;
  }

  tracing::info!(path = %config.db_path.display(), "Initializing database");

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(&config.database_url())
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  tracing::debug!("Database initialized successfully");

  Ok(pool)
}
