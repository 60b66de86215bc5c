pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod engine;
pub mod history;
pub mod models;
pub mod progress;
pub mod session;
pub mod split;

#[cfg(test)]
mod test_utils;

use clap::Parser;
use cli::Cli;
use config::Config;
use db::AppState;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_logging(config: &Config) {
  // RUST_LOG wins over the configured level
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .init();
}

pub fn run() -> ExitCode {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  let cli = Cli::parse();

  let mut config = match Config::from_env() {
    Ok(config) => config,
    Err(e) => {
      eprintln!("Configuration error: {}", e);
      return ExitCode::from(2);
    }
  };
  if let Some(path) = cli.db.clone() {
    config.db_path = path;
  }

  init_logging(&config);

  let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
    Ok(rt) => rt,
    Err(e) => {
      tracing::error!("Failed to start runtime: {}", e);
      return ExitCode::FAILURE;
    }
  };

  runtime.block_on(async move {
    let pool = match db::initialize_db(&config).await {
      Ok(pool) => pool,
      Err(e) => {
        tracing::error!("Failed to initialize database: {}", e);
        return ExitCode::FAILURE;
      }
    };

    let state = AppState { db: pool, config };
    let result = cli::dispatch(&state, &cli.user, cli.command).await;
    state.db.close().await;

    match result {
      Ok(()) => ExitCode::SUCCESS,
      Err(e) => {
        eprintln!("{}", e);
        ExitCode::FAILURE
      }
    }
  })
}
