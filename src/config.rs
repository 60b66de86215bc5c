use std::env;
use std::path::PathBuf;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const DEFAULT_DB_PATH: &str = "lift-log.db";
const DEFAULT_LOG_LEVEL: &str = "info";
/// Heaviest rows per exercise considered when picking the best e1RM
pub const DEFAULT_HISTORY_WINDOW: u32 = 60;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Invalid value for {key}: {value}")]
  InvalidValue { key: String, value: String },
}

/// ---------------------------------------------------------------------------
/// Config
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  pub db_path: PathBuf,
  pub history_window: u32,
  pub log_level: String,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      db_path: PathBuf::from(DEFAULT_DB_PATH),
      history_window: DEFAULT_HISTORY_WINDOW,
      log_level: DEFAULT_LOG_LEVEL.to_string(),
    }
  }
}

impl Config {
  /// Read `LIFT_LOG_DB`, `LIFT_LOG_HISTORY_WINDOW` and `LIFT_LOG_LEVEL`,
  /// falling back to defaults for anything unset
  pub fn from_env() -> Result<Self, ConfigError> {
    let defaults = Self::default();

    let db_path = env::var("LIFT_LOG_DB")
      .ok()
      .filter(|v| !v.trim().is_empty())
      .map(PathBuf::from)
      .unwrap_or(defaults.db_path);

    let history_window = match env::var("LIFT_LOG_HISTORY_WINDOW") {
      Ok(raw) => raw
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or(ConfigError::InvalidValue {
          key: "LIFT_LOG_HISTORY_WINDOW".into(),
          value: raw,
        })?,
      Err(_) => defaults.history_window,
    };

    let log_level = env::var("LIFT_LOG_LEVEL")
      .ok()
      .filter(|v| !v.trim().is_empty())
      .unwrap_or(defaults.log_level);

    Ok(Self {
      db_path,
      history_window,
      log_level,
    })
  }

  /// SQLite URL for the configured file, created on first connect
  pub fn database_url(&self) -> String {
    format!("sqlite://{}?mode=rwc", self.db_path.display())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn test_defaults_when_unset() {
    temp_env::with_vars_unset(
      ["LIFT_LOG_DB", "LIFT_LOG_HISTORY_WINDOW", "LIFT_LOG_LEVEL"],
      || {
        let config = Config::from_env().expect("defaults should load");
        assert_eq!(config, Config::default());
        assert_eq!(config.history_window, 60);
      },
    );
  }

  #[test]
  #[serial]
  fn test_reads_env_values() {
    temp_env::with_vars(
      [
        ("LIFT_LOG_DB", Some("/tmp/lifts.db")),
        ("LIFT_LOG_HISTORY_WINDOW", Some("25")),
        ("LIFT_LOG_LEVEL", Some("debug")),
      ],
      || {
        let config = Config::from_env().unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/lifts.db"));
        assert_eq!(config.history_window, 25);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.database_url(), "sqlite:///tmp/lifts.db?mode=rwc");
      },
    );
  }

  #[test]
  #[serial]
  fn test_rejects_bad_history_window() {
    for bad in ["0", "-5", "sixty"] {
      temp_env::with_var("LIFT_LOG_HISTORY_WINDOW", Some(bad), || {
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("LIFT_LOG_HISTORY_WINDOW"));
      });
    }
  }
}
