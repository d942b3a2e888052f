// listshare_server/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
  #[default]
  Pretty,
  Json,
}

impl LogFormat {
  /// Read separately from [`AppConfig`] so logging is up before the config is loaded.
  pub fn from_env() -> Self {
    match env::var("LOG_FORMAT") {
      Ok(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
      _ => LogFormat::Pretty,
    }
  }
}

#[derive(Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// `None` runs the service on in-memory stores.
  pub database_url: Option<String>,
  pub run_migrations: bool,
  pub session_ttl_days: i64,

  pub gemini_api_key: Option<String>,
  pub gemini_model: String,
  pub gemini_base_url: String,
  pub generation_timeout_secs: u64,

  pub log_format: LogFormat,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      database_url: None,
      run_migrations: true,
      session_ttl_days: 7,
      gemini_api_key: None,
      gemini_model: "gemini-1.5-flash".to_string(),
      gemini_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
      generation_timeout_secs: 15,
      log_format: LogFormat::Pretty,
    }
  }
}

// Secrets stay out of logs.
impl fmt::Debug for AppConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AppConfig")
      .field("server_host", &self.server_host)
      .field("server_port", &self.server_port)
      .field("database_url", &self.database_url.as_ref().map(|_| "[REDACTED]"))
      .field("run_migrations", &self.run_migrations)
      .field("session_ttl_days", &self.session_ttl_days)
      .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "[REDACTED]"))
      .field("gemini_model", &self.gemini_model)
      .field("gemini_base_url", &self.gemini_base_url)
      .field("generation_timeout_secs", &self.generation_timeout_secs)
      .field("log_format", &self.log_format)
      .finish()
  }
}

fn parse_env<T: std::str::FromStr>(var_name: &str, raw: String) -> Result<T> {
  raw
    .trim()
    .parse()
    .map_err(|_| AppError::Config(format!("Invalid value for {}: '{}'", var_name, raw)))
}

/// Rejects lifetimes that are not positive or whose expiry a timestamp cannot hold.
fn session_ttl_from_days(days: i64) -> Result<chrono::Duration> {
  if days <= 0 {
    return Err(AppError::Config("SESSION_TTL_DAYS must be positive".to_string()));
  }
  chrono::Duration::try_days(days)
    .filter(|ttl| chrono::Utc::now().checked_add_signed(*ttl).is_some())
    .ok_or_else(|| AppError::Config(format!("SESSION_TTL_DAYS is too large: {}", days)))
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let defaults = AppConfig::default();
    let get_env = |var_name: &str| env::var(var_name).ok().filter(|v| !v.trim().is_empty());

    let server_host = get_env("SERVER_HOST").unwrap_or(defaults.server_host);
    let server_port: u16 = match get_env("SERVER_PORT") {
      Some(raw) => parse_env("SERVER_PORT", raw)?,
      None => defaults.server_port,
    };
    let run_migrations: bool = match get_env("RUN_MIGRATIONS") {
      Some(raw) => parse_env("RUN_MIGRATIONS", raw)?,
      None => defaults.run_migrations,
    };
    let session_ttl_days: i64 = match get_env("SESSION_TTL_DAYS") {
      Some(raw) => parse_env("SESSION_TTL_DAYS", raw)?,
      None => defaults.session_ttl_days,
    };
    session_ttl_from_days(session_ttl_days)?;
    let generation_timeout_secs: u64 = match get_env("GENERATION_TIMEOUT_SECS") {
      Some(raw) => parse_env("GENERATION_TIMEOUT_SECS", raw)?,
      None => defaults.generation_timeout_secs,
    };

    let config = Self {
      server_host,
      server_port,
      database_url: get_env("DATABASE_URL"),
      run_migrations,
      session_ttl_days,
      gemini_api_key: get_env("GEMINI_API_KEY"),
      gemini_model: get_env("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
      gemini_base_url: get_env("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
      generation_timeout_secs,
      log_format: LogFormat::from_env(),
    };

    tracing::info!(config = ?config, "Application configuration loaded successfully.");
    Ok(config)
  }

  pub fn session_ttl(&self) -> Result<chrono::Duration> {
    session_ttl_from_days(self.session_ttl_days)
  }

  pub fn generation_timeout(&self) -> Duration {
    Duration::from_secs(self.generation_timeout_secs)
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}
