// listshare_server/src/main.rs

mod config;
mod db;
mod errors;
mod models;
mod pipelines;
mod services;
mod state;
mod web;

use crate::config::{AppConfig, LogFormat};
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use std::io;
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_span_events(FmtSpan::CLOSE);
  match format {
    LogFormat::Json => builder.json().init(),
    LogFormat::Pretty => builder.init(),
  }
}

fn to_io_error(err: impl std::fmt::Display) -> io::Error {
  io::Error::new(io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
  dotenvy::dotenv().ok();
  init_tracing(LogFormat::from_env());

  tracing::info!("Starting shared shopping-list server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(to_io_error(e));
    }
  };

  let generator = services::text_generation::build_generator(&app_config).map_err(to_io_error)?;

  let app_state = match app_config.database_url.as_deref() {
    Some(database_url) => {
      let db_pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(|e| {
          tracing::error!(error = %e, "Failed to connect to the database.");
          to_io_error(e)
        })?;
      tracing::info!("Successfully connected to the database.");

      if app_config.run_migrations {
        sqlx::migrate!("./migrations").run(&db_pool).await.map_err(|e| {
          tracing::error!(error = %e, "Database migration failed.");
          to_io_error(e)
        })?;
        tracing::info!("Database migrations applied.");
      }
      AppState::postgres(db_pool, generator, app_config.clone())
    }
    None => {
      tracing::warn!("DATABASE_URL is not set; using in-memory stores. Data will not survive a restart.");
      AppState::in_memory(generator, app_config.clone())
    }
  };

  pipelines::register_all_pipelines(&app_state.registry, &app_state);

  let server_address = app_config.bind_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
