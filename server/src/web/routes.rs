// listshare_server/src/web/routes.rs

use crate::errors::AppError;
use crate::web::handlers::{ai_handlers, auth_handlers, item_handlers, share_handlers};
use actix_web::web;

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// Extractor failures answer with the same JSON error body as handler failures.

fn json_config() -> web::JsonConfig {
  web::JsonConfig::default().error_handler(|err, _req| {
    tracing::debug!(error = %err, "Rejected request body.");
    AppError::Validation(err.to_string()).into()
  })
}

fn query_config() -> web::QueryConfig {
  web::QueryConfig::default().error_handler(|err, _req| {
    tracing::debug!(error = %err, "Rejected query string.");
    AppError::Validation(err.to_string()).into()
  })
}

fn path_config() -> web::PathConfig {
  web::PathConfig::default().error_handler(|err, _req| {
    tracing::debug!(error = %err, "Rejected path parameter.");
    AppError::Validation(err.to_string()).into()
  })
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api")
      .app_data(json_config())
      .app_data(query_config())
      .app_data(path_config())
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/auth")
          .route("/register", web::post().to(auth_handlers::register_handler))
          .route("/login", web::post().to(auth_handlers::login_handler))
          .route("/logout", web::post().to(auth_handlers::logout_handler))
          .route("/me", web::get().to(auth_handlers::me_handler)),
      )
      .route("/share", web::post().to(share_handlers::share_handler))
      .service(
        web::scope("/items")
          .route("", web::get().to(item_handlers::list_items_handler))
          .route("", web::post().to(item_handlers::create_item_handler))
          .route("", web::delete().to(item_handlers::clear_items_handler))
          .route("/summary", web::get().to(item_handlers::summary_handler))
          .route("/export", web::get().to(item_handlers::export_handler))
          .route("/import", web::post().to(item_handlers::import_handler))
          .route("/{item_id}", web::put().to(item_handlers::update_item_handler))
          .route("/{item_id}", web::delete().to(item_handlers::delete_item_handler))
          .route("/{item_id}/favorite", web::post().to(item_handlers::toggle_favorite_handler)),
      )
      .service(
        web::scope("/ai")
          .route("/generate", web::post().to(ai_handlers::bulk_generate_handler))
          .route("/predict-category", web::post().to(ai_handlers::predict_category_handler)),
      ),
  );
}
