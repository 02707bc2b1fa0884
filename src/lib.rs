// src/lib.rs

use axum::{routing::get, Router};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod clients;
pub mod common;
pub mod config;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::{config::AppState, docs::ApiDoc};

/// Monta o router completo. Separado do `main` para os testes de rota.
pub fn build_router(app_state: AppState) -> Router {
    let report_routes = Router::new()
        .route("/audit", get(handlers::reports::get_audit))
        .route("/audit/export", get(handlers::reports::export_audit))
        .route("/consolidated", get(handlers::reports::get_consolidated))
        .route("/consolidated/export", get(handlers::reports::export_consolidated))
        .route("/{tipo}/export", get(handlers::reports::export_single));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/reports", report_routes)
        .with_state(app_state)
}
