// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auditoria ---
        handlers::reports::get_audit,
        handlers::reports::export_audit,

        // --- Consolidado ---
        handlers::reports::get_consolidated,
        handlers::reports::export_consolidated,
        handlers::reports::export_single,
    ),
    components(
        schemas(
            // --- Métricas ---
            models::metrics::MetricBundle,
            models::metrics::UserMetrics,
            models::metrics::ProductMetrics,
            models::metrics::CategoryCount,
            models::metrics::OrderMetrics,
            models::metrics::SalesMetrics,
            models::metrics::ActivityMetrics,

            // --- Consolidado ---
            models::report::ConsolidatedReport,
            models::report::ConsolidatedSummary,
            models::report::ProductDetail,
            models::report::OrderDetail,
            models::report::SaleDetail,
            models::report::PurchaseDetail,
            models::report::ExportFormat,
        )
    ),
    tags(
        (name = "Reportes", description = "Auditoria administrativa e relatórios do vendedor (JSON, XLSX e PDF)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        // O token é repassado ao backend do COMUCTIVA
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
