// tests/routes.rs

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use comuctiva_reports::{
    build_router,
    config::{AppConfig, AppState},
};

use common::FakeBackend;

fn app(backend: Arc<FakeBackend>) -> Router {
    build_router(AppState::with_source(AppConfig::default(), backend))
}

fn seller_backend() -> FakeBackend {
    FakeBackend::new()
        .route("/usuarios", vec![json!({ "activo": true, "rol": "ADMIN" }), json!({ "activo": 0 })])
        .route("/productos", vec![json!({ "nombre": "Miel", "precio": 9000, "stock": 2, "usuarioId": 4 })])
        .route("/productos/usuario/1020", vec![json!({ "nombre": "Queso", "precio": 15000, "stock": 0 })])
        .route("/pedidos", vec![json!({ "estado": "ENTREGADO", "total": 9000, "usuarioId": 8 })])
        .route("/pedidos/mis-pedidos", vec![])
        .route("/pedidos/mis-ventas", vec![json!({ "productoNombre": "Queso", "cantidad": 1, "subtotal": 15000 })])
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, "Bearer token-de-prueba")
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

#[tokio::test]
async fn health_answers_ok() {
    let response = get(app(FakeBackend::new().shared()), "/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"OK");
}

#[tokio::test]
async fn audit_json_uses_spanish_keys_and_forwards_the_token() {
    let backend = seller_backend().shared();
    let response = get(app(backend.clone()), "/api/reports/audit").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["usuarios"]["total"], 2);
    assert_eq!(body["usuarios"]["activos"], 1);
    assert_eq!(body["usuarios"]["vendedores"], 1);
    assert_eq!(body["ventas"]["montoTotal"], 9000.0);
    assert_eq!(body["productos"]["porCategoria"][0]["nombre"], "Sin categoría");

    assert!(backend
        .tokens()
        .iter()
        .all(|t| t.as_deref() == Some("token-de-prueba")));
}

#[tokio::test]
async fn audit_export_returns_a_workbook_attachment() {
    let response = get(app(seller_backend().shared()), "/api/reports/audit/export?format=xlsx").await;

    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment; filename=\"COMUCTIVA_Auditoria_"));
    assert!(disposition.ends_with(".xlsx\""));
    assert!(body_bytes(response).await.starts_with(b"PK"));
}

#[tokio::test]
async fn audit_without_any_source_is_bad_gateway() {
    let response = get(app(FakeBackend::new().shared()), "/api/reports/audit").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["error"], "No se pudieron cargar los datos del reporte.");
}

#[tokio::test]
async fn consolidated_json_uses_the_seller_catalog() {
    let backend = seller_backend().shared();
    let response = get(app(backend.clone()), "/api/reports/consolidated?documento=1020").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["resumen"]["productos"], 1);
    assert_eq!(body["resumen"]["totalVentas"], 15000.0);
    assert_eq!(body["productosDetalle"][0]["nombre"], "Queso");
    assert!(backend.called("/productos/usuario/1020"));
    assert!(!backend.called("/productos"));
}

#[tokio::test]
async fn empty_document_is_rejected() {
    let response = get(app(seller_backend().shared()), "/api/reports/consolidated?documento=").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn single_export_of_a_known_type() {
    let response = get(app(seller_backend().shared()), "/api/reports/ventas/export?documento=1020").await;

    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.contains("COMUCTIVA_Reporte_ventas_"));
}

#[tokio::test]
async fn single_export_of_an_empty_section_is_unprocessable() {
    let response = get(app(seller_backend().shared()), "/api/reports/pedidos/export").await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["error"], "No hay datos para exportar.");
}

#[tokio::test]
async fn unknown_report_type_is_a_bad_request() {
    let response = get(app(seller_backend().shared()), "/api/reports/categorias/export").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
