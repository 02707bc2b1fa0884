// src/handlers/reports.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::BackendToken,
    services::collector_service::is_document_id,
    models::{
        metrics::MetricBundle,
        report::{ConsolidatedReport, ExportContext, ExportFile, ExportFormat, ReportType},
    },
};

// O documento vira um segmento do caminho no backend
fn validate_documento(doc: &str) -> Result<(), ValidationError> {
    if !is_document_id(doc) {
        let mut err = ValidationError::new("documento");
        err.message = Some("El documento solo admite letras, números, '-' y '_'.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExportQuery {
    /// `xlsx` (padrão) ou `pdf`
    #[serde(default)]
    pub format: ExportFormat,

    /// Documento do vendedor; sem ele, usa o catálogo inteiro
    #[validate(
        length(min = 1, max = 30, message = "El documento debe tener entre 1 y 30 caracteres."),
        custom(function = "validate_documento")
    )]
    pub documento: Option<String>,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConsolidatedQuery {
    #[validate(
        length(min = 1, max = 30, message = "El documento debe tener entre 1 y 30 caracteres."),
        custom(function = "validate_documento")
    )]
    pub documento: Option<String>,
}

// Configura os headers para o navegador baixar o arquivo
fn file_response(file: ExportFile) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", file.file_name);
    let headers = [
        (header::CONTENT_TYPE, file.content_type.to_string()),
        (header::CONTENT_DISPOSITION, disposition),
    ];

    (StatusCode::OK, headers, file.bytes).into_response()
}

// GET /api/reports/audit
#[utoipa::path(
    get,
    path = "/api/reports/audit",
    tag = "Reportes",
    responses(
        (status = 200, description = "Métricas da auditoria administrativa", body = MetricBundle),
        (status = 502, description = "Nenhuma fonte de dados respondeu")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_audit(
    State(app_state): State<AppState>,
    token: BackendToken,
) -> Result<impl IntoResponse, AppError> {
    let bundle = app_state.audit_service.build_bundle(token.as_deref()).await?;
    Ok((StatusCode::OK, Json(bundle)))
}

// GET /api/reports/audit/export
#[utoipa::path(
    get,
    path = "/api/reports/audit/export",
    tag = "Reportes",
    params(ExportQuery),
    responses(
        (status = 200, description = "Arquivo da auditoria (xlsx ou pdf)", content_type = "application/octet-stream"),
        (status = 500, description = "Erro ao gerar o arquivo"),
        (status = 502, description = "Nenhuma fonte de dados respondeu")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn export_audit(
    State(app_state): State<AppState>,
    token: BackendToken,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    query.validate()?;

    let bundle = app_state.audit_service.build_bundle(token.as_deref()).await?;
    let ctx = ExportContext::now();

    let file = match query.format {
        ExportFormat::Xlsx => app_state.spreadsheet_service.export_audit(&bundle, &ctx)?,
        ExportFormat::Pdf => app_state.pdf_service.export_audit(&bundle, &ctx)?,
    };

    Ok(file_response(file))
}

// GET /api/reports/consolidated
#[utoipa::path(
    get,
    path = "/api/reports/consolidated",
    tag = "Reportes",
    params(ConsolidatedQuery),
    responses(
        (status = 200, description = "Relatório consolidado do vendedor", body = ConsolidatedReport),
        (status = 400, description = "Parâmetros inválidos"),
        (status = 502, description = "Nenhuma fonte de dados respondeu")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_consolidated(
    State(app_state): State<AppState>,
    token: BackendToken,
    Query(query): Query<ConsolidatedQuery>,
) -> Result<impl IntoResponse, AppError> {
    query.validate()?;

    let report = app_state
        .consolidated_service
        .build_report(query.documento.as_deref(), token.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(report)))
}

// GET /api/reports/consolidated/export
#[utoipa::path(
    get,
    path = "/api/reports/consolidated/export",
    tag = "Reportes",
    params(ExportQuery),
    responses(
        (status = 200, description = "Arquivo do relatório completo (xlsx ou pdf)", content_type = "application/octet-stream"),
        (status = 400, description = "Parâmetros inválidos"),
        (status = 502, description = "Nenhuma fonte de dados respondeu")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn export_consolidated(
    State(app_state): State<AppState>,
    token: BackendToken,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    query.validate()?;

    let report = app_state
        .consolidated_service
        .build_report(query.documento.as_deref(), token.as_deref())
        .await?;
    let ctx = ExportContext::now();

    let file = match query.format {
        ExportFormat::Xlsx => app_state.spreadsheet_service.export_consolidated(&report, &ctx)?,
        ExportFormat::Pdf => app_state.pdf_service.export_consolidated(&report, &ctx)?,
    };

    Ok(file_response(file))
}

// GET /api/reports/{tipo}/export
#[utoipa::path(
    get,
    path = "/api/reports/{tipo}/export",
    tag = "Reportes",
    params(
        ("tipo" = String, Path, description = "productos | pedidos | ventas | compras"),
        ExportQuery
    ),
    responses(
        (status = 200, description = "Arquivo de uma seção (xlsx ou pdf)", content_type = "application/octet-stream"),
        (status = 400, description = "Tipo de relatório desconhecido"),
        (status = 422, description = "Seção sem dados")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn export_single(
    State(app_state): State<AppState>,
    token: BackendToken,
    Path(tipo): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let kind: ReportType = tipo.parse()?;
    query.validate()?;

    let section = app_state
        .consolidated_service
        .build_section(kind, query.documento.as_deref(), token.as_deref())
        .await?;
    let ctx = ExportContext::now();

    let file = match query.format {
        ExportFormat::Xlsx => app_state.spreadsheet_service.export_single(&section, kind.title(), &ctx)?,
        ExportFormat::Pdf => app_state.pdf_service.export_single(&section, kind.title(), &ctx)?,
    };

    Ok(file_response(file))
}
