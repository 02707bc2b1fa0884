// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, agora com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Falha de uma chamada ao backend. Os coletores recuperam localmente,
    // então essa variante só chega ao handler se alguém propagar de propósito.
    #[error("Falha ao consultar {endpoint}: {message}")]
    Backend { endpoint: String, message: String },

    // Todos os coletores de um relatório falharam
    #[error("Nenhuma fonte de dados respondeu")]
    ReportDataUnavailable,

    #[error("No hay datos para exportar")]
    NoData,

    #[error("Tipo de relatório desconhecido: {0}")]
    UnknownReportType(String),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Erro ao gerar planilha: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("Erro ao gerar PDF: {0}")]
    Pdf(String),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl From<genpdf::error::Error> for AppError {
    fn from(err: genpdf::error::Error) -> Self {
        AppError::Pdf(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Uno o más parámetros son inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::ReportDataUnavailable => (
                StatusCode::BAD_GATEWAY,
                "No se pudieron cargar los datos del reporte.".to_string(),
            ),
            AppError::NoData => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "No hay datos para exportar.".to_string(),
            ),
            AppError::UnknownReportType(kind) => (
                StatusCode::BAD_REQUEST,
                format!("Tipo de reporte desconocido: {}", kind),
            ),
            AppError::Backend { .. } => {
                tracing::error!("Erro no backend: {}", self);
                (StatusCode::BAD_GATEWAY, "Error al consultar el backend.".to_string())
            }
            // Falhas de renderização viram o alerta genérico de exportação
            ref e @ (AppError::Spreadsheet(_) | AppError::Pdf(_) | AppError::FontNotFound(_)) => {
                tracing::error!("Falha na exportação: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Error al exportar el reporte.".to_string())
            }
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocurrió un error inesperado.".to_string())
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
