// src/config.rs

use std::{env, sync::Arc, time::Duration};

use crate::{
    clients::{BackendClient, EntitySource},
    models::theme::ReportTheme,
    services::{AuditService, CollectorService, ConsolidatedService, PdfService, SpreadsheetService},
};

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend_api_url: String,
    pub bind_addr: String,
    pub fonts_dir: String,
    pub font_family: String,
    pub http_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_api_url: "http://localhost:8080/api".to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
            fonts_dir: "./fonts".to_string(),
            font_family: "Roboto".to_string(),
            http_timeout: Duration::from_secs(15),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let http_timeout = match env::var("HTTP_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .map_err(|e| anyhow::anyhow!("HTTP_TIMEOUT_SECS inválido ({}): {}", raw, e))?,
            ),
            Err(_) => defaults.http_timeout,
        };

        Ok(Self {
            backend_api_url: env::var("BACKEND_API_URL").unwrap_or(defaults.backend_api_url),
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            fonts_dir: env::var("FONTS_DIR").unwrap_or(defaults.fonts_dir),
            font_family: env::var("FONT_FAMILY").unwrap_or(defaults.font_family),
            http_timeout,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub audit_service: AuditService,
    pub consolidated_service: ConsolidatedService,
    pub spreadsheet_service: SpreadsheetService,
    pub pdf_service: PdfService,
}

impl AppState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let client = BackendClient::new(config.backend_api_url.clone(), config.http_timeout)?;
        tracing::info!("✅ Backend configurado em {}", client.base_url());

        Ok(Self::with_source(config, Arc::new(client)))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_source(config: AppConfig, source: Arc<dyn EntitySource>) -> Self {
        let theme = ReportTheme::comuctiva();
        let collector = CollectorService::new(source);

        Self {
            audit_service: AuditService::new(collector.clone()),
            consolidated_service: ConsolidatedService::new(collector),
            spreadsheet_service: SpreadsheetService::new(theme.clone()),
            pdf_service: PdfService::new(config.fonts_dir.clone(), config.font_family.clone(), theme),
            config,
        }
    }
}
