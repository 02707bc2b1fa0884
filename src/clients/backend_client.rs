// src/clients/backend_client.rs

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;

use crate::common::error::AppError;

/// Fonte de listas de entidades. O cliente HTTP real implementa isso; os
/// testes trocam por fontes em memória.
#[async_trait]
pub trait EntitySource: Send + Sync {
    /// Busca `endpoint` e devolve a lista de registros.
    /// Uma resposta de sucesso que não seja array vira lista vazia.
    async fn fetch_list(&self, endpoint: &str, token: Option<&str>) -> Result<Vec<Value>, AppError>;
}

/// Cliente HTTP para a API REST do COMUCTIVA.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::InternalServerError(anyhow::anyhow!("Falha ao criar cliente HTTP: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn handle_response(&self, endpoint: &str, response: Response) -> Result<Vec<Value>, AppError> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Erro desconhecido".to_string());
            return Err(AppError::Backend {
                endpoint: endpoint.to_string(),
                message: format!("HTTP {} - {}", status, error_text),
            });
        }

        let body: Value = response.json().await.map_err(|e| AppError::Backend {
            endpoint: endpoint.to_string(),
            message: format!("Resposta inválida: {}", e),
        })?;

        match body {
            Value::Array(records) => Ok(records),
            other => {
                tracing::warn!(
                    "⚠️ {} respondeu {} em vez de uma lista; usando lista vazia",
                    endpoint,
                    json_kind(&other)
                );
                Ok(Vec::new())
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "um booleano",
        Value::Number(_) => "um número",
        Value::String(_) => "uma string",
        Value::Array(_) => "uma lista",
        Value::Object(_) => "um objeto",
    }
}

#[async_trait]
impl EntitySource for BackendClient {
    async fn fetch_list(&self, endpoint: &str, token: Option<&str>) -> Result<Vec<Value>, AppError> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut request = self.client.get(&url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| AppError::Backend {
            endpoint: endpoint.to_string(),
            message: if e.is_timeout() {
                "tempo esgotado".to_string()
            } else {
                e.to_string()
            },
        })?;

        self.handle_response(endpoint, response).await
    }
}
