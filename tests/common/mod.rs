// tests/common/mod.rs

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use comuctiva_reports::{clients::EntitySource, common::error::AppError};

/// Backend em memória: rotas fora do mapa respondem com erro.
#[derive(Default)]
pub struct FakeBackend {
    routes: HashMap<String, Vec<Value>>,
    pub calls: Mutex<Vec<(String, Option<String>)>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, endpoint: &str, records: Vec<Value>) -> Self {
        self.routes.insert(endpoint.to_string(), records);
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn called(&self, endpoint: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|(e, _)| e == endpoint)
    }

    pub fn tokens(&self) -> Vec<Option<String>> {
        self.calls.lock().unwrap().iter().map(|(_, t)| t.clone()).collect()
    }
}

#[async_trait]
impl EntitySource for FakeBackend {
    async fn fetch_list(&self, endpoint: &str, token: Option<&str>) -> Result<Vec<Value>, AppError> {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.to_string(), token.map(str::to_string)));

        self.routes.get(endpoint).cloned().ok_or_else(|| AppError::Backend {
            endpoint: endpoint.to_string(),
            message: "HTTP 500 Internal Server Error".to_string(),
        })
    }
}
