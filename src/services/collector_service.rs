// src/services/collector_service.rs

use std::sync::Arc;

use crate::{
    clients::EntitySource,
    models::raw::{Collected, EntityKind, RawCollections},
};

// Rotas da auditoria. A de pedidos tem um fallback documentado.
pub const AUDIT_USERS: &[&str] = &["/usuarios"];
pub const AUDIT_PRODUCTS: &[&str] = &["/productos"];
pub const AUDIT_ORDERS: &[&str] = &["/pedidos", "/pedidos/all"];

// Rotas do relatório consolidado do vendedor
pub const MY_ORDERS: &[&str] = &["/pedidos/mis-pedidos"];
pub const MY_SALES: &[&str] = &["/pedidos/mis-ventas"];

/// Documento aceito no caminho `/productos/usuario/{doc}`: letras, dígitos,
/// `-` e `_`. Qualquer outra coisa poderia trocar a rota chamada no backend.
pub fn is_document_id(doc: &str) -> bool {
    !doc.is_empty() && doc.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Busca as listas cruas em "melhor esforço": rota principal, um fallback,
/// e lista vazia se tudo falhar. Nunca propaga erro de rede.
#[derive(Clone)]
pub struct CollectorService {
    source: Arc<dyn EntitySource>,
}

impl CollectorService {
    pub fn new(source: Arc<dyn EntitySource>) -> Self {
        Self { source }
    }

    pub async fn collect(&self, kind: EntityKind, endpoints: &[&str], token: Option<&str>) -> Collected {
        for endpoint in endpoints {
            match self.source.fetch_list(endpoint, token).await {
                Ok(records) => {
                    tracing::debug!("{} registros de {} via {}", records.len(), kind, endpoint);
                    return Collected { records, exhausted: false };
                }
                Err(e) => {
                    tracing::warn!("⚠️ Falha ao buscar {} em {}: {}", kind, endpoint, e);
                }
            }
        }

        tracing::error!("🔥 Sem dados de {}: todas as rotas falharam", kind);
        Collected { records: Vec::new(), exhausted: true }
    }

    // Os três coletores rodam ao mesmo tempo; a agregação espera todos.
    pub async fn collect_audit(&self, token: Option<&str>) -> RawCollections {
        let (usuarios, productos, pedidos) = tokio::join!(
            self.collect(EntityKind::Usuarios, AUDIT_USERS, token),
            self.collect(EntityKind::Productos, AUDIT_PRODUCTS, token),
            self.collect(EntityKind::Pedidos, AUDIT_ORDERS, token),
        );

        let mut raw = RawCollections::default();
        raw.record(EntityKind::Usuarios, usuarios);
        raw.record(EntityKind::Productos, productos);
        raw.record(EntityKind::Pedidos, pedidos);
        raw
    }

    /// Produtos do vendedor (ou o catálogo inteiro, sem documento), pedidos e vendas.
    pub async fn collect_consolidated(&self, documento: Option<&str>, token: Option<&str>) -> RawCollections {
        let products_endpoint = match documento {
            Some(doc) if is_document_id(doc) => Some(format!("/productos/usuario/{}", doc)),
            Some(doc) => {
                tracing::warn!("⚠️ Documento {:?} recusado na rota de produtos", doc);
                None
            }
            None => Some(AUDIT_PRODUCTS[0].to_string()),
        };
        // Sem rota válida, os produtos contam como coleta esgotada
        let products_route: Vec<&str> = products_endpoint.iter().map(String::as_str).collect();

        let (productos, pedidos, ventas) = tokio::join!(
            self.collect(EntityKind::Productos, &products_route, token),
            self.collect(EntityKind::Pedidos, MY_ORDERS, token),
            self.collect(EntityKind::Ventas, MY_SALES, token),
        );

        let mut raw = RawCollections::default();
        raw.record(EntityKind::Productos, productos);
        raw.record(EntityKind::Pedidos, pedidos);
        raw.record(EntityKind::Ventas, ventas);
        raw
    }
}
