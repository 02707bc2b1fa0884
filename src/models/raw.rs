// src/models/raw.rs

use serde_json::Value;
use std::fmt;

/// Tipos de entidade buscados no backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Usuarios,
    Productos,
    Pedidos,
    Ventas,
}

impl EntityKind {
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Usuarios => "usuarios",
            EntityKind::Productos => "productos",
            EntityKind::Pedidos => "pedidos",
            EntityKind::Ventas => "ventas",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Resultado de um coletor: a lista (talvez vazia) e se todas as rotas falharam.
#[derive(Debug, Clone, Default)]
pub struct Collected {
    pub records: Vec<Value>,
    pub exhausted: bool,
}

/// Listas cruas de uma execução de relatório.
#[derive(Debug, Clone, Default)]
pub struct RawCollections {
    pub usuarios: Vec<Value>,
    pub productos: Vec<Value>,
    pub pedidos: Vec<Value>,
    pub ventas: Vec<Value>,
    // Tipos cujo endpoint e fallback falharam
    pub failures: Vec<EntityKind>,
    // Quantos tipos foram pedidos nesta execução
    pub requested: usize,
}

impl RawCollections {
    pub fn record(&mut self, kind: EntityKind, collected: Collected) {
        self.requested += 1;
        if collected.exhausted {
            self.failures.push(kind);
        }
        let slot = match kind {
            EntityKind::Usuarios => &mut self.usuarios,
            EntityKind::Productos => &mut self.productos,
            EntityKind::Pedidos => &mut self.pedidos,
            EntityKind::Ventas => &mut self.ventas,
        };
        *slot = collected.records;
    }

    pub fn all_failed(&self) -> bool {
        self.requested > 0 && self.failures.len() == self.requested
    }
}
