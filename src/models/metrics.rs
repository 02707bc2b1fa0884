// src/models/metrics.rs

use serde::Serialize;
use utoipa::ToSchema;

// O "MetricBundle" da auditoria administrativa.
// As chaves JSON seguem os nomes em espanhol que o painel já consome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct MetricBundle {
    #[serde(rename = "usuarios")]
    pub users: UserMetrics,
    #[serde(rename = "productos")]
    pub products: ProductMetrics,
    #[serde(rename = "pedidos")]
    pub orders: OrderMetrics,
    #[serde(rename = "ventas")]
    pub sales: SalesMetrics,
    #[serde(rename = "actividad")]
    pub activity: ActivityMetrics,
}

// 1. Usuários
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct UserMetrics {
    pub total: u64,
    #[serde(rename = "activos")]
    pub active: u64,
    #[serde(rename = "inactivos")]
    pub inactive: u64,
    #[serde(rename = "administradores")]
    pub admins: u64,
    // Vendedores distintos encontrados nos produtos
    #[serde(rename = "vendedores")]
    pub sellers: u64,
    // Compradores distintos encontrados nos pedidos
    #[serde(rename = "compradores")]
    pub buyers: u64,
}

// 2. Produtos
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct ProductMetrics {
    pub total: u64,
    #[serde(rename = "activos")]
    pub active: u64,
    #[serde(rename = "inactivos")]
    pub inactive: u64,
    #[serde(rename = "conStock")]
    pub in_stock: u64,
    #[serde(rename = "sinStock")]
    pub out_of_stock: u64,
    #[serde(rename = "vendedores")]
    pub sellers: u64,
    // Ordenado do maior para o menor (ordenação estável)
    #[serde(rename = "porCategoria")]
    pub by_category: Vec<CategoryCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CategoryCount {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "cantidad")]
    pub count: u64,
}

// 3. Pedidos
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct OrderMetrics {
    pub total: u64,
    #[serde(rename = "pendientes")]
    pub pending: u64,
    #[serde(rename = "enProceso")]
    pub in_progress: u64,
    #[serde(rename = "entregados")]
    pub delivered: u64,
    #[serde(rename = "cancelados")]
    pub cancelled: u64,
    #[serde(rename = "compradores")]
    pub buyers: u64,
}

// 4. Vendas (somente pedidos entregados)
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct SalesMetrics {
    pub total: u64,
    #[serde(rename = "montoTotal")]
    pub amount_total: f64,
    #[serde(rename = "promedio")]
    pub average: f64,
    // Receita do mês corrente
    #[serde(rename = "ultimoMes")]
    pub month_to_date: f64,
}

// 5. Atividade do dia
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct ActivityMetrics {
    #[serde(rename = "registrosHoy")]
    pub registrations_today: u64,
    #[serde(rename = "pedidosHoy")]
    pub orders_today: u64,
    #[serde(rename = "ventasHoy")]
    pub sales_today: f64,
}
