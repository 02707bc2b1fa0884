// src/services/audit_service.rs

use chrono::{Datelike, Local, NaiveDate};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

use crate::{
    common::{
        error::AppError,
        fields::{self, Field},
        format,
    },
    models::{
        metrics::{
            ActivityMetrics, CategoryCount, MetricBundle, OrderMetrics, ProductMetrics,
            SalesMetrics, UserMetrics,
        },
        raw::RawCollections,
    },
    services::collector_service::CollectorService,
};

/// Estado normalizado de um pedido.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    InProgress,
    Delivered,
    Cancelled,
    // Fora dos tokens conhecidos: só conta no total
    Other,
}

impl OrderStatus {
    pub fn from_token(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "PENDIENTE" | "PENDING" => OrderStatus::Pending,
            "EN_PROCESO" | "ENVIADO" | "EN PROCESO" | "PROCESSING" => OrderStatus::InProgress,
            "ENTREGADO" | "COMPLETADO" | "DELIVERED" | "COMPLETED" => OrderStatus::Delivered,
            "CANCELADO" | "CANCELLED" => OrderStatus::Cancelled,
            _ => OrderStatus::Other,
        }
    }

    pub fn of(order: &Value) -> Self {
        fields::ORDER_STATUS
            .resolve(order)
            .and_then(fields::display_name)
            .map(|s| Self::from_token(&s))
            .unwrap_or(OrderStatus::Other)
    }
}

/// Reduz as listas cruas ao `MetricBundle`. Função pura: `today` é o dia local
/// de referência para "hoje" e "este mês".
pub fn aggregate(raw: &RawCollections, today: NaiveDate) -> MetricBundle {
    let sellers = distinct(&raw.productos, &fields::PRODUCT_VENDOR);
    let buyers = distinct(&raw.pedidos, &fields::ORDER_BUYER);

    MetricBundle {
        users: user_metrics(&raw.usuarios, sellers, buyers),
        products: product_metrics(&raw.productos, sellers),
        orders: order_metrics(&raw.pedidos, buyers),
        sales: sales_metrics(&raw.pedidos, today),
        activity: activity_metrics(&raw.usuarios, &raw.pedidos, today),
    }
}

fn count(n: usize) -> u64 {
    n as u64
}

fn distinct(records: &[Value], field: &Field) -> u64 {
    let ids: HashSet<String> = records.iter().filter_map(|r| field.identifier(r)).collect();
    count(ids.len())
}

fn user_metrics(users: &[Value], sellers: u64, buyers: u64) -> UserMetrics {
    let total = count(users.len());
    let active = count(users.iter().filter(|u| fields::ACTIVE.flag(u)).count());
    let admins = count(
        users
            .iter()
            .filter(|u| {
                fields::USER_ROLE
                    .resolve(u)
                    .and_then(fields::display_name)
                    .is_some_and(|rol| rol.trim().eq_ignore_ascii_case("ADMIN"))
            })
            .count(),
    );

    UserMetrics {
        total,
        active,
        inactive: total - active,
        admins,
        sellers,
        buyers,
    }
}

fn product_metrics(products: &[Value], sellers: u64) -> ProductMetrics {
    let total = count(products.len());
    let active = count(products.iter().filter(|p| fields::ACTIVE.flag(p)).count());
    // Parte inteira do estoque, como o painel fazia com parseInt
    let in_stock = count(
        products
            .iter()
            .filter(|p| fields::PRODUCT_STOCK.number(p).trunc() > 0.0)
            .count(),
    );

    ProductMetrics {
        total,
        active,
        inactive: total - active,
        in_stock,
        out_of_stock: total - in_stock,
        sellers,
        by_category: rank_categories(products),
    }
}

/// Agrupa por categoria na ordem em que aparecem e ordena de forma estável,
/// do maior para o menor. Empates mantêm a ordem de chegada.
pub fn rank_categories(products: &[Value]) -> Vec<CategoryCount> {
    let mut ranking: Vec<CategoryCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for product in products {
        let name = fields::category_name(product);
        match index.get(&name) {
            Some(&i) => ranking[i].count += 1,
            None => {
                index.insert(name.clone(), ranking.len());
                ranking.push(CategoryCount { name, count: 1 });
            }
        }
    }

    // sort_by é estável
    ranking.sort_by(|a, b| b.count.cmp(&a.count));
    ranking
}

fn order_metrics(orders: &[Value], buyers: u64) -> OrderMetrics {
    let mut metrics = OrderMetrics {
        total: count(orders.len()),
        buyers,
        ..OrderMetrics::default()
    };

    for order in orders {
        match OrderStatus::of(order) {
            OrderStatus::Pending => metrics.pending += 1,
            OrderStatus::InProgress => metrics.in_progress += 1,
            OrderStatus::Delivered => metrics.delivered += 1,
            OrderStatus::Cancelled => metrics.cancelled += 1,
            OrderStatus::Other => {}
        }
    }

    metrics
}

fn delivered(orders: &[Value]) -> impl Iterator<Item = &Value> {
    orders.iter().filter(|o| OrderStatus::of(o) == OrderStatus::Delivered)
}

fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

fn sales_metrics(orders: &[Value], today: NaiveDate) -> SalesMetrics {
    let mut total = 0u64;
    let mut amount_total = 0.0;
    let mut month_to_date = 0.0;

    for order in delivered(orders) {
        let amount = fields::ORDER_AMOUNT.number(order);
        total += 1;
        amount_total += amount;

        if fields::ORDER_DATE
            .local_date(order)
            .is_some_and(|date| same_month(date, today))
        {
            month_to_date += amount;
        }
    }

    SalesMetrics {
        total,
        amount_total,
        average: if total > 0 { amount_total / total as f64 } else { 0.0 },
        month_to_date,
    }
}

fn activity_metrics(users: &[Value], orders: &[Value], today: NaiveDate) -> ActivityMetrics {
    let is_today = |field: &Field, record: &Value| field.local_date(record) == Some(today);

    ActivityMetrics {
        registrations_today: count(
            users
                .iter()
                .filter(|u| is_today(&fields::USER_REGISTERED_AT, *u))
                .count(),
        ),
        orders_today: count(orders.iter().filter(|o| is_today(&fields::ORDER_DATE, *o)).count()),
        sales_today: format::sum_amounts(
            delivered(orders)
                .filter(|o| is_today(&fields::ORDER_DATE, *o))
                .map(|o| fields::ORDER_AMOUNT.number(o)),
        ),
    }
}

#[derive(Clone)]
pub struct AuditService {
    collector: CollectorService,
}

impl AuditService {
    pub fn new(collector: CollectorService) -> Self {
        Self { collector }
    }

    /// Coleta tudo e agrega. Só falha se nenhuma fonte respondeu.
    pub async fn build_bundle(&self, token: Option<&str>) -> Result<MetricBundle, AppError> {
        let raw = self.collector.collect_audit(token).await;

        if raw.all_failed() {
            return Err(AppError::ReportDataUnavailable);
        }

        let bundle = aggregate(&raw, Local::now().date_naive());
        tracing::info!(
            "📊 Auditoria agregada: {} usuários, {} produtos, {} pedidos",
            bundle.users.total,
            bundle.products.total,
            bundle.orders.total
        );
        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 30).unwrap()
    }

    #[test]
    fn status_tokens_are_case_insensitive() {
        assert_eq!(OrderStatus::from_token("entregado"), OrderStatus::Delivered);
        assert_eq!(OrderStatus::from_token("En Proceso"), OrderStatus::InProgress);
        assert_eq!(OrderStatus::from_token("enviado"), OrderStatus::InProgress);
        assert_eq!(OrderStatus::from_token("devuelto"), OrderStatus::Other);
    }

    #[test]
    fn estado_pedido_wins_over_estado() {
        let order = json!({ "estadoPedido": "CANCELADO", "estado": "ENTREGADO" });
        assert_eq!(OrderStatus::of(&order), OrderStatus::Cancelled);
    }

    #[test]
    fn unknown_statuses_only_count_in_total() {
        let raw = RawCollections {
            pedidos: vec![json!({ "estado": "DEVUELTO" }), json!({})],
            ..RawCollections::default()
        };
        let orders = aggregate(&raw, today()).orders;
        assert_eq!(orders.total, 2);
        assert_eq!(orders.pending + orders.in_progress + orders.delivered + orders.cancelled, 0);
    }

    #[test]
    fn stock_uses_integer_part() {
        let raw = RawCollections {
            productos: vec![
                json!({ "cantidad": 0.5 }),
                json!({ "stock": "3" }),
                json!({ "cantidad": null, "stock": 2 }),
                json!({ "cantidad": "muchos" }),
            ],
            ..RawCollections::default()
        };
        let products = aggregate(&raw, today()).products;
        assert_eq!(products.in_stock, 2);
        assert_eq!(products.out_of_stock, 2);
    }

    #[test]
    fn distinct_sellers_and_buyers_skip_records_without_ids() {
        let raw = RawCollections {
            productos: vec![
                json!({ "usuarioId": 1 }),
                json!({ "vendedor": { "id": 1 } }),
                json!({ "vendedorId": 2 }),
                json!({ "nombre": "sin dueño" }),
            ],
            pedidos: vec![
                json!({ "usuarioDocumento": "A" }),
                json!({ "comprador": { "id": "B" } }),
                json!({ "usuario": { "documento": "A" } }),
                json!({}),
            ],
            ..RawCollections::default()
        };
        let bundle = aggregate(&raw, today());
        assert_eq!(bundle.users.sellers, 2);
        assert_eq!(bundle.products.sellers, 2);
        assert_eq!(bundle.users.buyers, 2);
        assert_eq!(bundle.orders.buyers, 2);
    }

    #[test]
    fn admins_match_role_regardless_of_case() {
        let raw = RawCollections {
            usuarios: vec![
                json!({ "rol": "ADMIN" }),
                json!({ "rol": "admin" }),
                json!({ "rol": "VENDEDOR" }),
                json!({}),
            ],
            ..RawCollections::default()
        };
        assert_eq!(aggregate(&raw, today()).users.admins, 2);
    }

    #[test]
    fn month_and_day_buckets_use_local_dates() {
        let raw = RawCollections {
            usuarios: vec![
                json!({ "fechaRegistro": "2025-11-30T08:00:00" }),
                json!({ "createdAt": "2025-11-29" }),
                json!({ "fechaRegistro": "no es fecha" }),
            ],
            pedidos: vec![
                json!({ "estado": "ENTREGADO", "total": 10, "fechaPedido": "2025-11-30T09:30:00" }),
                json!({ "estado": "ENTREGADO", "total": 20, "fecha": "2025-11-02" }),
                json!({ "estado": "ENTREGADO", "total": 40, "fecha": "2025-10-31" }),
                json!({ "estado": "PENDIENTE", "total": 80, "fechaPedido": "2025-11-30" }),
                json!({ "estado": "ENTREGADO", "total": 160 }),
            ],
            ..RawCollections::default()
        };
        let bundle = aggregate(&raw, today());

        assert_eq!(bundle.activity.registrations_today, 1);
        assert_eq!(bundle.activity.orders_today, 2);
        assert_eq!(bundle.activity.sales_today, 10.0);
        assert_eq!(bundle.sales.month_to_date, 30.0);
        assert_eq!(bundle.sales.amount_total, 230.0);
        assert_eq!(bundle.sales.average, 57.5);
    }

    #[test]
    fn missing_total_falls_back_to_shipping_cost() {
        let raw = RawCollections {
            pedidos: vec![json!({ "estado": "ENTREGADO", "costoFlete": 7.5 })],
            ..RawCollections::default()
        };
        assert_eq!(aggregate(&raw, today()).sales.amount_total, 7.5);
    }

    #[test]
    fn empty_input_gives_zeroed_bundle() {
        let bundle = aggregate(&RawCollections::default(), today());
        assert_eq!(bundle, MetricBundle::default());
    }
}
