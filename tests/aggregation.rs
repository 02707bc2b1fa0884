// tests/aggregation.rs

mod common;

use chrono::NaiveDate;
use serde_json::json;

use comuctiva_reports::{
    models::raw::RawCollections,
    services::{audit_service::aggregate, AuditService, CollectorService},
};

use common::FakeBackend;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 30).unwrap()
}

#[test]
fn active_flags_accept_true_one_and_string_one() {
    let records = vec![
        json!({ "activo": true }),
        json!({ "activo": 1 }),
        json!({ "activo": "1" }),
        json!({ "activo": false }),
        json!({ "activo": 0 }),
        json!({}),
    ];
    let raw = RawCollections {
        usuarios: records.clone(),
        productos: records,
        ..RawCollections::default()
    };

    let bundle = aggregate(&raw, today());

    assert_eq!(bundle.users.active, 3);
    assert_eq!(bundle.users.inactive, 3);
    assert_eq!(bundle.products.active, 3);
    assert_eq!(bundle.products.inactive, 3);
}

#[test]
fn complementary_counts_always_add_up() {
    let raw = RawCollections {
        usuarios: vec![json!({ "activo": "si" }), json!({ "activo": 1 }), json!(null)],
        productos: vec![
            json!({ "activo": true, "cantidad": 4 }),
            json!({ "stock": "0" }),
            json!({ "cantidad": -2 }),
            json!("no es un objeto"),
        ],
        ..RawCollections::default()
    };

    let bundle = aggregate(&raw, today());

    assert_eq!(bundle.users.active + bundle.users.inactive, bundle.users.total);
    assert_eq!(bundle.products.active + bundle.products.inactive, bundle.products.total);
    assert_eq!(bundle.products.in_stock + bundle.products.out_of_stock, bundle.products.total);
    assert_eq!(bundle.products.in_stock, 1);
}

#[test]
fn categories_are_ranked_by_count() {
    let productos = ["A", "B", "A", "C", "B", "A"]
        .iter()
        .map(|c| json!({ "categoria": c }))
        .collect();
    let raw = RawCollections { productos, ..RawCollections::default() };

    let ranking: Vec<(String, u64)> = aggregate(&raw, today())
        .products
        .by_category
        .into_iter()
        .map(|c| (c.name, c.count))
        .collect();

    assert_eq!(
        ranking,
        vec![("A".to_string(), 3), ("B".to_string(), 2), ("C".to_string(), 1)]
    );
}

#[test]
fn revenue_only_counts_delivered_orders() {
    let raw = RawCollections {
        pedidos: vec![
            json!({ "estado": "PENDIENTE" }),
            json!({ "estado": "ENTREGADO", "total": 100 }),
            json!({ "estado": "CANCELADO" }),
            json!({ "estado": "COMPLETADO", "total": 50 }),
        ],
        ..RawCollections::default()
    };

    let bundle = aggregate(&raw, today());

    assert_eq!(bundle.sales.amount_total, 150.0);
    assert_eq!(bundle.sales.total, 2);
    assert_eq!(bundle.sales.average, 75.0);
    assert_eq!(bundle.orders.pending, 1);
    assert_eq!(bundle.orders.cancelled, 1);
    assert_eq!(bundle.orders.delivered, 2);
}

#[tokio::test]
async fn failing_orders_still_produce_a_full_bundle() {
    let backend = FakeBackend::new()
        .route("/usuarios", vec![json!({ "activo": true, "rol": "ADMIN" })])
        .route("/productos", vec![json!({ "activo": 1, "categoria": "Frutas" })])
        .shared();
    let service = AuditService::new(CollectorService::new(backend.clone()));

    let bundle = service.build_bundle(None).await.unwrap();

    assert_eq!(bundle.orders.total, 0);
    assert_eq!(bundle.sales.total, 0);
    assert_eq!(bundle.users.total, 1);
    assert_eq!(bundle.users.admins, 1);
    assert_eq!(bundle.products.by_category.len(), 1);
    assert!(backend.called("/pedidos"));
    assert!(backend.called("/pedidos/all"));
}

#[tokio::test]
async fn every_collector_failing_is_an_error() {
    let service = AuditService::new(CollectorService::new(FakeBackend::new().shared()));

    let result = service.build_bundle(Some("token")).await;

    assert!(matches!(
        result,
        Err(comuctiva_reports::common::error::AppError::ReportDataUnavailable)
    ));
}
