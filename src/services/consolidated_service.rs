// src/services/consolidated_service.rs

use serde_json::Value;

use crate::{
    common::{
        error::AppError,
        fields::{self, Field},
        format,
    },
    models::report::{
        ConsolidatedReport, ConsolidatedSummary, OrderDetail, ProductDetail, PurchaseDetail,
        ReportType, SaleDetail, SectionData,
    },
    services::collector_service::CollectorService,
};

// Campos do relatório "todos" do vendedor
const NAME: Field = Field::new("nombre", &[&["nombre"]]);
const PRICE: Field = Field::new("precio", &[&["precio"]]);
const STOCK: Field = Field::new("stock", &[&["stock"], &["cantidad"]]);
const DESCRIPTION: Field = Field::new("descripcion", &[&["descripcion"]]);

const ORDER_DATE: Field = Field::new("fechaPedido", &[&["fechaPedido"]]);
const ORDER_TOTAL: Field = Field::new("total", &[&["total"]]);
const ORDER_STATE: Field = Field::new("estado", &[&["estado"]]);
const SHIPPING_ADDRESS: Field = Field::new("direccionEnvio", &[&["direccionEnvio"]]);
const PAYMENT_METHOD: Field = Field::new("metodoPago", &[&["metodoPago"]]);

const SALE_PRODUCT: Field = Field::new("producto", &[&["producto", "nombre"], &["productoNombre"]]);
const LINE_PRODUCT: Field = Field::new("producto", &[&["productoNombre"], &["producto", "nombre"]]);
const QUANTITY: Field = Field::new("cantidad", &[&["cantidad"]]);
const UNIT_PRICE: Field = Field::new("precioUnitario", &[&["precioUnitario"]]);
const SUBTOTAL: Field = Field::new("subtotal", &[&["subtotal"]]);
const SALE_ORDER_DATE: Field = Field::new("pedido.fechaPedido", &[&["pedido", "fechaPedido"]]);
const SALE_ORDER_STATE: Field = Field::new("pedido.estado", &[&["pedido", "estado"]]);
const SELLER_NAME: Field = Field::new("vendedorNombre", &[&["vendedorNombre"]]);

/// Data no formato curto; se não for interpretável, o texto original.
fn display_date(field: &Field, record: &Value) -> Option<String> {
    match field.local_date(record) {
        Some(date) => Some(format::short_date(date)),
        None => field.text(record),
    }
}

// `subtotal` quando existe, senão preço unitário × quantidade
fn line_total(line: &Value) -> Option<f64> {
    SUBTOTAL.optional_number(line).or_else(|| {
        let price = UNIT_PRICE.optional_number(line)?;
        let quantity = QUANTITY.optional_number(line)?;
        Some(price * quantity)
    })
}

fn or_missing(value: Option<String>) -> String {
    value.unwrap_or_else(|| format::MISSING.to_string())
}

pub fn shape_products(products: &[Value]) -> Vec<ProductDetail> {
    products
        .iter()
        .map(|p| ProductDetail {
            nombre: NAME.text(p),
            valor: PRICE.optional_number(p),
            cantidad: STOCK.optional_number(p),
            categoria: fields::category_name(p),
            descripcion: DESCRIPTION.text(p),
        })
        .collect()
}

pub fn shape_orders(orders: &[Value]) -> Vec<OrderDetail> {
    orders
        .iter()
        .map(|o| OrderDetail {
            fecha: display_date(&ORDER_DATE, o),
            valor: ORDER_TOTAL.optional_number(o),
            estado: ORDER_STATE.text(o),
            direccion: SHIPPING_ADDRESS.text(o),
            metodo_pago: PAYMENT_METHOD.text(o),
        })
        .collect()
}

pub fn shape_sales(sales: &[Value]) -> Vec<SaleDetail> {
    sales
        .iter()
        .map(|s| SaleDetail {
            producto: or_missing(SALE_PRODUCT.text(s)),
            cantidad: QUANTITY.optional_number(s),
            valor: UNIT_PRICE.optional_number(s),
            total: line_total(s),
            fecha: or_missing(display_date(&SALE_ORDER_DATE, s)),
            estado: or_missing(SALE_ORDER_STATE.text(s)),
        })
        .collect()
}

/// Uma linha por item de `detalles` de cada pedido do comprador.
pub fn shape_purchases(orders: &[Value]) -> Vec<PurchaseDetail> {
    let mut purchases = Vec::new();

    for order in orders {
        let Some(lines) = order.get("detalles").and_then(Value::as_array) else {
            continue;
        };
        let fecha = or_missing(display_date(&ORDER_DATE, order));
        let estado = ORDER_STATE.text(order);

        for line in lines {
            purchases.push(PurchaseDetail {
                producto: or_missing(LINE_PRODUCT.text(line)),
                cantidad: QUANTITY.optional_number(line),
                valor: UNIT_PRICE.optional_number(line),
                total: line_total(line),
                vendedor: or_missing(SELLER_NAME.text(line)),
                fecha: fecha.clone(),
                estado: estado.clone(),
            });
        }
    }

    purchases
}

/// Molda as três listas cruas no relatório consolidado.
pub fn shape(products: &[Value], orders: &[Value], sales: &[Value]) -> ConsolidatedReport {
    let productos = shape_products(products);
    let pedidos = shape_orders(orders);
    let ventas = shape_sales(sales);
    let compras = shape_purchases(orders);

    let resumen = ConsolidatedSummary {
        productos: productos.len() as u64,
        pedidos: pedidos.len() as u64,
        ventas: ventas.len() as u64,
        total_ventas: format::sum_amounts(ventas.iter().filter_map(|v| v.total)),
        total_compras: format::sum_amounts(pedidos.iter().filter_map(|p| p.valor)),
    };

    ConsolidatedReport {
        resumen,
        productos,
        pedidos,
        ventas,
        compras,
    }
}

#[derive(Clone)]
pub struct ConsolidatedService {
    collector: CollectorService,
}

impl ConsolidatedService {
    pub fn new(collector: CollectorService) -> Self {
        Self { collector }
    }

    pub async fn build_report(
        &self,
        documento: Option<&str>,
        token: Option<&str>,
    ) -> Result<ConsolidatedReport, AppError> {
        let raw = self.collector.collect_consolidated(documento, token).await;

        if raw.all_failed() {
            return Err(AppError::ReportDataUnavailable);
        }

        let report = shape(&raw.productos, &raw.pedidos, &raw.ventas);
        tracing::info!(
            "🧾 Relatório consolidado: {} produtos, {} pedidos, {} vendas, {} compras",
            report.productos.len(),
            report.pedidos.len(),
            report.ventas.len(),
            report.compras.len()
        );
        Ok(report)
    }

    /// Uma seção do relatório consolidado, para exportação individual.
    pub async fn build_section(
        &self,
        kind: ReportType,
        documento: Option<&str>,
        token: Option<&str>,
    ) -> Result<SectionData, AppError> {
        let report = self.build_report(documento, token).await?;
        Ok(report.section(kind))
    }
}
