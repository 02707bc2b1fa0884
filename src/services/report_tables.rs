// src/services/report_tables.rs

// Converte métricas e relatórios em tabelas neutras. A planilha e o PDF
// desenham exatamente as mesmas tabelas, cada um no seu formato.

use crate::models::{
    metrics::MetricBundle,
    report::{Cell, ConsolidatedReport, ReportTable, ReportType, SectionData},
    theme::{self, SectionLayout},
};

/// Como o PDF desenha as linhas do corpo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableLook {
    // Bordas finas em todas as células
    Grid,
    // Linhas alternadas sem bordas
    Striped,
}

/// Um documento inteiro: título do bloco de informações e suas tabelas.
#[derive(Debug, Clone)]
pub struct ReportBook {
    pub title: String,
    pub look: TableLook,
    pub tables: Vec<ReportTable>,
}

impl ReportBook {
    pub fn sheet_names(&self) -> Vec<String> {
        self.tables.iter().map(|t| t.sheet_name.clone()).collect()
    }
}

fn concept_table(layout: &SectionLayout, rows: Vec<(&str, Cell)>) -> ReportTable {
    ReportTable::from_layout(
        layout,
        rows.into_iter()
            .map(|(concept, value)| vec![Cell::text(concept), value])
            .collect(),
    )
}

fn money(value: f64) -> Cell {
    Cell::Money(Some(value))
}

pub fn audit_book(bundle: &MetricBundle) -> ReportBook {
    let users = &bundle.users;
    let products = &bundle.products;
    let orders = &bundle.orders;
    let sales = &bundle.sales;
    let activity = &bundle.activity;

    let mut tables = vec![
        concept_table(
            &theme::AUDIT_SUMMARY,
            vec![
                ("Total de Usuarios", Cell::Count(users.total)),
                ("Total de Productos", Cell::Count(products.total)),
                ("Total de Pedidos", Cell::Count(orders.total)),
                ("Monto Total en Ventas", money(sales.amount_total)),
            ],
        ),
        concept_table(
            &theme::AUDIT_USERS,
            vec![
                ("Total de usuarios", Cell::Count(users.total)),
                ("Usuarios activos", Cell::Count(users.active)),
                ("Usuarios inactivos", Cell::Count(users.inactive)),
                ("Administradores", Cell::Count(users.admins)),
                ("Vendedores", Cell::Count(users.sellers)),
                ("Compradores", Cell::Count(users.buyers)),
            ],
        ),
        concept_table(
            &theme::AUDIT_PRODUCTS,
            vec![
                ("Total de productos", Cell::Count(products.total)),
                ("Productos activos", Cell::Count(products.active)),
                ("Productos inactivos", Cell::Count(products.inactive)),
                ("Productos con stock", Cell::Count(products.in_stock)),
                ("Productos sin stock", Cell::Count(products.out_of_stock)),
                ("Total de vendedores", Cell::Count(products.sellers)),
            ],
        ),
        concept_table(
            &theme::AUDIT_ORDERS,
            vec![
                ("Total de pedidos", Cell::Count(orders.total)),
                ("Pedidos pendientes", Cell::Count(orders.pending)),
                ("Pedidos en proceso", Cell::Count(orders.in_progress)),
                ("Pedidos entregados", Cell::Count(orders.delivered)),
                ("Pedidos cancelados", Cell::Count(orders.cancelled)),
                ("Total de compradores", Cell::Count(orders.buyers)),
            ],
        ),
        concept_table(
            &theme::AUDIT_SALES,
            vec![
                ("Total de transacciones", Cell::Count(sales.total)),
                ("Monto total de ventas", money(sales.amount_total)),
                ("Promedio por venta", money(sales.average)),
                ("Ventas último mes", money(sales.month_to_date)),
            ],
        ),
        concept_table(
            &theme::AUDIT_ACTIVITY,
            vec![
                ("Registros de hoy", Cell::Count(activity.registrations_today)),
                ("Pedidos de hoy", Cell::Count(activity.orders_today)),
                ("Ventas de hoy", money(activity.sales_today)),
            ],
        ),
    ];

    if !products.by_category.is_empty() {
        tables.push(ReportTable::from_layout(
            &theme::AUDIT_CATEGORIES,
            products
                .by_category
                .iter()
                .map(|c| vec![Cell::text(c.name.clone()), Cell::Count(c.count)])
                .collect(),
        ));
    }

    ReportBook {
        title: theme::AUDIT_SUMMARY.title.to_string(),
        look: TableLook::Grid,
        tables,
    }
}

/// Resumo primeiro; seções sem linhas não entram.
pub fn consolidated_book(report: &ConsolidatedReport) -> ReportBook {
    let resumen = &report.resumen;

    let mut tables = vec![concept_table(
        &theme::CONSOLIDATED_SUMMARY,
        vec![
            ("Total Productos", Cell::Count(resumen.productos)),
            ("Total Pedidos", Cell::Count(resumen.pedidos)),
            ("Total Ventas", Cell::Count(resumen.ventas)),
            ("Ingresos por Ventas", money(resumen.total_ventas)),
            ("Total en Compras", money(resumen.total_compras)),
        ],
    )];

    for kind in [
        ReportType::Productos,
        ReportType::Pedidos,
        ReportType::Ventas,
        ReportType::Compras,
    ] {
        let section = report.section(kind);
        if !section.is_empty() {
            tables.push(section.to_table());
        }
    }

    ReportBook {
        title: "Consolidado".to_string(),
        look: TableLook::Striped,
        tables,
    }
}

/// Uma única seção, com o título escolhido pelo chamador. `None` se vazia.
pub fn single_book(section: &SectionData, title: &str) -> Option<ReportBook> {
    if section.is_empty() {
        return None;
    }

    let table = section.to_table().with_title(title);
    Some(ReportBook {
        title: title.to_string(),
        look: TableLook::Striped,
        tables: vec![ReportTable {
            sheet_name: title.to_string(),
            ..table
        }],
    })
}
