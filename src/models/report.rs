// src/models/report.rs

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

use crate::{
    common::{error::AppError, format},
    models::theme::{self, SectionLayout},
};

// --- 1. Formato e arquivo de saída ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

/// Documento pronto para download. Só existe em memória.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Momento da geração, compartilhado pelo cabeçalho e pelo nome do arquivo.
#[derive(Debug, Clone, Copy)]
pub struct ExportContext {
    pub generated_at: NaiveDateTime,
}

impl ExportContext {
    pub fn now() -> Self {
        Self { generated_at: Local::now().naive_local() }
    }

    pub fn at(generated_at: NaiveDateTime) -> Self {
        Self { generated_at }
    }

    pub fn consolidated_file(&self, format: ExportFormat) -> String {
        format!(
            "COMUCTIVA_Reporte_Completo_{}.{}",
            format::file_date(self.generated_at),
            format.extension()
        )
    }

    pub fn audit_file(&self, format: ExportFormat) -> String {
        format!(
            "COMUCTIVA_Auditoria_{}.{}",
            format::file_date(self.generated_at),
            format.extension()
        )
    }

    pub fn single_file(&self, slug: &str, format: ExportFormat) -> String {
        format!(
            "COMUCTIVA_Reporte_{}_{}.{}",
            slug,
            format::file_date(self.generated_at),
            format.extension()
        )
    }
}

// --- 2. Tipos de relatório individual ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    Productos,
    Pedidos,
    Ventas,
    Compras,
}

impl ReportType {
    pub fn slug(self) -> &'static str {
        match self {
            ReportType::Productos => "productos",
            ReportType::Pedidos => "pedidos",
            ReportType::Ventas => "ventas",
            ReportType::Compras => "compras",
        }
    }

    pub fn title(self) -> &'static str {
        self.layout().title
    }

    pub fn layout(self) -> SectionLayout {
        match self {
            ReportType::Productos => theme::PRODUCTS,
            ReportType::Pedidos => theme::ORDERS,
            ReportType::Ventas => theme::SALES,
            ReportType::Compras => theme::PURCHASES,
        }
    }
}

impl FromStr for ReportType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "productos" => Ok(ReportType::Productos),
            "pedidos" => Ok(ReportType::Pedidos),
            "ventas" => Ok(ReportType::Ventas),
            "compras" => Ok(ReportType::Compras),
            other => Err(AppError::UnknownReportType(other.to_string())),
        }
    }
}

// --- 3. Linhas de detalhe do relatório consolidado ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub nombre: Option<String>,
    pub valor: Option<f64>,
    pub cantidad: Option<f64>,
    pub categoria: String,
    pub descripcion: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub fecha: Option<String>,
    pub valor: Option<f64>,
    pub estado: Option<String>,
    pub direccion: Option<String>,
    pub metodo_pago: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetail {
    pub producto: String,
    pub cantidad: Option<f64>,
    pub valor: Option<f64>,
    pub total: Option<f64>,
    pub fecha: String,
    pub estado: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDetail {
    pub producto: String,
    pub cantidad: Option<f64>,
    pub valor: Option<f64>,
    pub total: Option<f64>,
    pub vendedor: String,
    pub fecha: String,
    pub estado: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedSummary {
    pub productos: u64,
    pub pedidos: u64,
    pub ventas: u64,
    pub total_ventas: f64,
    pub total_compras: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedReport {
    pub resumen: ConsolidatedSummary,
    #[serde(rename = "productosDetalle")]
    pub productos: Vec<ProductDetail>,
    #[serde(rename = "pedidosDetalle")]
    pub pedidos: Vec<OrderDetail>,
    #[serde(rename = "ventasDetalle")]
    pub ventas: Vec<SaleDetail>,
    #[serde(rename = "comprasDetalle")]
    pub compras: Vec<PurchaseDetail>,
}

impl ConsolidatedReport {
    pub fn section(&self, kind: ReportType) -> SectionData {
        match kind {
            ReportType::Productos => SectionData::Productos(self.productos.clone()),
            ReportType::Pedidos => SectionData::Pedidos(self.pedidos.clone()),
            ReportType::Ventas => SectionData::Ventas(self.ventas.clone()),
            ReportType::Compras => SectionData::Compras(self.compras.clone()),
        }
    }
}

// --- 4. Células e tabelas neutras de formato ---

/// Valor de uma célula antes de virar texto em cada formato.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(Option<String>),
    Count(u64),
    Quantity(Option<f64>),
    Money(Option<f64>),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(Some(value.into()))
    }

    /// Texto da célula na planilha. Dinheiro ausente vira `$0.00`.
    pub fn spreadsheet_text(&self) -> String {
        match self {
            Cell::Text(value) => value.clone().unwrap_or_default(),
            Cell::Count(n) => n.to_string(),
            Cell::Quantity(value) => value.map(quantity).unwrap_or_default(),
            Cell::Money(value) => format::money(value.unwrap_or(0.0)),
        }
    }

    /// Texto da célula no PDF. Ausente vira `N/A`; zero continua zero.
    pub fn pdf_text(&self) -> String {
        match self {
            Cell::Text(value) => value.clone().unwrap_or_else(|| format::MISSING.to_string()),
            Cell::Count(n) => n.to_string(),
            Cell::Quantity(value) => value.map(quantity).unwrap_or_else(|| format::MISSING.to_string()),
            Cell::Money(value) => value.map(format::money).unwrap_or_else(|| format::MISSING.to_string()),
        }
    }
}

fn quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub header: String,
    pub pdf_header: String,
    pub width: u16,
    pub pdf_max_chars: Option<usize>,
}

/// Uma seção tabular, consumida igualmente pela planilha e pelo PDF.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub title: String,
    pub sheet_name: String,
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<Vec<Cell>>,
}

impl ReportTable {
    pub fn from_layout(layout: &SectionLayout, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            title: layout.title.to_string(),
            sheet_name: layout.sheet_name.to_string(),
            columns: layout
                .columns
                .iter()
                .map(|c| ColumnSpec {
                    header: c.header.to_string(),
                    pdf_header: c.pdf_header.to_string(),
                    width: c.width,
                    pdf_max_chars: c.pdf_max_chars,
                })
                .collect(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

// --- 5. Dados de uma seção individual ---

/// Linhas de uma seção já moldadas.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionData {
    Productos(Vec<ProductDetail>),
    Pedidos(Vec<OrderDetail>),
    Ventas(Vec<SaleDetail>),
    Compras(Vec<PurchaseDetail>),
}

impl SectionData {
    pub fn slug(&self) -> &str {
        match self {
            SectionData::Productos(_) => ReportType::Productos.slug(),
            SectionData::Pedidos(_) => ReportType::Pedidos.slug(),
            SectionData::Ventas(_) => ReportType::Ventas.slug(),
            SectionData::Compras(_) => ReportType::Compras.slug(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SectionData::Productos(rows) => rows.len(),
            SectionData::Pedidos(rows) => rows.len(),
            SectionData::Ventas(rows) => rows.len(),
            SectionData::Compras(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_table(&self) -> ReportTable {
        match self {
            SectionData::Productos(rows) => ReportTable::from_layout(
                &theme::PRODUCTS,
                rows.iter()
                    .map(|p| {
                        vec![
                            Cell::Text(p.nombre.clone()),
                            Cell::Money(p.valor),
                            Cell::Quantity(p.cantidad),
                            Cell::text(p.categoria.clone()),
                            Cell::Text(p.descripcion.clone()),
                        ]
                    })
                    .collect(),
            ),
            SectionData::Pedidos(rows) => ReportTable::from_layout(
                &theme::ORDERS,
                rows.iter()
                    .map(|p| {
                        vec![
                            Cell::Text(p.fecha.clone()),
                            Cell::Money(p.valor),
                            Cell::Text(p.estado.clone()),
                            Cell::Text(p.direccion.clone()),
                            Cell::Text(p.metodo_pago.clone()),
                        ]
                    })
                    .collect(),
            ),
            SectionData::Ventas(rows) => ReportTable::from_layout(
                &theme::SALES,
                rows.iter()
                    .map(|v| {
                        vec![
                            Cell::text(v.producto.clone()),
                            Cell::Quantity(v.cantidad),
                            Cell::Money(v.valor),
                            Cell::Money(v.total),
                            Cell::text(v.fecha.clone()),
                            Cell::text(v.estado.clone()),
                        ]
                    })
                    .collect(),
            ),
            SectionData::Compras(rows) => ReportTable::from_layout(
                &theme::PURCHASES,
                rows.iter()
                    .map(|c| {
                        vec![
                            Cell::text(c.producto.clone()),
                            Cell::Quantity(c.cantidad),
                            Cell::Money(c.valor),
                            Cell::Money(c.total),
                            Cell::text(c.vendedor.clone()),
                            Cell::text(c.fecha.clone()),
                            Cell::Text(c.estado.clone()),
                        ]
                    })
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_cells_render_per_format() {
        let cell = Cell::Money(Some(1234.5));
        assert_eq!(cell.spreadsheet_text(), "$1234.50");
        assert_eq!(cell.pdf_text(), "$1234.50");

        let zero = Cell::Money(Some(0.0));
        assert_eq!(zero.pdf_text(), "$0.00");

        let missing = Cell::Money(None);
        assert_eq!(missing.pdf_text(), "N/A");
        assert_eq!(missing.spreadsheet_text(), "$0.00");
    }

    #[test]
    fn missing_values_are_na_only_in_pdf() {
        assert_eq!(Cell::Text(None).pdf_text(), "N/A");
        assert_eq!(Cell::Text(None).spreadsheet_text(), "");
        assert_eq!(Cell::Quantity(Some(0.0)).pdf_text(), "0");
    }

    #[test]
    fn report_type_parses_known_slugs() {
        assert_eq!("Ventas".parse::<ReportType>().unwrap(), ReportType::Ventas);
        assert!(matches!(
            "categorias".parse::<ReportType>(),
            Err(AppError::UnknownReportType(kind)) if kind == "categorias"
        ));
    }

    #[test]
    fn file_names_carry_the_iso_date() {
        let at = chrono::NaiveDate::from_ymd_opt(2025, 11, 30)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        let ctx = ExportContext::at(at);
        assert_eq!(ctx.audit_file(ExportFormat::Pdf), "COMUCTIVA_Auditoria_2025-11-30.pdf");
        assert_eq!(
            ctx.consolidated_file(ExportFormat::Xlsx),
            "COMUCTIVA_Reporte_Completo_2025-11-30.xlsx"
        );
        assert_eq!(
            ctx.single_file("ventas", ExportFormat::Xlsx),
            "COMUCTIVA_Reporte_ventas_2025-11-30.xlsx"
        );
    }
}
