// src/services/pdf_service.rs

use genpdf::{elements, style, Alignment, Element};

use crate::{
    common::{error::AppError, format},
    models::{
        metrics::MetricBundle,
        report::{ConsolidatedReport, ExportContext, ExportFile, ExportFormat, ReportTable, SectionData},
        theme::ReportTheme,
    },
    services::{
        pdf_layout::{pdf_color, BrandPageDecorator, LayoutCursor, ShadedCell},
        report_tables::{self, ReportBook, TableLook},
    },
};

// Espaço estimado depois de cada tabela (mm)
const AUDIT_GAP: f64 = 10.0;
const CONSOLIDATED_GAP: f64 = 15.0;

/// PDF pronto em memória e quantas páginas o decorador desenhou.
#[derive(Debug)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

#[derive(Clone)]
pub struct PdfService {
    fonts_dir: String,
    font_family: String,
    theme: ReportTheme,
}

impl PdfService {
    pub fn new(fonts_dir: impl Into<String>, font_family: impl Into<String>, theme: ReportTheme) -> Self {
        Self {
            fonts_dir: fonts_dir.into(),
            font_family: font_family.into(),
            theme,
        }
    }

    pub fn export_audit(&self, bundle: &MetricBundle, ctx: &ExportContext) -> Result<ExportFile, AppError> {
        let book = report_tables::audit_book(bundle);
        self.finish(&book, ctx, ctx.audit_file(ExportFormat::Pdf))
    }

    pub fn export_consolidated(
        &self,
        report: &ConsolidatedReport,
        ctx: &ExportContext,
    ) -> Result<ExportFile, AppError> {
        let book = report_tables::consolidated_book(report);
        self.finish(&book, ctx, ctx.consolidated_file(ExportFormat::Pdf))
    }

    /// Exporta uma seção. Sem linhas não há arquivo: `NoData`.
    pub fn export_single(
        &self,
        section: &SectionData,
        title: &str,
        ctx: &ExportContext,
    ) -> Result<ExportFile, AppError> {
        let book = report_tables::single_book(section, title).ok_or(AppError::NoData)?;
        self.finish(&book, ctx, ctx.single_file(section.slug(), ExportFormat::Pdf))
    }

    fn finish(&self, book: &ReportBook, ctx: &ExportContext, file_name: String) -> Result<ExportFile, AppError> {
        let pdf = self.render(book, ctx)?;
        tracing::info!(
            "📄 PDF {} gerado ({} seções, {} páginas, {} bytes)",
            file_name,
            book.tables.len(),
            pdf.pages,
            pdf.bytes.len()
        );

        Ok(ExportFile {
            file_name,
            content_type: ExportFormat::Pdf.content_type(),
            bytes: pdf.bytes,
        })
    }

    pub fn render(&self, book: &ReportBook, ctx: &ExportContext) -> Result<RenderedPdf, AppError> {
        // 1. Fontes e documento
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, &self.font_family, None).map_err(|e| {
            tracing::error!("🔥 Fonte {} não carregada de {}: {}", self.font_family, self.fonts_dir, e);
            AppError::FontNotFound(format!("{}/{}", self.fonts_dir, self.font_family))
        })?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("{} - Reporte de {}", self.theme.brand, book.title));
        doc.set_font_size(10);

        let year = chrono::Datelike::year(&ctx.generated_at);
        let decorator = BrandPageDecorator::new(self.theme.clone(), year)?;
        let pages = decorator.page_counter();
        doc.set_page_decorator(decorator);

        // 2. Bloco de informações do relatório
        let accent = pdf_color(self.theme.accent);
        doc.push(
            elements::Paragraph::new(format!("Reporte de {}", book.title))
                .aligned(Alignment::Center)
                .styled(style::Style::new().bold().with_font_size(16).with_color(accent)),
        );
        doc.push(
            elements::Paragraph::new(format::generated_line(ctx.generated_at))
                .aligned(Alignment::Center)
                .styled(style::Style::new().with_font_size(9).with_color(style::Color::Rgb(100, 100, 100))),
        );
        doc.push(elements::Break::new(1.5));

        // 3. Seções; a quebra manual evita título sozinho no pé da página
        let gap = match book.look {
            TableLook::Grid => AUDIT_GAP,
            TableLook::Striped => CONSOLIDATED_GAP,
        };
        let mut cursor = LayoutCursor::new(gap);

        for table in &book.tables {
            if cursor.begin_section() {
                doc.push(elements::PageBreak::new());
            }

            doc.push(
                elements::Paragraph::new(table.title.as_str())
                    .styled(style::Style::new().bold().with_font_size(14).with_color(accent)),
            );
            doc.push(elements::Break::new(0.5));
            doc.push(self.table_layout(table, book.look)?);
            doc.push(elements::Break::new(if gap > AUDIT_GAP { 2.5 } else { 1.5 }));

            cursor.advance_table(table.rows.len());
        }

        // 4. Renderiza para buffer (memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer)?;
        Ok(RenderedPdf { bytes: buffer, pages: pages.get() })
    }

    fn table_layout(&self, table: &ReportTable, look: TableLook) -> Result<elements::TableLayout, AppError> {
        let t = &self.theme;
        let weights = table.columns.iter().map(|c| usize::from(c.width.max(1))).collect();
        let mut layout = elements::TableLayout::new(weights);

        let header_style = style::Style::new()
            .bold()
            .with_font_size(10)
            .with_color(pdf_color(t.white));
        let mut header = layout.row();
        for column in &table.columns {
            header.push_element(
                ShadedCell::new(column.pdf_header.as_str(), header_style)
                    .with_fill(Some(pdf_color(t.accent)))
                    .aligned(Alignment::Center),
            );
        }
        header.push()?;

        let border = match look {
            TableLook::Grid => Some(pdf_color(t.hairline)),
            TableLook::Striped => None,
        };
        let body_style = style::Style::new()
            .with_font_size(9)
            .with_color(pdf_color(t.body_text));

        for (index, row) in table.rows.iter().enumerate() {
            let fill = (index % 2 == 1).then(|| pdf_color(t.stripe));
            let mut line = layout.row();

            for (col, (cell, column)) in row.iter().zip(&table.columns).enumerate() {
                let text = cell.pdf_text();
                let text = match column.pdf_max_chars {
                    Some(max) => format::truncate(&text, max),
                    None => text,
                };
                let alignment = if col == 0 { Alignment::Left } else { Alignment::Center };

                line.push_element(
                    ShadedCell::new(text, body_style)
                        .with_fill(fill)
                        .with_border(border)
                        .aligned(alignment),
                );
            }
            line.push()?;
        }

        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::ProductDetail;
    use chrono::NaiveDate;

    fn ctx() -> ExportContext {
        ExportContext::at(
            NaiveDate::from_ymd_opt(2025, 11, 30)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn missing_fonts_are_reported() {
        let service = PdfService::new("/nao/existe", "Roboto", ReportTheme::comuctiva());
        let result = service.export_audit(&MetricBundle::default(), &ctx());
        assert!(matches!(result, Err(AppError::FontNotFound(path)) if path == "/nao/existe/Roboto"));
    }

    #[test]
    fn empty_single_export_is_no_data_before_touching_fonts() {
        let service = PdfService::new("/nao/existe", "Roboto", ReportTheme::comuctiva());
        let result = service.export_single(&SectionData::Pedidos(vec![]), "Pedidos", &ctx());
        assert!(matches!(result, Err(AppError::NoData)));
    }

    fn fixture_service() -> PdfService {
        let fonts = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/fonts");
        PdfService::new(fonts, "DejaVuSans", ReportTheme::comuctiva())
    }

    fn products(count: usize) -> Vec<ProductDetail> {
        (0..count)
            .map(|i| ProductDetail { nombre: Some(format!("Producto {}", i)), ..ProductDetail::default() })
            .collect()
    }

    #[test]
    fn short_section_fits_on_one_decorated_page() {
        let section = SectionData::Productos(products(3));
        let book = report_tables::single_book(&section, "Productos").unwrap();

        let pdf = fixture_service().render(&book, &ctx()).unwrap();

        assert!(pdf.bytes.starts_with(b"%PDF"));
        assert_eq!(pdf.pages, 1);
    }

    #[test]
    fn long_tables_overflow_onto_pages_that_are_decorated_again() {
        let report = ConsolidatedReport {
            productos: products(80),
            ..ConsolidatedReport::default()
        };
        let book = report_tables::consolidated_book(&report);

        let pdf = fixture_service().render(&book, &ctx()).unwrap();

        // ~30 linhas por página: resumo + 80 produtos ocupam pelo menos 3
        assert!(pdf.pages >= 3, "páginas: {}", pdf.pages);
        assert!(pdf.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn audit_export_renders_every_section() {
        let file = fixture_service().export_audit(&MetricBundle::default(), &ctx()).unwrap();

        assert_eq!(file.file_name, "COMUCTIVA_Auditoria_2025-11-30.pdf");
        assert_eq!(file.content_type, ExportFormat::Pdf.content_type());
        assert!(file.bytes.starts_with(b"%PDF"));
    }
}
