// src/services/spreadsheet_service.rs

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet};

use crate::{
    common::{error::AppError, format},
    models::{
        metrics::MetricBundle,
        report::{ConsolidatedReport, ExportContext, ExportFormat, ExportFile, ReportTable, SectionData},
        theme::{ReportTheme, Rgb},
    },
    services::report_tables::{self, ReportBook},
};

// Limite do Excel para nomes de aba
const MAX_SHEET_NAME: usize = 31;
const FONT: &str = "Calibri";

/// Posição (0-based) de cada bloco de uma aba com `rows` linhas de dados.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetRows {
    pub brand: u32,
    pub subtitle: u32,
    pub timestamp: u32,
    pub divider: u32,
    pub section_title: u32,
    pub header: u32,
    pub first_data: u32,
    pub spacer: u32,
    pub copyright: u32,
    pub notice: u32,
}

impl SheetRows {
    pub fn for_rows(rows: usize) -> Self {
        let first_data = 7;
        let spacer = first_data + rows as u32;
        Self {
            brand: 0,
            subtitle: 1,
            timestamp: 2,
            divider: 3,
            section_title: 5,
            header: 6,
            first_data,
            spacer,
            copyright: spacer + 1,
            notice: spacer + 2,
        }
    }
}

/// Nome de aba aceito pelo Excel: sem `[]:*?/\`, sem aspas nas pontas, até 31 caracteres.
pub fn sheet_name(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .collect();
    let cleaned: String = cleaned.trim().trim_matches('\'').chars().take(MAX_SHEET_NAME).collect();

    if cleaned.is_empty() {
        "Reporte".to_string()
    } else {
        cleaned
    }
}

fn color(rgb: Rgb) -> Color {
    Color::RGB(rgb.hex())
}

#[derive(Clone)]
pub struct SpreadsheetService {
    theme: ReportTheme,
}

impl SpreadsheetService {
    pub fn new(theme: ReportTheme) -> Self {
        Self { theme }
    }

    pub fn export_audit(&self, bundle: &MetricBundle, ctx: &ExportContext) -> Result<ExportFile, AppError> {
        let book = report_tables::audit_book(bundle);
        self.finish(&book, ctx, ctx.audit_file(ExportFormat::Xlsx))
    }

    pub fn export_consolidated(
        &self,
        report: &ConsolidatedReport,
        ctx: &ExportContext,
    ) -> Result<ExportFile, AppError> {
        let book = report_tables::consolidated_book(report);
        self.finish(&book, ctx, ctx.consolidated_file(ExportFormat::Xlsx))
    }

    /// Exporta uma seção. Sem linhas não há arquivo: `NoData`.
    pub fn export_single(
        &self,
        section: &SectionData,
        title: &str,
        ctx: &ExportContext,
    ) -> Result<ExportFile, AppError> {
        let book = report_tables::single_book(section, title).ok_or(AppError::NoData)?;
        self.finish(&book, ctx, ctx.single_file(section.slug(), ExportFormat::Xlsx))
    }

    fn finish(&self, book: &ReportBook, ctx: &ExportContext, file_name: String) -> Result<ExportFile, AppError> {
        let bytes = self.render(book, ctx)?;
        tracing::info!("📗 Planilha {} gerada ({} abas, {} bytes)", file_name, book.tables.len(), bytes.len());

        Ok(ExportFile {
            file_name,
            content_type: ExportFormat::Xlsx.content_type(),
            bytes,
        })
    }

    pub fn render(&self, book: &ReportBook, ctx: &ExportContext) -> Result<Vec<u8>, AppError> {
        let mut workbook = Workbook::new();

        for table in &book.tables {
            let mut worksheet = Worksheet::new();
            worksheet.set_name(sheet_name(&table.sheet_name))?;
            self.write_sheet(&mut worksheet, table, ctx)?;
            workbook.push_worksheet(worksheet);
        }

        Ok(workbook.save_to_buffer()?)
    }

    fn write_sheet(&self, ws: &mut Worksheet, table: &ReportTable, ctx: &ExportContext) -> Result<(), AppError> {
        let t = &self.theme;
        let layout = SheetRows::for_rows(table.rows.len());
        let cols = table.columns.len().max(1) as u16;

        for (i, column) in table.columns.iter().enumerate() {
            ws.set_column_width(i as u16, column.width)?;
        }

        // 1. Cabeçalho da marca
        let brand = self.base().set_bold().set_font_size(20).set_font_color(color(t.accent));
        let subtitle = self.base().set_italic().set_font_size(11).set_font_color(color(t.accent));
        let timestamp = self.base().set_font_size(9).set_font_color(color(t.muted));

        self.banner(ws, layout.brand, cols, &t.masthead_title(), &self.filled(brand, t.light))?;
        self.banner(ws, layout.subtitle, cols, t.subtitle, &self.filled(subtitle, t.light))?;
        self.banner(
            ws,
            layout.timestamp,
            cols,
            &format::masthead_timestamp(ctx.generated_at),
            &self.filled(timestamp, t.light),
        )?;

        let divider = self.filled(Format::new(), t.accent);
        for col in 0..cols {
            ws.write_blank(layout.divider, col, &divider)?;
        }
        ws.set_row_height(layout.divider, 8)?;

        // 2. Título da seção
        let title = Format::new()
            .set_font_name(FONT)
            .set_bold()
            .set_font_size(14)
            .set_font_color(color(t.accent));
        ws.write_string_with_format(layout.section_title, 0, format!("Reporte de {}", table.title), &title)?;

        // 3. Cabeçalho da tabela
        let header = self
            .filled(self.base(), t.accent)
            .set_bold()
            .set_font_size(11)
            .set_font_color(color(t.white))
            .set_text_wrap()
            .set_border_top(FormatBorder::Medium)
            .set_border_top_color(color(t.accent))
            .set_border_bottom(FormatBorder::Medium)
            .set_border_bottom_color(color(t.accent))
            .set_border_left(FormatBorder::Thin)
            .set_border_left_color(color(t.white))
            .set_border_right(FormatBorder::Thin)
            .set_border_right_color(color(t.white));
        for (i, column) in table.columns.iter().enumerate() {
            ws.write_string_with_format(layout.header, i as u16, column.header.as_str(), &header)?;
        }
        ws.set_row_height(layout.header, 25)?;

        // 4. Linhas de dados, alternando o fundo (a primeira é tingida)
        for (offset, row) in table.rows.iter().enumerate() {
            let r = layout.first_data + offset as u32;
            let tinted = offset % 2 == 0;
            for (i, cell) in row.iter().enumerate() {
                let fmt = self.body(tinted, i == 0);
                ws.write_string_with_format(r, i as u16, cell.spreadsheet_text(), &fmt)?;
            }
            ws.set_row_height(r, 18)?;
        }

        // 5. Rodapé
        let spacer = Format::new()
            .set_border_top(FormatBorder::Thin)
            .set_border_top_color(color(t.accent));
        for col in 0..cols {
            ws.write_blank(layout.spacer, col, &spacer)?;
        }

        let footer = self
            .filled(self.base(), t.footer_fill)
            .set_italic()
            .set_font_size(9)
            .set_font_color(color(t.accent));
        let year = chrono::Datelike::year(&ctx.generated_at);
        self.banner(ws, layout.copyright, cols, &t.copyright_line(year), &footer)?;
        self.banner(ws, layout.notice, cols, t.notice, &footer)?;

        Ok(())
    }

    fn base(&self) -> Format {
        Format::new()
            .set_font_name(FONT)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
    }

    fn filled(&self, format: Format, fill: Rgb) -> Format {
        format
            .set_background_color(color(fill))
            .set_pattern(FormatPattern::Solid)
    }

    fn body(&self, tinted: bool, first_column: bool) -> Format {
        let t = &self.theme;
        let fill = if tinted { t.light } else { t.white };
        let align = if first_column { FormatAlign::Left } else { FormatAlign::Center };

        Format::new()
            .set_font_name(FONT)
            .set_font_size(10)
            .set_font_color(color(t.body_text))
            .set_background_color(color(fill))
            .set_pattern(FormatPattern::Solid)
            .set_align(align)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Hair)
            .set_border_color(color(t.hairline))
    }

    // Linha mesclada sobre todas as colunas da tabela (uma coluna: escrita simples)
    fn banner(&self, ws: &mut Worksheet, row: u32, cols: u16, text: &str, fmt: &Format) -> Result<(), AppError> {
        if cols > 1 {
            ws.merge_range(row, 0, row, cols - 1, text, fmt)?;
        } else {
            ws.write_string_with_format(row, 0, text, fmt)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::{ProductDetail, PurchaseDetail, SaleDetail};
    use chrono::NaiveDate;

    fn ctx() -> ExportContext {
        ExportContext::at(
            NaiveDate::from_ymd_opt(2025, 11, 30)
                .unwrap()
                .and_hms_opt(14, 5, 9)
                .unwrap(),
        )
    }

    fn service() -> SpreadsheetService {
        SpreadsheetService::new(ReportTheme::comuctiva())
    }

    #[test]
    fn sheet_rows_follow_the_masthead() {
        let rows = SheetRows::for_rows(3);
        assert_eq!(rows.header, 6);
        assert_eq!(rows.first_data, 7);
        assert_eq!(rows.spacer, 10);
        assert_eq!(rows.copyright, 11);
        assert_eq!(rows.notice, 12);
    }

    #[test]
    fn sheet_names_are_sanitized() {
        assert_eq!(sheet_name("Ventas/Compras [2025]"), "VentasCompras 2025");
        assert_eq!(sheet_name("'Resumen'"), "Resumen");
        assert_eq!(sheet_name("???"), "Reporte");
        assert_eq!(sheet_name(&"x".repeat(40)).chars().count(), 31);
    }

    #[test]
    fn audit_export_produces_a_zip_container() {
        let file = service().export_audit(&MetricBundle::default(), &ctx()).unwrap();
        assert_eq!(file.file_name, "COMUCTIVA_Auditoria_2025-11-30.xlsx");
        assert!(file.bytes.starts_with(b"PK"));
    }

    #[test]
    fn consolidated_export_writes_sections() {
        let report = ConsolidatedReport {
            productos: vec![ProductDetail { nombre: Some("Café".into()), ..ProductDetail::default() }],
            ventas: vec![SaleDetail::default()],
            ..ConsolidatedReport::default()
        };
        let file = service().export_consolidated(&report, &ctx()).unwrap();
        assert_eq!(file.file_name, "COMUCTIVA_Reporte_Completo_2025-11-30.xlsx");
        assert!(file.bytes.starts_with(b"PK"));
    }

    #[test]
    fn empty_single_export_is_no_data() {
        let result = service().export_single(&SectionData::Compras(vec![]), "Compras", &ctx());
        assert!(matches!(result, Err(AppError::NoData)));
    }

    #[test]
    fn single_section_file_is_named_after_its_slug() {
        let section = SectionData::Compras(vec![PurchaseDetail::default()]);
        let file = service().export_single(&section, "Compras", &ctx()).unwrap();
        assert_eq!(file.file_name, "COMUCTIVA_Reporte_compras_2025-11-30.xlsx");
        assert!(file.bytes.starts_with(b"PK"));
    }
}
