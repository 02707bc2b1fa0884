// src/models/theme.rs

// Identidade visual compartilhada pelos dois exportadores (planilha e PDF).
// Qualquer cor, texto de cabeçalho ou largura de coluna mora aqui.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Valor `0xRRGGBB`.
    pub fn hex(self) -> u32 {
        (u32::from(self.0) << 16) | (u32::from(self.1) << 8) | u32::from(self.2)
    }
}

#[derive(Debug, Clone)]
pub struct ReportTheme {
    pub brand: &'static str,
    pub brand_mark: &'static str,
    pub subtitle: &'static str,
    pub notice: &'static str,

    pub accent: Rgb,
    pub light: Rgb,
    pub hairline: Rgb,
    pub footer_fill: Rgb,
    pub body_text: Rgb,
    pub muted: Rgb,
    pub stripe: Rgb,
    pub white: Rgb,
    pub footer_text: Rgb,
}

impl ReportTheme {
    pub fn comuctiva() -> Self {
        Self {
            brand: "COMUCTIVA",
            brand_mark: "🌱",
            subtitle: "Plataforma de Comercio Comunitario",
            notice: "Documento generado automáticamente",

            accent: Rgb(0x1A, 0x69, 0x2B),
            light: Rgb(0xE8, 0xF5, 0xE9),
            hairline: Rgb(0xC8, 0xE6, 0xC9),
            footer_fill: Rgb(0xF9, 0xFB, 0xF9),
            body_text: Rgb(0x33, 0x33, 0x33),
            muted: Rgb(0x66, 0x66, 0x66),
            stripe: Rgb(245, 250, 245),
            white: Rgb(0xFF, 0xFF, 0xFF),
            footer_text: Rgb(128, 128, 128),
        }
    }

    /// Título da planilha (com o símbolo da marca).
    pub fn masthead_title(&self) -> String {
        format!("{} {}", self.brand_mark, self.brand)
    }

    pub fn copyright_line(&self, year: i32) -> String {
        format!("© {} {} - Todos los derechos reservados", year, self.brand)
    }
}

impl Default for ReportTheme {
    fn default() -> Self {
        Self::comuctiva()
    }
}

/// Uma coluna de tabela: cabeçalho na planilha, cabeçalho no PDF, largura em
/// caracteres e limite de caracteres na célula do PDF.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    pub pdf_header: &'static str,
    pub width: u16,
    pub pdf_max_chars: Option<usize>,
}

const fn col(header: &'static str, pdf_header: &'static str, width: u16) -> Column {
    Column { header, pdf_header, width, pdf_max_chars: None }
}

const fn clipped(header: &'static str, pdf_header: &'static str, width: u16, max: usize) -> Column {
    Column { header, pdf_header, width, pdf_max_chars: Some(max) }
}

#[derive(Debug, Clone, Copy)]
pub struct SectionLayout {
    // Entra em "Reporte de <title>"
    pub title: &'static str,
    pub sheet_name: &'static str,
    pub columns: &'static [Column],
}

// --- Relatório consolidado ---

pub const CONSOLIDATED_SUMMARY: SectionLayout = SectionLayout {
    title: "Resumen General",
    sheet_name: "Resumen",
    columns: &[col("METRICA", "Métrica", 30), col("VALOR", "Valor", 20)],
};

pub const PRODUCTS: SectionLayout = SectionLayout {
    title: "Productos",
    sheet_name: "Productos",
    columns: &[
        col("Nombre", "Nombre", 25),
        col("Valor", "Valor", 12),
        col("Cantidad", "Cant.", 10),
        col("Categoria", "Categoría", 18),
        clipped("Descripcion", "Descripción", 40, 35),
    ],
};

pub const ORDERS: SectionLayout = SectionLayout {
    title: "Pedidos",
    sheet_name: "Pedidos",
    columns: &[
        col("Fecha", "Fecha", 12),
        col("Valor", "Valor", 12),
        col("Estado", "Estado", 15),
        clipped("Direccion", "Dirección", 35, 30),
        col("Metodo de Pago", "Pago", 18),
    ],
};

pub const SALES: SectionLayout = SectionLayout {
    title: "Ventas",
    sheet_name: "Ventas",
    columns: &[
        clipped("Producto", "Producto", 25, 20),
        col("Cantidad", "Cant.", 10),
        col("Valor Unitario", "Valor Unit.", 15),
        col("Total", "Total", 15),
        col("Fecha", "Fecha", 12),
        col("Estado", "Estado", 15),
    ],
};

pub const PURCHASES: SectionLayout = SectionLayout {
    title: "Compras",
    sheet_name: "Compras",
    columns: &[
        clipped("Producto", "Producto", 22, 18),
        col("Cantidad", "Cant.", 10),
        col("Valor Unitario", "Valor Unit.", 15),
        col("Total", "Total", 15),
        clipped("Vendedor", "Vendedor", 25, 15),
        col("Fecha", "Fecha", 12),
        col("Estado", "Estado", 15),
    ],
};

// --- Auditoria administrativa ---

pub const AUDIT_SUMMARY: SectionLayout = SectionLayout {
    title: "Auditoría Administrativa",
    sheet_name: "Resumen General",
    columns: &[col("SECCION", "Sección", 35), col("TOTAL", "Total", 25)],
};

pub const AUDIT_USERS: SectionLayout = SectionLayout {
    title: "Estadísticas de Usuarios",
    sheet_name: "Usuarios",
    columns: &[col("CONCEPTO", "Usuarios", 35), col("CANTIDAD", "Cantidad", 20)],
};

pub const AUDIT_PRODUCTS: SectionLayout = SectionLayout {
    title: "Estadísticas de Productos",
    sheet_name: "Productos",
    columns: &[col("CONCEPTO", "Productos", 35), col("CANTIDAD", "Cantidad", 20)],
};

pub const AUDIT_ORDERS: SectionLayout = SectionLayout {
    title: "Estadísticas de Pedidos",
    sheet_name: "Pedidos",
    columns: &[col("CONCEPTO", "Pedidos", 35), col("CANTIDAD", "Cantidad", 20)],
};

pub const AUDIT_SALES: SectionLayout = SectionLayout {
    title: "Estadísticas de Ventas",
    sheet_name: "Ventas",
    columns: &[col("CONCEPTO", "Ventas", 35), col("VALOR", "Valor", 25)],
};

pub const AUDIT_ACTIVITY: SectionLayout = SectionLayout {
    title: "Actividad de Hoy",
    sheet_name: "Actividad",
    columns: &[col("CONCEPTO", "Actividad de hoy", 35), col("VALOR", "Valor", 25)],
};

pub const AUDIT_CATEGORIES: SectionLayout = SectionLayout {
    title: "Productos por Categoría",
    sheet_name: "Categorías",
    columns: &[col("CATEGORIA", "Categoría", 35), col("PRODUCTOS", "Productos", 20)],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accent_hex_matches_brand_green() {
        assert_eq!(ReportTheme::comuctiva().accent.hex(), 0x1A692B);
    }

    #[test]
    fn product_columns_have_fixed_widths() {
        let widths: Vec<u16> = PRODUCTS.columns.iter().map(|c| c.width).collect();
        assert_eq!(widths, vec![25, 12, 10, 18, 40]);
    }
}
