// src/services/pdf_layout.rs

// Peças de desenho do PDF que o genpdf não traz prontas: o modelo de página
// (faixa da marca + rodapé) e a célula com fundo colorido.

use genpdf::{
    elements, error::Error, render::Area, style::{Color, Style}, Alignment, Context, Element,
    Margins, Mm, Position, RenderResult, Size,
};
use image::{DynamicImage, RgbImage};
use std::{cell::Cell, rc::Rc};

use crate::models::theme::{ReportTheme, Rgb};

// Medidas em mm sobre uma folha A4 (210 x 297)
pub const PAGE_WIDTH: f64 = 210.0;
pub const PAGE_HEIGHT: f64 = 297.0;
pub const SIDE_MARGIN: f64 = 15.0;
pub const BAND_HEIGHT: f64 = 35.0;
pub const PAGE_TOP: f64 = 45.0;
pub const PAGE_BOTTOM: f64 = 272.0;
pub const CONTENT_START_Y: f64 = 60.0;
pub const BREAK_THRESHOLD: f64 = 240.0;
pub const TITLE_HEIGHT: f64 = 8.0;
pub const CELL_HEIGHT: f64 = 7.0;

const CELL_PADDING: f64 = 1.5;
// O traço do genpdf tem 1 pt (~0,35 mm); passos menores fecham o preenchimento
const FILL_STEP: f64 = 0.3;
// 20 mm a 300 dpi
const LOGO_PX: u32 = 236;
const LOGO_BORDER_PX: u32 = 14;

pub fn pdf_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

fn non_negative(value: Mm) -> Mm {
    if value < Mm::from(0.0) { Mm::from(0.0) } else { value }
}

/// Deslocamentos verticais dos traços que cobrem uma faixa de `height` mm,
/// distribuídos por igual e nunca mais afastados que `FILL_STEP`.
pub fn stroke_offsets(height: f64) -> Vec<f64> {
    if height <= 0.0 {
        return Vec::new();
    }
    let strokes = (height / FILL_STEP).ceil().max(1.0) as usize;
    let step = height / strokes as f64;
    (0..strokes).map(|i| (i as f64 + 0.5) * step).collect()
}

// O genpdf só desenha linhas finas: o retângulo sai de traços empilhados
fn fill_rect(area: &Area<'_>, top: Mm, width: Mm, height: f64, color: Color) {
    let style = Style::new().with_color(color);
    for offset in stroke_offsets(height) {
        let y = top + Mm::from(offset);
        area.draw_line(vec![Position::new(0.0, y), Position::new(width, y)], style);
    }
}

/// Faixa da marca no topo e rodapé com número de página, redesenhados em
/// cada página nova (inclusive as criadas pela quebra de tabelas).
pub struct BrandPageDecorator {
    theme: ReportTheme,
    copyright: String,
    logo: elements::Image,
    page: usize,
    pages: PageCounter,
}

/// Contador compartilhado com quem montou o documento: o decorador é movido
/// para dentro do `Document`, mas o número de páginas continua legível.
#[derive(Debug, Clone, Default)]
pub struct PageCounter(Rc<Cell<usize>>);

impl PageCounter {
    pub fn get(&self) -> usize {
        self.0.get()
    }
}

impl BrandPageDecorator {
    pub fn new(theme: ReportTheme, year: i32) -> Result<Self, Error> {
        let logo = elements::Image::from_dynamic_image(logo_placeholder(&theme))?
            .with_position(Position::new(SIDE_MARGIN, 8.0));

        Ok(Self {
            copyright: theme.copyright_line(year),
            theme,
            logo,
            page: 0,
            pages: PageCounter::default(),
        })
    }

    pub fn page_counter(&self) -> PageCounter {
        self.pages.clone()
    }

    fn draw_band(&mut self, context: &Context, area: &Area<'_>, style: Style) -> Result<(), Error> {
        let t = &self.theme;

        fill_rect(area, Mm::from(0.0), Mm::from(PAGE_WIDTH), BAND_HEIGHT, pdf_color(t.accent));

        self.logo.render(context, area.clone(), style)?;

        let white = pdf_color(t.white);
        area.print_str(
            &context.font_cache,
            Position::new(45.0, 10.0),
            Style::new().bold().with_font_size(22).with_color(white),
            t.brand,
        )?;
        area.print_str(
            &context.font_cache,
            Position::new(45.0, 20.5),
            Style::new().with_font_size(10).with_color(white),
            t.subtitle,
        )?;

        area.draw_line(
            vec![
                Position::new(SIDE_MARGIN, 32.0),
                Position::new(PAGE_WIDTH - SIDE_MARGIN, 32.0),
            ],
            Style::new().with_color(white),
        );
        Ok(())
    }

    fn draw_footer(&self, context: &Context, area: &Area<'_>) -> Result<(), Error> {
        let style = Style::new()
            .with_font_size(8)
            .with_color(pdf_color(self.theme.footer_text));
        let centered = |text: &str| (Mm::from(PAGE_WIDTH) - style.str_width(&context.font_cache, text)) / 2.0;

        area.print_str(
            &context.font_cache,
            Position::new(centered(&self.copyright), PAGE_HEIGHT - 18.0),
            style,
            &self.copyright,
        )?;
        area.print_str(
            &context.font_cache,
            Position::new(centered(self.theme.notice), PAGE_HEIGHT - 13.0),
            style,
            self.theme.notice,
        )?;

        let page = format!("Página {}", self.page);
        let right = Mm::from(PAGE_WIDTH - SIDE_MARGIN) - style.str_width(&context.font_cache, &page);
        area.print_str(&context.font_cache, Position::new(right, PAGE_HEIGHT - 13.0), style, &page)?;
        Ok(())
    }
}

impl genpdf::PageDecorator for BrandPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &Context,
        mut area: Area<'a>,
        style: Style,
    ) -> Result<Area<'a>, Error> {
        self.page += 1;
        self.pages.0.set(self.page);

        self.draw_band(context, &area, style)?;
        self.draw_footer(context, &area)?;

        area.add_margins(Margins::trbl(
            PAGE_TOP,
            SIDE_MARGIN,
            PAGE_HEIGHT - PAGE_BOTTOM,
            SIDE_MARGIN,
        ));
        Ok(area)
    }
}

// Quadrado branco com moldura na cor da marca
fn logo_placeholder(theme: &ReportTheme) -> DynamicImage {
    let Rgb(ar, ag, ab) = theme.accent;
    let image = RgbImage::from_fn(LOGO_PX, LOGO_PX, |x, y| {
        let edge = x < LOGO_BORDER_PX
            || y < LOGO_BORDER_PX
            || x >= LOGO_PX - LOGO_BORDER_PX
            || y >= LOGO_PX - LOGO_BORDER_PX;
        if edge {
            image::Rgb([ar, ag, ab])
        } else {
            image::Rgb([255, 255, 255])
        }
    });
    DynamicImage::ImageRgb8(image)
}

/// Célula de tabela com altura fixa, fundo opcional e bordas finas opcionais.
/// O texto ocupa uma linha e é cortado na largura da coluna.
pub struct ShadedCell {
    text: String,
    style: Style,
    fill: Option<Color>,
    border: Option<Color>,
    alignment: Alignment,
}

impl ShadedCell {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
            fill: None,
            border: None,
            alignment: Alignment::Left,
        }
    }

    pub fn with_fill(mut self, fill: Option<Color>) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_border(mut self, border: Option<Color>) -> Self {
        self.border = border;
        self
    }

    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }
}

impl Element for ShadedCell {
    fn render(&mut self, context: &Context, area: Area<'_>, style: Style) -> Result<RenderResult, Error> {
        let mut result = RenderResult::default();
        let width = area.size().width;
        let height = Mm::from(CELL_HEIGHT);

        // Sem espaço para a linha inteira: continua na próxima página
        if area.size().height < height {
            result.has_more = true;
            return Ok(result);
        }

        if let Some(fill) = self.fill {
            fill_rect(&area, Mm::from(0.0), width, CELL_HEIGHT, fill);
        }

        if let Some(border) = self.border {
            let line = Style::new().with_color(border);
            let corners = vec![
                Position::new(0.0, 0.0),
                Position::new(width, 0.0),
                Position::new(width, CELL_HEIGHT),
                Position::new(0.0, CELL_HEIGHT),
                Position::new(0.0, 0.0),
            ];
            area.draw_line(corners, line);
        }

        let mut cell_style = style;
        cell_style.merge(self.style);

        let padding = Mm::from(CELL_PADDING);
        let room = width - padding * 2.0;
        let text = fit_width(&self.text, room, |s| cell_style.str_width(&context.font_cache, s));
        let text_width = cell_style.str_width(&context.font_cache, &text);
        let x = match self.alignment {
            Alignment::Left => padding,
            Alignment::Center => (width - text_width) / 2.0,
            Alignment::Right => width - padding - text_width,
        };
        let y = (height - cell_style.line_height(&context.font_cache)) / 2.0;

        area.print_str(
            &context.font_cache,
            Position::new(non_negative(x), non_negative(y)),
            cell_style,
            &text,
        )?;

        result.size = Size::new(width, height);
        Ok(result)
    }
}

/// Corta `text` (com reticências) até caber em `room` mm segundo `measure`.
pub fn fit_width<T: PartialOrd>(text: &str, room: T, measure: impl Fn(&str) -> T) -> String {
    if measure(text) <= room {
        return text.to_string();
    }

    let mut chars: Vec<char> = text.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let candidate = format!("{}...", chars.iter().collect::<String>());
        if measure(&candidate) <= room {
            return candidate;
        }
    }
    String::new()
}

/// Estimativa da posição vertical, usada para decidir quebras de página
/// antes de uma seção, de modo que o título nunca fique separado da tabela.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutCursor {
    y: f64,
    gap: f64,
}

impl LayoutCursor {
    pub fn new(gap: f64) -> Self {
        Self { y: CONTENT_START_Y, gap }
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// `true` quando a seção precisa começar numa página nova.
    pub fn begin_section(&mut self) -> bool {
        if self.y > BREAK_THRESHOLD {
            self.y = PAGE_TOP;
            true
        } else {
            false
        }
    }

    /// Avança o título, o cabeçalho e as linhas de uma tabela, e o espaço depois dela.
    pub fn advance_table(&mut self, rows: usize) {
        self.y += TITLE_HEIGHT;
        for _ in 0..=rows {
            if self.y + CELL_HEIGHT > PAGE_BOTTOM {
                self.y = PAGE_TOP;
            }
            self.y += CELL_HEIGHT;
        }
        self.y += self.gap;
    }
}
