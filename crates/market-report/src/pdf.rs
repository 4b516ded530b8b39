//! PDF layout of the summary report
//!
//! The document is a single flowing column: title, overview paragraph,
//! metrics grid, charts, and credits. Blocks that do not fit on the current
//! page start a new one.

use crate::input::ReportInput;
use crate::metrics::{TABLE_COLUMNS, metric_rows};
use crate::style::{ReportStyle, Rgb};
use market_core::{MarketError, Result};
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Rect,
};
use std::fmt::Display;
use std::io::BufWriter;
use std::path::Path;
use tracing::debug;

/// Closing line of every report
pub const CREDITS: &str = "Report generated by Financial Market Analyzer \
    (https://github.com/KenImade/financial-market-analyser) by Kenneth Imade";

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const PT_TO_MM: f32 = 25.4 / 72.0;
/// Average Helvetica glyph width as a fraction of the font size
const AVG_CHAR_EM: f32 = 0.5;
/// Resolution charts are rendered at
const IMAGE_DPI: f32 = 300.0;

fn render_error(e: impl Display) -> MarketError {
    MarketError::Render(e.to_string())
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(rgb.r, rgb.g, rgb.b, None))
}

/// Approximate rendered width of `text` in millimetres
pub fn text_width_mm(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_CHAR_EM * PT_TO_MM
}

/// Greedy word wrap to at most `max_chars` per line
///
/// Words longer than a line are placed on their own line unbroken.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };

        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

#[derive(Clone, Copy)]
enum Align {
    Left,
    Center,
}

/// Cursor over the flowing column, adding pages as needed
struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    style: &'a ReportStyle,
    fonts: &'a Fonts,
    /// Top of the free space, in millimetres from the page bottom
    y: f32,
    pages: usize,
}

impl<'a> PageWriter<'a> {
    fn new(
        doc: &'a PdfDocumentReference,
        layer: PdfLayerReference,
        style: &'a ReportStyle,
        fonts: &'a Fonts,
    ) -> Self {
        Self {
            doc,
            layer,
            style,
            fonts,
            y: PAGE_HEIGHT_MM - style.vertical_margin_mm,
            pages: 1,
        }
    }

    fn left(&self) -> f32 {
        self.style.side_margin_mm
    }

    fn content_width(&self) -> f32 {
        PAGE_WIDTH_MM - 2.0 * self.style.side_margin_mm
    }

    fn reserve(&mut self, height_mm: f32) {
        if self.y - height_mm < self.style.vertical_margin_mm
            && self.y < PAGE_HEIGHT_MM - self.style.vertical_margin_mm
        {
            let (page, layer) =
                self.doc
                    .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), format!("Layer {}", self.pages + 1));
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - self.style.vertical_margin_mm;
            self.pages += 1;
        }
    }

    fn space(&mut self, points: f32) {
        self.y -= points * PT_TO_MM;
    }

    fn text_line(&mut self, text: &str, size: f32, leading: f32, bold: bool, align: Align) {
        let height = leading * PT_TO_MM;
        self.reserve(height);
        self.y -= height;

        let x = match align {
            Align::Left => self.left(),
            Align::Center => {
                self.left() + ((self.content_width() - text_width_mm(text, size)) / 2.0).max(0.0)
            }
        };
        let font = if bold { &self.fonts.bold } else { &self.fonts.regular };

        self.layer.set_fill_color(color(self.style.text_color));
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    fn paragraph(&mut self, text: &str, size: f32, leading: f32, bold: bool, align: Align) {
        let max_chars = (self.content_width() / (size * AVG_CHAR_EM * PT_TO_MM)).floor() as usize;
        for line in wrap_text(text, max_chars.max(1)) {
            self.text_line(&line, size, leading, bold, align);
        }
    }

    fn table(&mut self, rows: &[Vec<String>]) {
        let size = self.style.table_size;
        let row_height = self.style.table_row_mm;
        let cell_width = self.content_width() / TABLE_COLUMNS as f32;

        for row in rows {
            self.reserve(row_height);
            self.y -= row_height;

            for col in 0..TABLE_COLUMNS {
                let x0 = self.left() + col as f32 * cell_width;
                self.layer.set_fill_color(color(self.style.table_fill));
                self.layer.set_outline_color(color(self.style.table_border));
                self.layer.set_outline_thickness(0.75);
                self.layer.add_rect(
                    Rect::new(Mm(x0), Mm(self.y), Mm(x0 + cell_width), Mm(self.y + row_height))
                        .with_mode(PaintMode::FillStroke),
                );

                if let Some(text) = row.get(col) {
                    let x = x0 + ((cell_width - text_width_mm(text, size)) / 2.0).max(0.5);
                    let baseline = self.y + (row_height - size * 0.7 * PT_TO_MM) / 2.0;
                    self.layer.set_fill_color(color(self.style.text_color));
                    self.layer
                        .use_text(text.as_str(), size, Mm(x), Mm(baseline), &self.fonts.regular);
                }
            }
        }
    }

    fn image(&mut self, path: &Path) -> Result<()> {
        let decoded = image::open(path).map_err(render_error)?;
        let natural_width_mm = decoded.width() as f32 / IMAGE_DPI * 25.4;
        let natural_height_mm = decoded.height() as f32 / IMAGE_DPI * 25.4;
        let scale = (self.content_width() / natural_width_mm).min(1.0);
        let height = natural_height_mm * scale;

        self.reserve(height);
        self.y -= height;

        Image::from_dynamic_image(&decoded).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(self.left())),
                translate_y: Some(Mm(self.y)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );
        debug!(path = %path.display(), "Embedded chart");
        Ok(())
    }
}

/// Lay out the report and return the encoded PDF
///
/// Chart paths that do not exist are skipped. Nothing touches the file system
/// apart from reading the charts.
pub fn render_pdf(input: &ReportInput, charts: &[&Path], style: &ReportStyle) -> Result<Vec<u8>> {
    let overview = input.overview();
    let name = overview.require("Name")?;
    let description = overview.require("Description")?;
    let rows = metric_rows(overview)?;

    let title = format!("Stock Analysis Report for {name}");
    let (doc, page, layer) =
        PdfDocument::new(&title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(render_error)?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(render_error)?,
    };

    let mut writer = PageWriter::new(&doc, doc.get_page(page).get_layer(layer), style, &fonts);

    writer.paragraph(&title, style.title_size, style.title_size * 1.2, true, Align::Center);
    writer.space(style.spacer);

    writer.text_line("Company Overview", style.heading_size, style.heading_size * 1.2, true, Align::Left);
    writer.space(style.spacer);
    writer.paragraph(description, style.body_size, style.body_leading, false, Align::Left);
    writer.space(style.spacer);

    writer.text_line("Metrics", style.heading_size, style.heading_size * 1.2, true, Align::Left);
    writer.space(style.spacer);
    writer.table(&rows);
    writer.space(style.spacer);

    for chart in charts.iter().filter(|p| p.exists()) {
        writer.image(chart)?;
    }
    writer.space(style.spacer);

    writer.paragraph(CREDITS, style.credits_size, style.credits_size * 1.2, false, Align::Left);
    debug!(pages = writer.pages, "Laid out report");
    drop(writer);

    let mut buffer = BufWriter::new(Vec::new());
    doc.save(&mut buffer).map_err(render_error)?;
    buffer.into_inner().map_err(render_error)
}
