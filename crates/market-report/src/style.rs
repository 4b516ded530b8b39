//! Report styling

/// RGB color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const BEIGE: Rgb = Rgb::new(0.961, 0.961, 0.863);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Sizes and colors for one report
///
/// Each build takes its own copy, so adjusting one report never leaks into
/// the next.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportStyle {
    /// Left and right page margins in millimetres
    pub side_margin_mm: f32,
    /// Top and bottom page margins in millimetres
    pub vertical_margin_mm: f32,
    /// Font sizes in points
    pub title_size: f32,
    pub heading_size: f32,
    pub body_size: f32,
    /// Line spacing of body text in points
    pub body_leading: f32,
    pub table_size: f32,
    pub credits_size: f32,
    /// Vertical gap between blocks in points
    pub spacer: f32,
    /// Table row height in millimetres
    pub table_row_mm: f32,
    pub table_fill: Rgb,
    pub table_border: Rgb,
    pub text_color: Rgb,
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self {
            side_margin_mm: 25.4,
            vertical_margin_mm: 25.4,
            title_size: 18.0,
            heading_size: 14.0,
            body_size: 12.0,
            body_leading: 14.0,
            table_size: 8.0,
            credits_size: 10.0,
            spacer: 12.0,
            table_row_mm: 8.0,
            table_fill: Rgb::BEIGE,
            table_border: Rgb::BLACK,
            text_color: Rgb::BLACK,
        }
    }
}

impl ReportStyle {
    /// Copy with a different body font size and leading
    pub fn with_body(mut self, size: f32, leading: f32) -> Self {
        self.body_size = size;
        self.body_leading = leading;
        self
    }
}
