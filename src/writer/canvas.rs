//! Millimetre drawing surface over [`PdfWriter`].
//!
//! Coordinates are in millimetres with the origin at the top-left corner of
//! the page and y growing downwards; text is placed by its baseline. The
//! canvas converts to PDF user space (points, bottom-left origin) when it
//! emits content stream operators.

use super::content_stream::{ContentStreamBuilder, ContentStreamOp};
use super::font_manager::FontManager;
use super::pdf_writer::{PdfWriter, PdfWriterConfig};
use crate::color::Color;
use crate::error::{Error, Result};

/// Points per millimetre.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// How a closed shape is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintStyle {
    /// Fill with the fill color
    Fill,
    /// Stroke with the draw color
    Stroke,
    /// Fill, then stroke
    FillStroke,
}

/// A piece of text shown on a page, with the Base-14 font it was set in.
#[derive(Debug, Clone, PartialEq)]
pub struct ShownText {
    /// Base font name (e.g. "Courier")
    pub font: String,
    /// Font size in points
    pub size: f32,
    /// Text as passed to the canvas
    pub text: String,
}

/// Page-oriented drawing surface with a current font, colors and line width.
#[derive(Debug, Clone)]
pub struct PdfCanvas {
    writer: PdfWriter,
    fonts: FontManager,
    width_mm: f32,
    height_mm: f32,
    /// Zero-based index of the page being drawn on
    current: usize,
    font_name: &'static str,
    font_size: f32,
    text_color: Color,
    fill_color: Color,
    draw_color: Color,
    line_width_mm: f32,
    dash: Vec<f32>,
}

impl PdfCanvas {
    /// Create a canvas with one empty page of the given size in millimetres.
    pub fn new(width_mm: f32, height_mm: f32, config: PdfWriterConfig) -> Result<Self> {
        if !(width_mm.is_finite() && height_mm.is_finite()) || width_mm <= 0.0 || height_mm <= 0.0
        {
            return Err(Error::Layout(format!("invalid page size {}x{} mm", width_mm, height_mm)));
        }

        let mut writer = PdfWriter::with_config(config);
        writer.add_page(width_mm * PT_PER_MM, height_mm * PT_PER_MM);

        Ok(Self {
            writer,
            fonts: FontManager::new(),
            width_mm,
            height_mm,
            current: 0,
            font_name: "Helvetica",
            font_size: 12.0,
            text_color: Color::black(),
            fill_color: Color::white(),
            draw_color: Color::black(),
            line_width_mm: 0.2,
            dash: Vec::new(),
        })
    }

    /// Append a page and make it current. Returns its 1-based number.
    pub fn add_page(&mut self) -> usize {
        self.current = self
            .writer
            .add_page(self.width_mm * PT_PER_MM, self.height_mm * PT_PER_MM);
        self.current + 1
    }

    /// Make an existing page current (1-based).
    pub fn set_page(&mut self, number: usize) -> Result<()> {
        if number == 0 || number > self.writer.page_count() {
            return Err(Error::Layout(format!(
                "page {} out of range 1..={}",
                number,
                self.writer.page_count()
            )));
        }
        self.current = number - 1;
        Ok(())
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.writer.page_count()
    }

    /// 1-based number of the current page.
    pub fn current_page(&self) -> usize {
        self.current + 1
    }

    /// Page width in millimetres.
    pub fn page_width(&self) -> f32 {
        self.width_mm
    }

    /// Page height in millimetres.
    pub fn page_height(&self) -> f32 {
        self.height_mm
    }

    /// Set the current font by Base-14 name and size in points.
    pub fn set_font(&mut self, name: &str, size: f32) -> Result<()> {
        let font = self
            .fonts
            .get_font(name)
            .ok_or_else(|| Error::Font(format!("'{}' is not a Base-14 text font", name)))?;
        if !size.is_finite() || size <= 0.0 {
            return Err(Error::Font(format!("invalid font size {} for {}", size, name)));
        }
        self.font_name = font.name;
        self.font_size = size;
        Ok(())
    }

    /// Current font name.
    pub fn font_name(&self) -> &str {
        self.font_name
    }

    /// Current font size in points.
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Set the color used for text.
    pub fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
    }

    /// Set the color used to fill shapes.
    pub fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    /// Set the color used to stroke lines and borders.
    pub fn set_draw_color(&mut self, color: Color) {
        self.draw_color = color;
    }

    /// Set the stroke width in millimetres.
    pub fn set_line_width(&mut self, width_mm: f32) {
        self.line_width_mm = width_mm;
    }

    /// Set a dash pattern in millimetres; empty for solid lines.
    pub fn set_dash(&mut self, pattern: &[f32]) {
        self.dash = pattern.to_vec();
    }

    /// Width of text in the current font, in millimetres.
    pub fn text_width(&self, text: &str) -> f32 {
        self.fonts.text_width(text, self.font_name, self.font_size) / PT_PER_MM
    }

    /// Font metrics used by the canvas.
    pub fn font_manager(&self) -> &FontManager {
        &self.fonts
    }

    /// Draw text with its baseline starting at (x, y).
    pub fn text(&mut self, text: &str, x: f32, y: f32) -> Result<()> {
        check_finite(&[x, y])?;
        let resource = self.writer.font_resource(self.font_name);
        let (size, color) = (self.font_size, self.text_color);
        let (px, py) = (x * PT_PER_MM, (self.height_mm - y) * PT_PER_MM);
        let page = self.page()?;
        page.begin_text()
            .fill_color(color)
            .set_font(&resource, size)
            .text(text, px, py);
        Ok(())
    }

    /// Draw a rectangle whose top-left corner is at (x, y).
    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, style: PaintStyle) -> Result<()> {
        check_finite(&[x, y, w, h])?;
        let (px, py) = (x * PT_PER_MM, (self.height_mm - y - h) * PT_PER_MM);
        self.begin_path(style)?
            .rect(px, py, w * PT_PER_MM, h * PT_PER_MM);
        self.paint(style)
    }

    /// Draw a rectangle with rounded corners whose top-left corner is at (x, y).
    pub fn rounded_rect(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        radius: f32,
        style: PaintStyle,
    ) -> Result<()> {
        check_finite(&[x, y, w, h, radius])?;
        let (px, py) = (x * PT_PER_MM, (self.height_mm - y - h) * PT_PER_MM);
        self.begin_path(style)?.rounded_rect(
            px,
            py,
            w * PT_PER_MM,
            h * PT_PER_MM,
            radius * PT_PER_MM,
        );
        self.paint(style)
    }

    /// Draw a straight line.
    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Result<()> {
        check_finite(&[x1, y1, x2, y2])?;
        let height = self.height_mm;
        self.begin_path(PaintStyle::Stroke)?
            .move_to(x1 * PT_PER_MM, (height - y1) * PT_PER_MM)
            .line_to(x2 * PT_PER_MM, (height - y2) * PT_PER_MM);
        self.paint(PaintStyle::Stroke)
    }

    /// Operations recorded on a page (1-based).
    pub fn page_ops(&self, number: usize) -> &[ContentStreamOp] {
        number
            .checked_sub(1)
            .and_then(|i| self.writer.page_content(i))
            .map(|content| content.operations())
            .unwrap_or(&[])
    }

    /// Text shown on a page (1-based), in drawing order.
    pub fn shown_text(&self, number: usize) -> Vec<ShownText> {
        let mut font = String::new();
        let mut size = 0.0;
        let mut shown = Vec::new();
        for op in self.page_ops(number) {
            match op {
                ContentStreamOp::SetFont(resource, s) => {
                    font = self.writer.base_font(resource).unwrap_or(resource.as_str()).to_string();
                    size = *s;
                },
                ContentStreamOp::ShowText(text) => shown.push(ShownText {
                    font: font.clone(),
                    size,
                    text: text.clone(),
                }),
                _ => {},
            }
        }
        shown
    }

    /// Serialize all pages into PDF bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        self.writer.finish()
    }

    fn page(&mut self) -> Result<&mut ContentStreamBuilder> {
        let current = self.current;
        self.writer
            .page_content_mut(current)
            .ok_or_else(|| Error::Layout(format!("no page at index {}", current)))
    }

    /// Close any open text object and set the paint state for a path.
    fn begin_path(&mut self, style: PaintStyle) -> Result<&mut ContentStreamBuilder> {
        let (fill, draw) = (self.fill_color, self.draw_color);
        let width = self.line_width_mm * PT_PER_MM;
        let dash: Vec<f32> = self.dash.iter().map(|d| d * PT_PER_MM).collect();
        let page = self.page()?;
        page.end_text();
        if style != PaintStyle::Stroke {
            page.fill_color(fill);
        }
        if style != PaintStyle::Fill {
            page.stroke_color(draw).line_width(width).dash(dash);
        }
        Ok(page)
    }

    fn paint(&mut self, style: PaintStyle) -> Result<()> {
        let page = self.page()?;
        match style {
            PaintStyle::Fill => page.fill(),
            PaintStyle::Stroke => page.stroke(),
            PaintStyle::FillStroke => page.fill_stroke(),
        };
        Ok(())
    }
}

fn check_finite(values: &[f32]) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(Error::Layout(format!("non-finite coordinate in {:?}", values)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a4() -> PdfCanvas {
        PdfCanvas::new(210.0, 297.0, PdfWriterConfig::default()).unwrap()
    }

    #[test]
    fn test_rejects_bad_page_size() {
        assert!(matches!(
            PdfCanvas::new(0.0, 297.0, PdfWriterConfig::default()),
            Err(Error::Layout(_))
        ));
        assert!(PdfCanvas::new(f32::NAN, 297.0, PdfWriterConfig::default()).is_err());
    }

    #[test]
    fn test_unknown_font_is_an_error() {
        let mut canvas = a4();
        assert!(matches!(canvas.set_font("Papyrus", 12.0), Err(Error::Font(_))));
        assert!(canvas.set_font("Times-Bold", 12.0).is_ok());
        assert_eq!(canvas.font_name(), "Times-Bold");
    }

    #[test]
    fn test_text_is_flipped_to_pdf_space() {
        let mut canvas = a4();
        canvas.text("top", 10.0, 20.0).unwrap();
        let tm = canvas
            .page_ops(1)
            .iter()
            .find_map(|op| match op {
                ContentStreamOp::TextPosition(x, y) => Some((*x, *y)),
                _ => None,
            })
            .unwrap();
        assert!((tm.0 - 28.346_457).abs() < 1e-3);
        assert!((tm.1 - (297.0 - 20.0) * PT_PER_MM).abs() < 1e-3);
    }

    #[test]
    fn test_rect_closes_text_object() {
        let mut canvas = a4();
        canvas.text("before", 10.0, 10.0).unwrap();
        canvas.rect(10.0, 20.0, 50.0, 10.0, PaintStyle::Fill).unwrap();
        let ops = canvas.page_ops(1);
        let et = ops.iter().position(|op| *op == ContentStreamOp::EndText).unwrap();
        let re = ops
            .iter()
            .position(|op| matches!(op, ContentStreamOp::Rectangle(..)))
            .unwrap();
        assert!(et < re);
    }

    #[test]
    fn test_pages_and_shown_text() {
        let mut canvas = a4();
        canvas.set_font("Courier", 9.0).unwrap();
        canvas.text("first", 10.0, 10.0).unwrap();
        assert_eq!(canvas.add_page(), 2);
        canvas.text("second", 10.0, 10.0).unwrap();
        canvas.set_page(1).unwrap();
        canvas.text("footer", 10.0, 290.0).unwrap();

        let first: Vec<_> = canvas.shown_text(1).into_iter().map(|t| t.text).collect();
        assert_eq!(first, vec!["first", "footer"]);
        let second = canvas.shown_text(2);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].font, "Courier");
        assert_eq!(second[0].size, 9.0);
        assert!(canvas.set_page(3).is_err());
    }

    #[test]
    fn test_non_finite_geometry_is_an_error() {
        let mut canvas = a4();
        assert!(matches!(
            canvas.line(0.0, 0.0, f32::INFINITY, 1.0),
            Err(Error::Layout(_))
        ));
    }

    #[test]
    fn test_text_width_in_mm() {
        let mut canvas = a4();
        canvas.set_font("Courier", 10.0).unwrap();
        // 10 chars * 6pt = 60pt
        assert!((canvas.text_width("0123456789") - 60.0 / PT_PER_MM).abs() < 1e-4);
    }

    #[test]
    fn test_finish_produces_pdf() {
        let mut canvas = a4();
        canvas.text("Hello", 20.0, 20.0).unwrap();
        canvas.add_page();
        let bytes = canvas.finish().unwrap();
        let content = String::from_utf8_lossy(&bytes);
        assert!(content.starts_with("%PDF-"));
        assert!(content.contains("/Count 2"));
    }
}
