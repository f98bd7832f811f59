//! Pipe table rendering.
//!
//! Columns share the content width equally. Every row is as tall as its
//! tallest wrapped cell and goes through the paginator on its own, so a long
//! table breaks between rows. Cells are top-aligned.

use super::measure::TextMeasurer;
use super::paginator::Paginator;
use super::BASELINE_RATIO;
use crate::error::Result;
use crate::theme::ThemeStyle;
use crate::writer::PaintStyle;

/// Table geometry in millimetres.
#[derive(Debug, Clone)]
pub struct TableRenderer {
    measurer: TextMeasurer,
    /// Space between cell border and text
    pub cell_padding: f32,
    /// Border stroke width
    pub border_width: f32,
    /// Space left below the table
    pub spacing_after: f32,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self {
            measurer: TextMeasurer::new(),
            cell_padding: 2.0,
            border_width: 0.2,
            spacing_after: 4.0,
        }
    }
}

/// One row ready to draw: wrapped lines per cell and the row height.
struct RowLayout {
    cells: Vec<Vec<String>>,
    height: f32,
}

impl TableRenderer {
    /// Create a renderer with default geometry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a table at the cursor and return the cursor y after it.
    pub fn render(
        &self,
        headers: &[String],
        rows: &[Vec<String>],
        theme: &ThemeStyle,
        paginator: &mut Paginator,
    ) -> Result<f32> {
        let columns = headers.len().max(1);
        let column_width = theme.content_width / columns as f32;
        let header_font = theme.body.font_name(true, false);
        let body_font = theme.body.font_name(false, false);

        let header = self.layout_row(headers, columns, column_width, header_font, theme);
        paginator.reserve(header.height);
        let top = paginator.y();
        {
            let canvas = paginator.canvas_mut();
            canvas.set_fill_color(theme.table_header_background);
            canvas.rect(theme.left_margin, top, theme.content_width, header.height, PaintStyle::Fill)?;
        }
        self.draw_row(&header, column_width, header_font, theme, paginator)?;

        for row in rows {
            let layout = self.layout_row(row, columns, column_width, body_font, theme);
            paginator.reserve(layout.height);
            self.draw_row(&layout, column_width, body_font, theme, paginator)?;
        }

        log::debug!("Rendered table: {} columns, {} rows", columns, rows.len());
        paginator.advance(self.spacing_after);
        Ok(paginator.y())
    }

    fn layout_row(
        &self,
        cells: &[String],
        columns: usize,
        column_width: f32,
        font: &str,
        theme: &ThemeStyle,
    ) -> RowLayout {
        let size = theme.body.size;
        let inner = (column_width - 2.0 * self.cell_padding).max(1.0);
        let wrapped: Vec<Vec<String>> = (0..columns)
            .map(|i| {
                let text = cells.get(i).map(String::as_str).unwrap_or("");
                self.measurer.wrap(text, font, size, inner)
            })
            .collect();
        let lines = wrapped.iter().map(Vec::len).max().unwrap_or(1).max(1);
        RowLayout {
            cells: wrapped,
            height: lines as f32 * self.measurer.line_height(size) + 2.0 * self.cell_padding,
        }
    }

    /// Borders, then text, then advance past the row.
    fn draw_row(
        &self,
        row: &RowLayout,
        column_width: f32,
        font: &str,
        theme: &ThemeStyle,
        paginator: &mut Paginator,
    ) -> Result<()> {
        let top = paginator.y();
        let line_height = self.measurer.line_height(theme.body.size);
        let canvas = paginator.canvas_mut();

        canvas.set_draw_color(theme.table_border);
        canvas.set_line_width(self.border_width);
        canvas.set_dash(&[]);
        for i in 0..row.cells.len() {
            let x = theme.left_margin + i as f32 * column_width;
            canvas.rect(x, top, column_width, row.height, PaintStyle::Stroke)?;
        }

        canvas.set_font(font, theme.body.size)?;
        canvas.set_text_color(theme.body.color);
        for (i, lines) in row.cells.iter().enumerate() {
            let x = theme.left_margin + i as f32 * column_width + self.cell_padding;
            for (j, line) in lines.iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                let baseline =
                    top + self.cell_padding + (j as f32 + BASELINE_RATIO) * line_height;
                canvas.text(line, x, baseline)?;
            }
        }

        paginator.advance(row.height);
        Ok(())
    }
}
