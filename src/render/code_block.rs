//! Fenced code block rendering.
//!
//! A code block is a filled, bordered container holding Courier rows. Each
//! row (a source line, or a piece of one when it is wider than the container)
//! is reserved separately, so long listings flow across pages. When a row
//! starts a new page the part already drawn is closed with its border and a
//! fresh background segment opens on the new page.

use super::measure::TextMeasurer;
use super::paginator::Paginator;
use super::BASELINE_RATIO;
use crate::error::Result;
use crate::theme::ThemeStyle;
use crate::writer::PaintStyle;

const CODE_FONT: &str = "Courier";
const LABEL_FONT: &str = "Helvetica-Bold";

/// Code block geometry in millimetres, font sizes in points.
#[derive(Debug, Clone)]
pub struct CodeBlockRenderer {
    measurer: TextMeasurer,
    /// Code font size
    pub font_size: f32,
    /// Inner padding on every side
    pub padding: f32,
    /// Top padding of a continuation segment
    pub continuation_padding: f32,
    /// Space left below the block
    pub spacing_after: f32,
    /// Language chip font size
    pub label_size: f32,
    /// Border stroke width
    pub border_width: f32,
}

impl Default for CodeBlockRenderer {
    fn default() -> Self {
        Self {
            measurer: TextMeasurer::new(),
            font_size: 9.0,
            padding: 4.0,
            continuation_padding: 2.0,
            spacing_after: 4.0,
            label_size: 7.0,
            border_width: 0.3,
        }
    }
}

/// Whether a language tag gets a chip.
fn shows_label(language: &str) -> bool {
    let language = language.trim();
    !language.is_empty() && !language.eq_ignore_ascii_case("text")
}

impl CodeBlockRenderer {
    /// Create a renderer with default geometry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows drawn for `content` at the given container width.
    pub fn rows(&self, content: &str, width: f32) -> Vec<String> {
        let inner = (width - 2.0 * self.padding).max(1.0);
        content
            .split('\n')
            .flat_map(|line| {
                self.measurer
                    .wrap_preformatted(line, CODE_FONT, self.font_size, inner)
            })
            .collect()
    }

    fn label_height(&self) -> f32 {
        self.measurer.line_height(self.label_size) + 1.5
    }

    /// Draw a code block at the cursor.
    pub fn render(
        &self,
        language: &str,
        content: &str,
        theme: &ThemeStyle,
        paginator: &mut Paginator,
    ) -> Result<()> {
        let x = theme.left_margin;
        let width = theme.content_width;
        let line_height = self.measurer.line_height(self.font_size);
        let rows = self.rows(content, width);
        let labelled = shows_label(language);
        let top_padding = if labelled {
            self.padding + self.label_height()
        } else {
            self.padding
        };

        // The opening band and the first row stay together.
        paginator.reserve(top_padding + line_height);
        let mut segment_top = paginator.y();
        self.fill_band(paginator, theme, top_padding)?;
        if labelled {
            self.draw_label(paginator, theme, language.trim(), segment_top)?;
        }
        paginator.advance(top_padding);

        for row in &rows {
            if paginator.needs_break(line_height) {
                self.stroke_segment(paginator, theme, segment_top)?;
            }
            if paginator.reserve(line_height) {
                segment_top = paginator.y();
                self.fill_band(paginator, theme, self.continuation_padding)?;
                paginator.advance(self.continuation_padding);
            }

            self.fill_band(paginator, theme, line_height)?;
            if !row.is_empty() {
                let baseline = paginator.y() + BASELINE_RATIO * line_height;
                let canvas = paginator.canvas_mut();
                canvas.set_font(CODE_FONT, self.font_size)?;
                canvas.set_text_color(theme.code_text);
                canvas.text(row, x + self.padding, baseline)?;
            }
            paginator.advance(line_height);
        }

        if paginator.fits(self.padding) {
            self.fill_band(paginator, theme, self.padding)?;
            paginator.advance(self.padding);
        }
        self.stroke_segment(paginator, theme, segment_top)?;
        paginator.advance(self.spacing_after);

        log::debug!(
            "Rendered code block ({}): {} rows",
            if language.is_empty() { "plain" } else { language },
            rows.len()
        );
        Ok(())
    }

    /// Background strip of `height` at the cursor.
    fn fill_band(&self, paginator: &mut Paginator, theme: &ThemeStyle, height: f32) -> Result<()> {
        let y = paginator.y();
        let canvas = paginator.canvas_mut();
        canvas.set_fill_color(theme.code_background);
        canvas.rect(theme.left_margin, y, theme.content_width, height, PaintStyle::Fill)
    }

    /// Border around the segment from `top` down to the cursor.
    fn stroke_segment(&self, paginator: &mut Paginator, theme: &ThemeStyle, top: f32) -> Result<()> {
        let height = paginator.y() - top;
        if height <= 0.0 {
            return Ok(());
        }
        let canvas = paginator.canvas_mut();
        canvas.set_draw_color(theme.code_border);
        canvas.set_line_width(self.border_width);
        canvas.set_dash(&[]);
        canvas.rect(theme.left_margin, top, theme.content_width, height, PaintStyle::Stroke)
    }

    /// Language chip in the top-right corner of the container.
    fn draw_label(
        &self,
        paginator: &mut Paginator,
        theme: &ThemeStyle,
        language: &str,
        top: f32,
    ) -> Result<()> {
        let text_width = self.measurer.width(language, LABEL_FONT, self.label_size);
        let height = self.label_height();
        let width = text_width + 4.0;
        let x = theme.left_margin + theme.content_width - width - 2.0;
        let y = top + 2.0;

        let canvas = paginator.canvas_mut();
        canvas.set_fill_color(theme.code_label_background);
        canvas.rounded_rect(x, y, width, height, 1.2, PaintStyle::Fill)?;
        canvas.set_font(LABEL_FONT, self.label_size)?;
        canvas.set_text_color(theme.code_label_text);
        let baseline = y + 0.75 + BASELINE_RATIO * self.measurer.line_height(self.label_size);
        canvas.text(language, x + 2.0, baseline)
    }
}
