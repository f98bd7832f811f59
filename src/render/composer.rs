//! Note to PDF composition.
//!
//! The composer draws the header block (ornament, title and dates), walks the
//! content line by line dispatching each line to the matching renderer, adds
//! page footers and serializes the canvas.
//!
//! Line precedence in markdown mode:
//!
//! 1. placeholder of an extracted code block or table
//! 2. line containing a backtick (inline code)
//! 3. `---` rule
//! 4. `# `, `## `, `### ` headings
//! 5. `* ` bullets
//! 6. empty line
//! 7. paragraph with `**bold**` and `*italic*` runs

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::code_block::CodeBlockRenderer;
use super::extract::{extract, ExtractedBlock, Extraction};
use super::inline::{format_runs, split_inline_code};
use super::measure::{PlacedRun, TextMeasurer};
use super::paginator::Paginator;
use super::table::TableRenderer;
use super::BASELINE_RATIO;
use crate::color::Color;
use crate::config::ExportConfig;
use crate::emoji::replace_emojis;
use crate::error::{Error, Result};
use crate::note::Note;
use crate::theme::{FontStyle, HeaderOrnament, ThemeId, ThemeStyle};
use crate::writer::{PaintStyle, PdfCanvas, PdfWriterConfig};

const BULLET: &str = "\u{2022}";
const BULLET_INDENT: f32 = 6.0;
const INLINE_CODE_FONT: &str = "Courier";
const FOOTER_FONT: &str = "Helvetica";
const FOOTER_SIZE: f32 = 8.0;
const FOOTER_COLOR: Color = Color::rgb8(140, 140, 140);
const INLINE_CODE_BACKGROUND: Color = Color::rgb8(238, 238, 238);
const MAX_FILENAME_LEN: usize = 50;

/// A finished export.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    /// Suggested file name, e.g. `hello_world_classic_markdown.pdf`
    pub filename: String,
    /// PDF bytes
    pub bytes: Vec<u8>,
    /// Number of pages
    pub page_count: usize,
}

impl ExportedDocument {
    /// Write the document into `dir` under its file name.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        log::debug!("Wrote {} bytes to {}", self.bytes.len(), path.display());
        Ok(path)
    }
}

/// Export a note with the default configuration.
pub fn export_note(note: &Note, theme_id: &str, use_markdown: bool) -> Result<ExportedDocument> {
    DocumentComposer::new().export_note(note, ThemeId::parse(theme_id), use_markdown)
}

/// File-system safe stem derived from a note title.
///
/// Keeps ASCII letters, digits and whitespace, turns whitespace runs into
/// `_`, lowercases and truncates. An empty result becomes `note`.
pub fn sanitize_filename(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    let stem: String = kept
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_ascii_lowercase()
        .chars()
        .take(MAX_FILENAME_LEN)
        .collect();
    if stem.is_empty() {
        "note".to_string()
    } else {
        stem
    }
}

fn filename(title: &str, theme: ThemeId, use_markdown: bool) -> String {
    format!(
        "{}_{}{}.pdf",
        sanitize_filename(title),
        theme.as_str(),
        if use_markdown { "_markdown" } else { "" }
    )
}

fn format_date(date: DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Lays out notes on a [`PdfCanvas`].
#[derive(Debug, Clone, Default)]
pub struct DocumentComposer {
    config: ExportConfig,
    measurer: TextMeasurer,
    code_blocks: CodeBlockRenderer,
    tables: TableRenderer,
}

impl DocumentComposer {
    /// Composer with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Composer with a custom configuration.
    pub fn with_config(config: ExportConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Export configuration in use.
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Render and serialize a note.
    pub fn export_note(
        &self,
        note: &Note,
        theme: ThemeId,
        use_markdown: bool,
    ) -> Result<ExportedDocument> {
        let canvas = self.compose(note, theme, use_markdown)?;
        let page_count = canvas.page_count();
        let bytes = canvas.finish()?;
        let filename = filename(&note.title, theme, use_markdown);

        log::info!(
            "Exported '{}' with theme {}: {} pages, {} bytes",
            filename,
            theme,
            page_count,
            bytes.len()
        );
        Ok(ExportedDocument {
            filename,
            bytes,
            page_count,
        })
    }

    /// Lay out a note without serializing it.
    pub fn compose(&self, note: &Note, theme: ThemeId, use_markdown: bool) -> Result<PdfCanvas> {
        let style = ThemeStyle::for_theme(theme);
        let (width, height) = self.config.page_size.dimensions_mm();
        let right_edge = style.left_margin + style.content_width;
        if width < right_edge {
            return Err(Error::Layout(format!(
                "{} mm page is narrower than the {} theme's {} mm text column",
                width,
                theme.as_str(),
                right_edge
            )));
        }

        let mut writer_config = PdfWriterConfig::default()
            .with_compress(self.config.compress)
            .with_creation_date(note.created_at)
            .with_creator(self.config.creator.clone());
        if !note.title.is_empty() {
            writer_config = writer_config.with_title(note.title.clone());
        }

        let canvas = PdfCanvas::new(width, height, writer_config)?;
        let mut paginator =
            Paginator::new(canvas, self.config.top_margin, self.config.bottom_margin)?;

        self.draw_header(note, style, &mut paginator)?;

        let content = replace_emojis(&note.content);
        if use_markdown {
            let extraction = extract(&content);
            self.draw_markdown(&extraction, style, &mut paginator)?;
        } else {
            self.draw_plain(&content, style, &mut paginator)?;
        }

        let mut canvas = paginator.into_canvas();
        if self.config.page_numbers {
            self.draw_footers(&mut canvas)?;
        }
        Ok(canvas)
    }

    fn draw_header(&self, note: &Note, style: &ThemeStyle, p: &mut Paginator) -> Result<()> {
        let page_width = p.canvas().page_width();
        let top_margin = p.layout().top_margin;

        match style.ornament {
            HeaderOrnament::TopBand => {
                let canvas = p.canvas_mut();
                canvas.set_fill_color(style.accent);
                canvas.rect(0.0, 0.0, page_width, 6.0, PaintStyle::Fill)?;
            },
            HeaderOrnament::HeaderBar => {
                let bar = (top_margin - 6.0).max(4.0);
                let canvas = p.canvas_mut();
                canvas.set_fill_color(style.table_header_background);
                canvas.rect(0.0, 0.0, page_width, bar, PaintStyle::Fill)?;
                canvas.set_fill_color(style.accent);
                canvas.rect(0.0, bar, page_width, 1.5, PaintStyle::Fill)?;
            },
            HeaderOrnament::DoubleRule | HeaderOrnament::ThinLine => {},
        }

        if !note.title.trim().is_empty() {
            self.draw_wrapped(&note.title, &style.title, style, p)?;
            p.advance(2.0);
        }

        let mut dates = vec![format!("Created {}", format_date(note.created_at))];
        if let Some(updated) = note.modified_at() {
            dates.push(format!("Updated {}", format_date(updated)));
        }
        if style.badge_dates {
            self.draw_date_badges(&dates, style, p)?;
        } else {
            self.draw_wrapped(&dates.join("  \u{b7}  "), &style.subtitle, style, p)?;
        }

        let x1 = style.left_margin;
        let x2 = style.left_margin + style.content_width;
        match style.ornament {
            HeaderOrnament::DoubleRule => {
                p.reserve(4.0);
                let y = p.y() + 2.0;
                let canvas = p.canvas_mut();
                canvas.set_draw_color(style.accent);
                canvas.set_dash(&[]);
                canvas.set_line_width(0.6);
                canvas.line(x1, y, x2, y)?;
                canvas.set_line_width(0.2);
                canvas.line(x1, y + 1.2, x2, y + 1.2)?;
                p.advance(4.0);
            },
            HeaderOrnament::ThinLine => {
                p.reserve(3.0);
                let y = p.y() + 1.5;
                let canvas = p.canvas_mut();
                canvas.set_draw_color(style.separator);
                canvas.set_dash(&[]);
                canvas.set_line_width(0.1);
                canvas.line(x1, y, x2, y)?;
                p.advance(3.0);
            },
            HeaderOrnament::TopBand | HeaderOrnament::HeaderBar => {},
        }
        p.advance(6.0);
        Ok(())
    }

    fn draw_date_badges(&self, dates: &[String], style: &ThemeStyle, p: &mut Paginator) -> Result<()> {
        let font = style.subtitle.font_name(false, false);
        let size = style.subtitle.size;
        let height = self.measurer.line_height(size) + 2.0;
        p.reserve(height);
        let top = p.y();
        let mut x = style.left_margin;
        for date in dates {
            let width = self.measurer.width(date, font, size) + 6.0;
            let canvas = p.canvas_mut();
            canvas.set_fill_color(style.accent);
            canvas.rounded_rect(x, top, width, height, height / 2.0, PaintStyle::Fill)?;
            canvas.set_font(font, size)?;
            canvas.set_text_color(style.subtitle.color);
            let baseline = top + 1.0 + BASELINE_RATIO * self.measurer.line_height(size);
            canvas.text(date, x + 3.0, baseline)?;
            x += width + 3.0;
        }
        p.advance(height);
        Ok(())
    }

    fn draw_markdown(
        &self,
        extraction: &Extraction,
        style: &ThemeStyle,
        p: &mut Paginator,
    ) -> Result<()> {
        for line in extraction.lines() {
            if let Some(block) = extraction.block_for_line(line) {
                match block {
                    ExtractedBlock::CodeBlock { language, content } => {
                        self.code_blocks.render(language, content, style, p)?;
                    },
                    ExtractedBlock::Table { headers, rows } => {
                        self.tables.render(headers, rows, style, p)?;
                    },
                }
                continue;
            }

            let trimmed = line.trim();
            if line.contains('`') {
                self.draw_inline_code(line, style, p)?;
            } else if trimmed == "---" {
                self.draw_rule(style, p)?;
            } else if let Some((level, text)) = heading(line) {
                self.draw_heading(level, text, style, p)?;
            } else if let Some(text) = line.strip_prefix("* ") {
                self.draw_bullet(text, style, p)?;
            } else if trimmed.is_empty() {
                p.advance(self.blank_line(style));
            } else {
                let lines =
                    self.measurer
                        .wrap_runs(&format_runs(line), &style.body, style.content_width);
                self.draw_run_lines(&lines, &style.body, style.left_margin, p)?;
            }
        }
        Ok(())
    }

    fn draw_plain(&self, content: &str, style: &ThemeStyle, p: &mut Paginator) -> Result<()> {
        for line in content.split('\n') {
            if line.trim().is_empty() {
                p.advance(self.blank_line(style));
            } else {
                self.draw_wrapped(line, &style.body, style, p)?;
            }
        }
        Ok(())
    }

    fn blank_line(&self, style: &ThemeStyle) -> f32 {
        self.measurer.line_height(style.body.size) * 0.6
    }

    /// Wrap `text` in one font and draw it line by line.
    fn draw_wrapped(
        &self,
        text: &str,
        font_style: &FontStyle,
        style: &ThemeStyle,
        p: &mut Paginator,
    ) -> Result<()> {
        let font = font_style.font_name(false, false);
        let line_height = self.measurer.line_height(font_style.size);
        for line in self
            .measurer
            .wrap(text, font, font_style.size, style.content_width)
        {
            p.reserve(line_height);
            let baseline = p.y() + BASELINE_RATIO * line_height;
            let canvas = p.canvas_mut();
            canvas.set_font(font, font_style.size)?;
            canvas.set_text_color(font_style.color);
            canvas.text(&line, style.left_margin, baseline)?;
            p.advance(line_height);
        }
        Ok(())
    }

    fn draw_run_lines(
        &self,
        lines: &[Vec<PlacedRun>],
        font_style: &FontStyle,
        x: f32,
        p: &mut Paginator,
    ) -> Result<()> {
        let line_height = self.measurer.line_height(font_style.size);
        for line in lines {
            p.reserve(line_height);
            let baseline = p.y() + BASELINE_RATIO * line_height;
            let canvas = p.canvas_mut();
            canvas.set_text_color(font_style.color);
            for run in line {
                canvas.set_font(font_style.font_name(run.bold, run.italic), font_style.size)?;
                canvas.text(&run.text, x + run.x, baseline)?;
            }
            p.advance(line_height);
        }
        Ok(())
    }

    fn draw_rule(&self, style: &ThemeStyle, p: &mut Paginator) -> Result<()> {
        p.reserve(6.0);
        let y = p.y() + 3.0;
        let canvas = p.canvas_mut();
        canvas.set_draw_color(style.separator);
        canvas.set_line_width(0.3);
        canvas.set_dash(&[]);
        canvas.line(style.left_margin, y, style.left_margin + style.content_width, y)?;
        p.advance(6.0);
        Ok(())
    }

    fn draw_heading(
        &self,
        level: usize,
        text: &str,
        style: &ThemeStyle,
        p: &mut Paginator,
    ) -> Result<()> {
        let plain: String = format_runs(text).into_iter().map(|run| run.text).collect();
        let font_style = style.heading(level);
        p.advance(2.0);
        self.draw_wrapped(&plain, font_style, style, p)?;
        p.advance(1.5);
        Ok(())
    }

    fn draw_bullet(&self, text: &str, style: &ThemeStyle, p: &mut Paginator) -> Result<()> {
        let body = &style.body;
        let lines = self.measurer.wrap_runs(
            &format_runs(text),
            body,
            style.content_width - BULLET_INDENT,
        );
        let line_height = self.measurer.line_height(body.size);

        // the bullet shares a page with the first line of its item
        p.reserve(line_height);
        let baseline = p.y() + BASELINE_RATIO * line_height;
        let canvas = p.canvas_mut();
        canvas.set_font(body.font_name(true, false), body.size)?;
        canvas.set_text_color(style.accent);
        canvas.text(BULLET, style.left_margin + 1.5, baseline)?;

        self.draw_run_lines(&lines, body, style.left_margin + BULLET_INDENT, p)
    }

    /// A line with backtick spans: plain segments in the body font, code
    /// segments in Courier on a light background.
    fn draw_inline_code(&self, line: &str, style: &ThemeStyle, p: &mut Paginator) -> Result<()> {
        let body = &style.body;
        let body_font = body.font_name(false, false);
        let line_height = self.measurer.line_height(body.size);
        let code_size = body.size * 0.9;
        let max_x = style.left_margin + style.content_width;

        // (word, is_code, space_before); words wider than a line are
        // hard-broken into pieces that each start a line
        let segments = split_inline_code(line);
        let mut words: Vec<(String, bool, bool)> = Vec::new();
        let mut pending_space = false;
        for segment in &segments {
            let (font, size) = if segment.is_code {
                (INLINE_CODE_FONT, code_size)
            } else {
                (body_font, body.size)
            };
            for (i, word) in segment.text.split(' ').enumerate() {
                if i > 0 {
                    pending_space = true;
                }
                if word.is_empty() {
                    continue;
                }
                if self.measurer.width(word, font, size) > style.content_width {
                    for piece in self.measurer.wrap(word, font, size, style.content_width) {
                        words.push((piece, segment.is_code, pending_space));
                        pending_space = false;
                    }
                } else {
                    words.push((word.to_string(), segment.is_code, pending_space));
                }
                pending_space = false;
            }
        }

        p.reserve(line_height);
        let mut x = style.left_margin;
        let mut at_line_start = true;
        for (word, is_code, space_before) in words {
            let (font, size) = if is_code {
                (INLINE_CODE_FONT, code_size)
            } else {
                (body_font, body.size)
            };
            let word_width = self.measurer.width(&word, font, size);
            let gap = if space_before && !at_line_start {
                self.measurer.width(" ", body_font, body.size)
            } else {
                0.0
            };

            if !at_line_start && x + gap + word_width > max_x {
                p.advance(line_height);
                p.reserve(line_height);
                x = style.left_margin;
                at_line_start = true;
            }
            let gap = if at_line_start { 0.0 } else { gap };
            x += gap;

            let top = p.y();
            let baseline = top + BASELINE_RATIO * line_height;
            let canvas = p.canvas_mut();
            if is_code {
                canvas.set_fill_color(INLINE_CODE_BACKGROUND);
                canvas.rect(x - 0.5, top + 0.3, word_width + 1.0, line_height - 0.6, PaintStyle::Fill)?;
                canvas.set_text_color(style.code_text);
            } else {
                canvas.set_text_color(body.color);
            }
            canvas.set_font(font, size)?;
            canvas.text(&word, x, baseline)?;

            x += word_width;
            at_line_start = false;
        }
        p.advance(line_height);
        Ok(())
    }

    fn draw_footers(&self, canvas: &mut PdfCanvas) -> Result<()> {
        let total = canvas.page_count();
        let y = canvas.page_height() - self.config.bottom_margin / 2.0;
        let page_width = canvas.page_width();
        for page in 1..=total {
            canvas.set_page(page)?;
            canvas.set_font(FOOTER_FONT, FOOTER_SIZE)?;
            canvas.set_text_color(FOOTER_COLOR);
            let label = format!("Page {} of {}", page, total);
            let width = canvas.text_width(&label);
            canvas.text(&label, (page_width - width) / 2.0, y)?;
        }
        Ok(())
    }
}

/// Heading level and text for `# `, `## ` and `### ` lines.
fn heading(line: &str) -> Option<(usize, &str)> {
    [("### ", 3), ("## ", 2), ("# ", 1)]
        .iter()
        .find_map(|(prefix, level)| line.strip_prefix(prefix).map(|text| (*level, text)))
}
