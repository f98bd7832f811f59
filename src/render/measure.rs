//! Text measurement and wrapping in millimetres.

use super::inline::FormattedRun;
use crate::theme::FontStyle;
use crate::writer::{TextLayout, PT_PER_MM};

/// Leading applied to every font size.
const LINE_SPACING: f32 = 1.2;

/// A run placed on a wrapped line.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRun {
    /// Text to draw
    pub text: String,
    /// Bold
    pub bold: bool,
    /// Italic
    pub italic: bool,
    /// Offset from the line start in mm
    pub x: f32,
}

/// Measures and wraps text set in Base-14 fonts.
#[derive(Debug, Clone, Default)]
pub struct TextMeasurer {
    layout: TextLayout,
}

impl TextMeasurer {
    /// Create a measurer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Width of text in mm.
    pub fn width(&self, text: &str, font: &str, size: f32) -> f32 {
        self.layout.font_manager().text_width(text, font, size) / PT_PER_MM
    }

    /// Line height in mm for a font size in points.
    pub fn line_height(&self, size: f32) -> f32 {
        size * LINE_SPACING / PT_PER_MM
    }

    /// Wrap text to `max_width` mm. Always returns at least one line.
    pub fn wrap(&self, text: &str, font: &str, size: f32, max_width: f32) -> Vec<String> {
        self.layout
            .wrap_text(text, font, size, max_width * PT_PER_MM)
            .into_iter()
            .map(|(line, _)| line)
            .collect()
    }

    /// Wrap a line of monospaced text, keeping its indentation.
    ///
    /// Breaks at the last space that fits when there is one after the
    /// indentation, otherwise mid-token. An empty line stays one empty row.
    pub fn wrap_preformatted(
        &self,
        line: &str,
        font: &str,
        size: f32,
        max_width: f32,
    ) -> Vec<String> {
        let char_width = self.width("M", font, size);
        let capacity = if char_width > 0.0 {
            (((max_width + 1e-3) / char_width).floor() as usize).max(1)
        } else {
            usize::MAX
        };

        let chars: Vec<char> = line.trim_end().chars().collect();
        if chars.is_empty() {
            return vec![String::new()];
        }
        let indent = chars.iter().take_while(|c| c.is_whitespace()).count();

        let mut rows = Vec::new();
        let mut start = 0;
        while chars.len() - start > capacity {
            let limit = start + capacity;
            let floor = if start == 0 { indent } else { start };
            let split = (floor + 1..limit)
                .rev()
                .find(|&i| chars[i] == ' ')
                .unwrap_or(limit);
            rows.push(chars[start..split].iter().collect());
            start = split;
            // The space we broke at does not start the next row.
            while start < chars.len() && chars[start] == ' ' {
                start += 1;
            }
        }
        if start < chars.len() {
            rows.push(chars[start..].iter().collect());
        }
        rows
    }

    /// Wrap styled runs to `max_width` mm.
    ///
    /// Words keep their own style; a run of spaces between words collapses to
    /// one space set in the style of the preceding word. Adjacent words
    /// of the same style on one line are merged into one placed run.
    pub fn wrap_runs(
        &self,
        runs: &[FormattedRun],
        style: &FontStyle,
        max_width: f32,
    ) -> Vec<Vec<PlacedRun>> {
        let mut words: Vec<(&str, bool, bool, bool)> = Vec::new();
        let mut pending_space = false;
        for run in runs {
            for (i, word) in run.text.split(' ').enumerate() {
                if i > 0 {
                    pending_space = true;
                }
                if word.is_empty() {
                    continue;
                }
                words.push((word, run.bold, run.italic, pending_space));
                pending_space = false;
            }
        }

        let mut lines: Vec<Vec<PlacedRun>> = Vec::new();
        let mut line: Vec<PlacedRun> = Vec::new();
        let mut x = 0.0;

        for (word, bold, italic, space_before) in words {
            let font = style.font_name(bold, italic);
            let word_width = self.width(word, font, style.size);
            // The separating space belongs to the previous run and takes its font.
            let gap = match line.last() {
                Some(last) if space_before => {
                    self.width(" ", style.font_name(last.bold, last.italic), style.size)
                },
                _ => 0.0,
            };

            if !line.is_empty() && x + gap + word_width > max_width {
                lines.push(std::mem::take(&mut line));
                x = 0.0;
            }

            if line.is_empty() && word_width > max_width {
                let pieces = self.wrap(word, font, style.size, max_width);
                let count = pieces.len();
                for (i, piece) in pieces.into_iter().enumerate() {
                    let piece_width = self.width(&piece, font, style.size);
                    let placed = PlacedRun { text: piece, bold, italic, x: 0.0 };
                    if i + 1 < count {
                        lines.push(vec![placed]);
                    } else {
                        line.push(placed);
                        x = piece_width;
                    }
                }
                continue;
            }

            let gap = if line.is_empty() { 0.0 } else { gap };
            let same_style = line.last().is_some_and(|l| l.bold == bold && l.italic == italic);
            if let Some(last) = line.last_mut() {
                if gap > 0.0 {
                    last.text.push(' ');
                }
                if same_style {
                    last.text.push_str(word);
                }
            }
            if !same_style {
                line.push(PlacedRun { text: word.to_string(), bold, italic, x: x + gap });
            }
            x += gap + word_width;
        }

        if !line.is_empty() || lines.is_empty() {
            lines.push(line);
        }
        lines
    }
}
