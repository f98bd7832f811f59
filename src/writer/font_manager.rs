//! Font management for PDF generation.
//!
//! Only the PDF Base-14 text fonts are available. Text is shown through
//! the WinAnsi encoding, so widths are looked up per WinAnsi character.
//! Widths are in 1/1000 em, taken from the Adobe Core 14 AFM files.

use std::collections::HashMap;

/// Font family classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFamily {
    /// Helvetica (sans-serif)
    Helvetica,
    /// Times (serif)
    Times,
    /// Courier (monospace)
    Courier,
}

impl FontFamily {
    /// Parse a family name as used in theme tables ("helvetica", "times", "courier").
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "helvetica" | "sans" => Some(FontFamily::Helvetica),
            "times" | "times-roman" | "serif" => Some(FontFamily::Times),
            "courier" | "mono" | "monospace" => Some(FontFamily::Courier),
            _ => None,
        }
    }
}

/// Font weight classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontWeight {
    /// Normal weight
    #[default]
    Normal,
    /// Bold weight
    Bold,
}

/// Metrics for one Base-14 font.
#[derive(Debug, Clone, Copy)]
pub struct FontInfo {
    /// PostScript name (e.g., "Helvetica-Bold")
    pub name: &'static str,
    /// Font family
    pub family: FontFamily,
    /// Font weight
    pub weight: FontWeight,
    /// Whether the font is italic/oblique
    pub italic: bool,
    widths: FontWidths,
    /// Ascender height (above baseline)
    pub ascender: f32,
    /// Descender depth (below baseline, negative)
    pub descender: f32,
    /// Cap height (height of capital letters)
    pub cap_height: f32,
}

/// Character widths for printable ASCII (0x20..=0x7E) or a fixed pitch.
#[derive(Debug, Clone, Copy)]
enum FontWidths {
    Proportional(&'static [u16; 95]),
    Monospace(u16),
}

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[rustfmt::skip]
const TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

#[rustfmt::skip]
const TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

#[rustfmt::skip]
const TIMES_ITALIC: [u16; 95] = [
    250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 675, 675, 675, 500,
    920, 611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833, 667, 722,
    611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556, 389, 278, 389, 422, 500,
    333, 500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722, 500, 500,
    500, 500, 389, 389, 278, 500, 444, 667, 444, 444, 389, 400, 275, 400, 541,
];

/// The twelve Base-14 text fonts: (name, family, weight, italic).
const BASE14_TEXT_FONTS: [(&str, FontFamily, FontWeight, bool); 12] = [
    ("Helvetica", FontFamily::Helvetica, FontWeight::Normal, false),
    ("Helvetica-Bold", FontFamily::Helvetica, FontWeight::Bold, false),
    ("Helvetica-Oblique", FontFamily::Helvetica, FontWeight::Normal, true),
    ("Helvetica-BoldOblique", FontFamily::Helvetica, FontWeight::Bold, true),
    ("Times-Roman", FontFamily::Times, FontWeight::Normal, false),
    ("Times-Bold", FontFamily::Times, FontWeight::Bold, false),
    ("Times-Italic", FontFamily::Times, FontWeight::Normal, true),
    ("Times-BoldItalic", FontFamily::Times, FontWeight::Bold, true),
    ("Courier", FontFamily::Courier, FontWeight::Normal, false),
    ("Courier-Bold", FontFamily::Courier, FontWeight::Bold, false),
    ("Courier-Oblique", FontFamily::Courier, FontWeight::Normal, true),
    ("Courier-BoldOblique", FontFamily::Courier, FontWeight::Bold, true),
];

impl FontInfo {
    fn base14(name: &'static str, family: FontFamily, weight: FontWeight, italic: bool) -> Self {
        let widths = match (family, weight, italic) {
            (FontFamily::Courier, _, _) => FontWidths::Monospace(600),
            (FontFamily::Helvetica, FontWeight::Normal, _) => FontWidths::Proportional(&HELVETICA),
            (FontFamily::Helvetica, FontWeight::Bold, _) => {
                FontWidths::Proportional(&HELVETICA_BOLD)
            },
            (FontFamily::Times, FontWeight::Normal, false) => {
                FontWidths::Proportional(&TIMES_ROMAN)
            },
            (FontFamily::Times, FontWeight::Normal, true) => {
                FontWidths::Proportional(&TIMES_ITALIC)
            },
            // Times-BoldItalic is measured with the upright bold widths.
            (FontFamily::Times, FontWeight::Bold, _) => FontWidths::Proportional(&TIMES_BOLD),
        };
        let (ascender, descender, cap_height) = match (family, weight) {
            (FontFamily::Helvetica, _) => (718.0, -207.0, 718.0),
            (FontFamily::Times, FontWeight::Normal) => (683.0, -217.0, 662.0),
            (FontFamily::Times, FontWeight::Bold) => (676.0, -205.0, 676.0),
            (FontFamily::Courier, FontWeight::Normal) => (629.0, -157.0, 562.0),
            (FontFamily::Courier, FontWeight::Bold) => (626.0, -142.0, 562.0),
        };

        Self {
            name,
            family,
            weight,
            italic,
            widths,
            ascender,
            descender,
            cap_height,
        }
    }

    /// Width of a single character in font units (1/1000 em).
    pub fn char_width(&self, ch: char) -> f32 {
        match self.widths {
            FontWidths::Monospace(width) => width as f32,
            FontWidths::Proportional(table) => match ch {
                ' '..='~' => table[ch as usize - 0x20] as f32,
                '\u{2022}' => 350.0,
                '\u{2013}' => 500.0,
                '\u{2014}' | '\u{2026}' | '\u{2030}' => 1000.0,
                '\u{2018}' | '\u{2019}' | '\u{201A}' => 333.0,
                '\u{201C}' | '\u{201D}' | '\u{201E}' => 444.0,
                // Latin-1 letters take the width of their closest ASCII shape
                _ => table[usize::from(b'n') - 0x20] as f32,
            },
        }
    }

    /// Width of text in points at the given size.
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let units: f32 = text.chars().map(|c| self.char_width(c)).sum();
        units * font_size / 1000.0
    }

    /// Line height in points (ascender to descender, 120% leading).
    pub fn line_height(&self, font_size: f32) -> f32 {
        (self.ascender - self.descender) * font_size / 1000.0 * 1.2
    }
}

/// Font manager for PDF generation.
///
/// Resolves Base-14 font names and provides metrics for text layout.
#[derive(Debug, Clone)]
pub struct FontManager {
    fonts: HashMap<&'static str, FontInfo>,
}

impl FontManager {
    /// Create a new font manager with the Base-14 text fonts registered.
    pub fn new() -> Self {
        let fonts = BASE14_TEXT_FONTS
            .iter()
            .map(|&(name, family, weight, italic)| {
                (name, FontInfo::base14(name, family, weight, italic))
            })
            .collect();
        Self { fonts }
    }

    /// Get font info by name.
    pub fn get_font(&self, name: &str) -> Option<&FontInfo> {
        self.fonts.get(name)
    }

    /// Get font info, falling back to Helvetica if not found.
    pub fn get_font_or_default(&self, name: &str) -> FontInfo {
        self.fonts.get(name).copied().unwrap_or_else(|| {
            FontInfo::base14("Helvetica", FontFamily::Helvetica, FontWeight::Normal, false)
        })
    }

    /// Width of a string in points.
    pub fn text_width(&self, text: &str, font_name: &str, font_size: f32) -> f32 {
        self.get_font_or_default(font_name).text_width(text, font_size)
    }

    /// Width of one character in points.
    pub fn char_width(&self, ch: char, font_name: &str, font_size: f32) -> f32 {
        self.get_font_or_default(font_name).char_width(ch) * font_size / 1000.0
    }

    /// Whether the name is a registered Base-14 font.
    pub fn is_base14(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }

    /// Select the Base-14 font for the given family and style.
    pub fn select_font(family: FontFamily, weight: FontWeight, italic: bool) -> &'static str {
        BASE14_TEXT_FONTS
            .iter()
            .find(|(_, f, w, i)| *f == family && *w == weight && *i == italic)
            .map(|(name, ..)| *name)
            .unwrap_or("Helvetica")
    }
}

impl Default for FontManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Text layout helper for wrapping text in a Base-14 font.
#[derive(Debug, Clone, Default)]
pub struct TextLayout {
    font_manager: FontManager,
}

impl TextLayout {
    /// Create a new text layout helper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap text into lines no wider than `max_width` points.
    ///
    /// Words are separated by whitespace. A single word wider than the line
    /// is broken between characters. Returns `(line_text, line_width)` pairs;
    /// empty input yields one empty line.
    pub fn wrap_text(
        &self,
        text: &str,
        font_name: &str,
        font_size: f32,
        max_width: f32,
    ) -> Vec<(String, f32)> {
        let font = self.font_manager.get_font_or_default(font_name);
        let space_width = font.char_width(' ') * font_size / 1000.0;
        let mut lines = Vec::new();
        let mut current_line = String::new();
        let mut current_width = 0.0;

        for word in text.split_whitespace() {
            let word_width = font.text_width(word, font_size);

            if word_width > max_width {
                if !current_line.is_empty() {
                    lines.push((std::mem::take(&mut current_line), current_width));
                }
                let mut pieces = self.break_word(word, &font, font_size, max_width);
                // The last piece keeps accepting words.
                if let Some((tail, tail_width)) = pieces.pop() {
                    lines.extend(pieces);
                    current_line = tail;
                    current_width = tail_width;
                }
            } else if current_line.is_empty() {
                current_line = word.to_string();
                current_width = word_width;
            } else if current_width + space_width + word_width <= max_width {
                current_line.push(' ');
                current_line.push_str(word);
                current_width += space_width + word_width;
            } else {
                lines.push((std::mem::take(&mut current_line), current_width));
                current_line = word.to_string();
                current_width = word_width;
            }
        }

        if !current_line.is_empty() {
            lines.push((current_line, current_width));
        }
        if lines.is_empty() {
            lines.push((String::new(), 0.0));
        }

        lines
    }

    /// Break one word into pieces that each fit `max_width` (at least one char each).
    fn break_word(
        &self,
        word: &str,
        font: &FontInfo,
        font_size: f32,
        max_width: f32,
    ) -> Vec<(String, f32)> {
        let mut pieces = Vec::new();
        let mut piece = String::new();
        let mut width = 0.0;

        for ch in word.chars() {
            let ch_width = font.char_width(ch) * font_size / 1000.0;
            if !piece.is_empty() && width + ch_width > max_width {
                pieces.push((std::mem::take(&mut piece), width));
                width = 0.0;
            }
            piece.push(ch);
            width += ch_width;
        }
        if !piece.is_empty() {
            pieces.push((piece, width));
        }
        pieces
    }

    /// Get the font manager.
    pub fn font_manager(&self) -> &FontManager {
        &self.font_manager
    }
}

/// Encode text as WinAnsi (PDF Annex D.2) for a Base-14 font.
///
/// Tabs become spaces; characters outside the encoding become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            '\t' => b' ',
            ' '..='~' => ch as u8,
            '\u{A0}'..='\u{FF}' => ch as u32 as u8,
            '\u{20AC}' => 0x80,
            '\u{201A}' => 0x82,
            '\u{0192}' => 0x83,
            '\u{201E}' => 0x84,
            '\u{2026}' => 0x85,
            '\u{2020}' => 0x86,
            '\u{2021}' => 0x87,
            '\u{02C6}' => 0x88,
            '\u{2030}' => 0x89,
            '\u{0160}' => 0x8A,
            '\u{2039}' => 0x8B,
            '\u{0152}' => 0x8C,
            '\u{017D}' => 0x8E,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{02DC}' => 0x98,
            '\u{2122}' => 0x99,
            '\u{0161}' => 0x9A,
            '\u{203A}' => 0x9B,
            '\u{0153}' => 0x9C,
            '\u{017E}' => 0x9E,
            '\u{0178}' => 0x9F,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base14_text_fonts_registered() {
        let fm = FontManager::new();
        for name in ["Helvetica", "Times-Bold", "Courier", "Helvetica-BoldOblique"] {
            assert!(fm.is_base14(name), "{} should be registered", name);
        }
        assert!(fm.get_font("Comic-Sans").is_none());
    }

    #[test]
    fn test_text_width_calculation() {
        let fm = FontManager::new();
        // H(722) + i(222) = 944 units
        let width = fm.text_width("Hi", "Helvetica", 10.0);
        assert!((width - 9.44).abs() < 1e-4);
    }

    #[test]
    fn test_monospace_consistency() {
        let fm = FontManager::new();
        let narrow = fm.text_width("iiii", "Courier", 10.0);
        let wide = fm.text_width("MMMM", "Courier", 10.0);
        assert_eq!(narrow, wide);
        assert_eq!(narrow, 24.0);
    }

    #[test]
    fn test_bold_is_wider() {
        let fm = FontManager::new();
        let regular = fm.text_width("bold text", "Helvetica", 12.0);
        let bold = fm.text_width("bold text", "Helvetica-Bold", 12.0);
        assert!(bold > regular);
    }

    #[test]
    fn test_font_selection() {
        assert_eq!(
            FontManager::select_font(FontFamily::Times, FontWeight::Bold, true),
            "Times-BoldItalic"
        );
        assert_eq!(
            FontManager::select_font(FontFamily::Helvetica, FontWeight::Normal, true),
            "Helvetica-Oblique"
        );
        assert_eq!(
            FontManager::select_font(FontFamily::Courier, FontWeight::Normal, false),
            "Courier"
        );
    }

    #[test]
    fn test_family_parse() {
        assert_eq!(FontFamily::parse("Times"), Some(FontFamily::Times));
        assert_eq!(FontFamily::parse("monospace"), Some(FontFamily::Courier));
        assert_eq!(FontFamily::parse("comic"), None);
    }

    #[test]
    fn test_wrap_text() {
        let layout = TextLayout::new();
        let lines = layout.wrap_text("the quick brown fox jumps over", "Helvetica", 10.0, 60.0);
        assert!(lines.len() > 1);
        for (_, width) in &lines {
            assert!(*width <= 60.0);
        }
        let joined: Vec<_> = lines.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(joined.join(" "), "the quick brown fox jumps over");
    }

    #[test]
    fn test_wrap_breaks_long_word() {
        let layout = TextLayout::new();
        let lines = layout.wrap_text("abcdefghij end", "Courier", 10.0, 24.0);
        let texts: Vec<_> = lines.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(texts, vec!["abcd", "efgh", "ij", "end"]);
    }

    #[test]
    fn test_wrap_empty_text() {
        let layout = TextLayout::new();
        let lines = layout.wrap_text("   ", "Helvetica", 10.0, 100.0);
        assert_eq!(lines, vec![(String::new(), 0.0)]);
    }

    #[test]
    fn test_line_height() {
        let fm = FontManager::new();
        let font = fm.get_font_or_default("Helvetica");
        // (718 + 207) * 10 / 1000 * 1.2
        assert!((font.line_height(10.0) - 11.1).abs() < 1e-4);
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("abc"), b"abc".to_vec());
        assert_eq!(encode_win_ansi("•–—"), vec![0x95, 0x96, 0x97]);
        assert_eq!(encode_win_ansi("café"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
        assert_eq!(encode_win_ansi("a\tb"), b"a b".to_vec());
    }
}
