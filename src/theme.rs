//! Visual themes.
//!
//! A theme is a fixed bundle of typography, colors and spacing. Styles live
//! in a static table indexed by [`ThemeId`]; nothing here branches on the
//! theme at render time.

use crate::color::Color;
use crate::writer::{FontFamily, FontManager, FontWeight};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a built-in theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeId {
    /// Serif typography with a double rule under the header
    Classic,
    /// Sans-serif with a colored top band
    #[default]
    Modern,
    /// Saturated colors, header bar and badge-styled dates
    Colorful,
    /// Sparse layout with hairline separators
    Minimal,
}

impl ThemeId {
    /// All themes, in table order.
    pub const ALL: [ThemeId; 4] = [
        ThemeId::Classic,
        ThemeId::Modern,
        ThemeId::Colorful,
        ThemeId::Minimal,
    ];

    /// Parse a theme id; unknown ids fall back to [`ThemeId::Modern`].
    pub fn parse(id: &str) -> Self {
        match id.trim().to_ascii_lowercase().as_str() {
            "classic" => ThemeId::Classic,
            "modern" => ThemeId::Modern,
            "colorful" => ThemeId::Colorful,
            "minimal" => ThemeId::Minimal,
            other => {
                log::debug!("Unknown theme '{}', using modern", other);
                ThemeId::Modern
            },
        }
    }

    /// Lowercase name, as used in file names.
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeId::Classic => "classic",
            ThemeId::Modern => "modern",
            ThemeId::Colorful => "colorful",
            ThemeId::Minimal => "minimal",
        }
    }

    fn index(self) -> usize {
        match self {
            ThemeId::Classic => 0,
            ThemeId::Modern => 1,
            ThemeId::Colorful => 2,
            ThemeId::Minimal => 3,
        }
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Font, size and color for one kind of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontStyle {
    /// Base-14 family
    pub family: FontFamily,
    /// Size in points
    pub size: f32,
    /// Text color
    pub color: Color,
    /// Whether text in this style is bold by default
    pub bold: bool,
}

impl FontStyle {
    const fn new(family: FontFamily, size: f32, color: Color, bold: bool) -> Self {
        Self {
            family,
            size,
            color,
            bold,
        }
    }

    /// Base-14 font name for this style with the given emphasis.
    ///
    /// `bold` adds to the style's own weight; it never makes a bold style regular.
    pub fn font_name(&self, bold: bool, italic: bool) -> &'static str {
        let weight = if self.bold || bold {
            FontWeight::Bold
        } else {
            FontWeight::Normal
        };
        FontManager::select_font(self.family, weight, italic)
    }
}

/// Decoration drawn at the top of the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderOrnament {
    /// Two accent rules below the title block
    DoubleRule,
    /// Full-width accent band along the top edge
    TopBand,
    /// Tall colored bar behind the top margin with an accent stripe
    HeaderBar,
    /// Single hairline below the title block
    ThinLine,
}

/// Complete style of a theme.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeStyle {
    /// Theme this style belongs to
    pub id: ThemeId,
    /// Note title
    pub title: FontStyle,
    /// Date line under the title
    pub subtitle: FontStyle,
    /// Paragraphs, bullets and table cells
    pub body: FontStyle,
    /// `# ` headings
    pub h1: FontStyle,
    /// `## ` headings
    pub h2: FontStyle,
    /// `### ` headings
    pub h3: FontStyle,
    /// Ornament and bullet color
    pub accent: Color,
    /// `---` rules and header rules
    pub separator: Color,
    /// Code block fill
    pub code_background: Color,
    /// Code block border
    pub code_border: Color,
    /// Code text
    pub code_text: Color,
    /// Language chip fill
    pub code_label_background: Color,
    /// Language chip text
    pub code_label_text: Color,
    /// Table header fill
    pub table_header_background: Color,
    /// Table cell borders
    pub table_border: Color,
    /// Left margin in millimetres
    pub left_margin: f32,
    /// Width available to content in millimetres
    pub content_width: f32,
    /// Header decoration
    pub ornament: HeaderOrnament,
    /// Whether dates are drawn as badges
    pub badge_dates: bool,
}

const fn c(r: u8, g: u8, b: u8) -> Color {
    Color::rgb8(r, g, b)
}

use FontFamily::{Helvetica, Times};

static THEMES: [ThemeStyle; 4] = [
    ThemeStyle {
        id: ThemeId::Classic,
        title: FontStyle::new(Times, 24.0, c(33, 33, 33), true),
        subtitle: FontStyle::new(Times, 10.0, c(110, 110, 110), false),
        body: FontStyle::new(Times, 11.0, c(51, 51, 51), false),
        h1: FontStyle::new(Times, 18.0, c(33, 33, 33), true),
        h2: FontStyle::new(Times, 15.0, c(60, 60, 60), true),
        h3: FontStyle::new(Times, 13.0, c(90, 90, 90), true),
        accent: c(139, 69, 19),
        separator: c(160, 160, 160),
        code_background: c(245, 245, 240),
        code_border: c(200, 200, 190),
        code_text: c(40, 40, 40),
        code_label_background: c(139, 69, 19),
        code_label_text: c(255, 255, 255),
        table_header_background: c(235, 230, 220),
        table_border: c(180, 170, 160),
        left_margin: 25.0,
        content_width: 160.0,
        ornament: HeaderOrnament::DoubleRule,
        badge_dates: false,
    },
    ThemeStyle {
        id: ThemeId::Modern,
        title: FontStyle::new(Helvetica, 26.0, c(17, 24, 39), true),
        subtitle: FontStyle::new(Helvetica, 10.0, c(107, 114, 128), false),
        body: FontStyle::new(Helvetica, 11.0, c(55, 65, 81), false),
        h1: FontStyle::new(Helvetica, 20.0, c(17, 24, 39), true),
        h2: FontStyle::new(Helvetica, 16.0, c(31, 41, 55), true),
        h3: FontStyle::new(Helvetica, 13.0, c(59, 130, 246), true),
        accent: c(59, 130, 246),
        separator: c(229, 231, 235),
        code_background: c(243, 244, 246),
        code_border: c(209, 213, 219),
        code_text: c(31, 41, 55),
        code_label_background: c(59, 130, 246),
        code_label_text: c(255, 255, 255),
        table_header_background: c(239, 246, 255),
        table_border: c(209, 213, 219),
        left_margin: 20.0,
        content_width: 170.0,
        ornament: HeaderOrnament::TopBand,
        badge_dates: false,
    },
    ThemeStyle {
        id: ThemeId::Colorful,
        title: FontStyle::new(Helvetica, 26.0, c(124, 58, 237), true),
        subtitle: FontStyle::new(Helvetica, 10.0, c(255, 255, 255), true),
        body: FontStyle::new(Helvetica, 11.0, c(55, 48, 80), false),
        h1: FontStyle::new(Helvetica, 20.0, c(124, 58, 237), true),
        h2: FontStyle::new(Helvetica, 16.0, c(236, 72, 153), true),
        h3: FontStyle::new(Helvetica, 13.0, c(14, 165, 233), true),
        accent: c(236, 72, 153),
        separator: c(244, 114, 182),
        code_background: c(253, 242, 248),
        code_border: c(244, 114, 182),
        code_text: c(76, 29, 149),
        code_label_background: c(236, 72, 153),
        code_label_text: c(255, 255, 255),
        table_header_background: c(237, 233, 254),
        table_border: c(196, 181, 253),
        left_margin: 20.0,
        content_width: 170.0,
        ornament: HeaderOrnament::HeaderBar,
        badge_dates: true,
    },
    ThemeStyle {
        id: ThemeId::Minimal,
        title: FontStyle::new(Helvetica, 22.0, c(0, 0, 0), false),
        subtitle: FontStyle::new(Helvetica, 9.0, c(150, 150, 150), false),
        body: FontStyle::new(Helvetica, 10.5, c(30, 30, 30), false),
        h1: FontStyle::new(Helvetica, 16.0, c(0, 0, 0), true),
        h2: FontStyle::new(Helvetica, 13.5, c(0, 0, 0), true),
        h3: FontStyle::new(Helvetica, 11.5, c(60, 60, 60), true),
        accent: c(0, 0, 0),
        separator: c(220, 220, 220),
        code_background: c(250, 250, 250),
        code_border: c(230, 230, 230),
        code_text: c(30, 30, 30),
        code_label_background: c(230, 230, 230),
        code_label_text: c(80, 80, 80),
        table_header_background: c(248, 248, 248),
        table_border: c(220, 220, 220),
        left_margin: 30.0,
        content_width: 150.0,
        ornament: HeaderOrnament::ThinLine,
        badge_dates: false,
    },
];

impl ThemeStyle {
    /// Style of a theme.
    pub fn for_theme(id: ThemeId) -> &'static ThemeStyle {
        &THEMES[id.index()]
    }

    /// Style for a theme id string; unknown ids get the modern style.
    pub fn get_style(id: &str) -> &'static ThemeStyle {
        Self::for_theme(ThemeId::parse(id))
    }

    /// Heading style for level 1..=3 (levels above 3 use `h3`).
    pub fn heading(&self, level: usize) -> &FontStyle {
        match level {
            0 | 1 => &self.h1,
            2 => &self.h2,
            _ => &self.h3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_indexed_by_id() {
        for id in ThemeId::ALL {
            assert_eq!(ThemeStyle::for_theme(id).id, id);
        }
    }

    #[test]
    fn test_unknown_theme_falls_back_to_modern() {
        assert_eq!(ThemeId::parse("neon"), ThemeId::Modern);
        assert_eq!(ThemeId::parse(""), ThemeId::Modern);
        assert_eq!(ThemeStyle::get_style("neon").id, ThemeId::Modern);
        assert_eq!(ThemeId::parse(" Classic "), ThemeId::Classic);
    }

    #[test]
    fn test_content_fits_a4() {
        for id in ThemeId::ALL {
            let style = ThemeStyle::for_theme(id);
            assert!(style.left_margin + style.content_width <= 210.0 - 10.0, "{}", id);
        }
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&ThemeId::Colorful).unwrap(), "\"colorful\"");
        let id: ThemeId = serde_json::from_str("\"minimal\"").unwrap();
        assert_eq!(id, ThemeId::Minimal);
    }

    #[test]
    fn test_font_names() {
        let classic = ThemeStyle::for_theme(ThemeId::Classic);
        assert_eq!(classic.body.font_name(false, false), "Times-Roman");
        assert_eq!(classic.body.font_name(true, true), "Times-BoldItalic");
        assert_eq!(classic.title.font_name(false, false), "Times-Bold");
        let modern = ThemeStyle::for_theme(ThemeId::Modern);
        assert_eq!(modern.body.font_name(false, true), "Helvetica-Oblique");
    }

    #[test]
    fn test_only_colorful_uses_badges() {
        let badges: Vec<_> = ThemeId::ALL
            .into_iter()
            .filter(|id| ThemeStyle::for_theme(*id).badge_dates)
            .collect();
        assert_eq!(badges, vec![ThemeId::Colorful]);
    }
}
