//! Page-break bookkeeping.
//!
//! The paginator owns the canvas and the write cursor. Renderers ask it to
//! [`reserve`](Paginator::reserve) room for each atomic unit (a text line, a
//! code row, a table row) before drawing it; a unit that does not fit moves
//! to a fresh page.

use crate::error::{Error, Result};
use crate::writer::PdfCanvas;

/// Vertical page budget in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    /// Page height
    pub page_height: f32,
    /// Cursor position at the top of every page
    pub top_margin: f32,
    /// Space kept free at the bottom of every page
    pub bottom_margin: f32,
}

impl PageLayout {
    /// Lowest y a unit may extend to.
    pub fn content_bottom(&self) -> f32 {
        self.page_height - self.bottom_margin
    }

    /// Height available between the margins.
    pub fn usable_height(&self) -> f32 {
        self.content_bottom() - self.top_margin
    }
}

/// Write position: 1-based page and y in mm from the top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    /// Current page, starting at 1
    pub page: usize,
    /// Distance from the top edge
    pub y: f32,
}

/// Canvas plus cursor.
#[derive(Debug)]
pub struct Paginator {
    canvas: PdfCanvas,
    layout: PageLayout,
    cursor: Cursor,
}

impl Paginator {
    /// Start at the top margin of the canvas's current page.
    pub fn new(canvas: PdfCanvas, top_margin: f32, bottom_margin: f32) -> Result<Self> {
        let layout = PageLayout {
            page_height: canvas.page_height(),
            top_margin,
            bottom_margin,
        };
        let usable = layout.usable_height();
        if !usable.is_finite() || usable <= 0.0 || top_margin < 0.0 || bottom_margin < 0.0 {
            return Err(Error::Layout(format!(
                "margins {} + {} leave no room on a {} mm page",
                top_margin, bottom_margin, layout.page_height
            )));
        }

        let cursor = Cursor {
            page: canvas.current_page(),
            y: top_margin,
        };
        Ok(Self {
            canvas,
            layout,
            cursor,
        })
    }

    /// Whether a unit of `height` fits below the cursor on this page.
    pub fn fits(&self, height: f32) -> bool {
        self.cursor.y + height <= self.layout.content_bottom()
    }

    /// Whether `reserve(height)` would start a new page.
    ///
    /// A unit taller than a whole page is placed at the top of the page
    /// rather than breaking forever.
    pub fn needs_break(&self, height: f32) -> bool {
        !self.fits(height) && self.cursor.y > self.layout.top_margin
    }

    /// Make room for a unit of `height`, starting a new page if needed.
    ///
    /// Returns whether a page break happened.
    pub fn reserve(&mut self, height: f32) -> bool {
        if !self.needs_break(height) {
            if !self.fits(height) {
                log::warn!(
                    "Unit of {:.1} mm exceeds the usable page height of {:.1} mm",
                    height,
                    self.layout.usable_height()
                );
            }
            return false;
        }
        self.new_page();
        true
    }

    /// Start a new page and move the cursor to its top margin.
    pub fn new_page(&mut self) {
        let page = self.canvas.add_page();
        log::debug!("Page break at y={:.1} mm, now on page {}", self.cursor.y, page);
        self.cursor = Cursor {
            page,
            y: self.layout.top_margin,
        };
    }

    /// Move the cursor down.
    pub fn advance(&mut self, dy: f32) {
        self.cursor.y += dy;
    }

    /// Current cursor.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Current y in mm.
    pub fn y(&self) -> f32 {
        self.cursor.y
    }

    /// Page budget.
    pub fn layout(&self) -> PageLayout {
        self.layout
    }

    /// Number of pages so far.
    pub fn page_count(&self) -> usize {
        self.canvas.page_count()
    }

    /// Drawing surface.
    pub fn canvas(&self) -> &PdfCanvas {
        &self.canvas
    }

    /// Mutable drawing surface, positioned on the cursor's page.
    pub fn canvas_mut(&mut self) -> &mut PdfCanvas {
        &mut self.canvas
    }

    /// Give back the canvas.
    pub fn into_canvas(self) -> PdfCanvas {
        self.canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::PdfWriterConfig;

    fn paginator(height: f32, top: f32, bottom: f32) -> Paginator {
        let canvas = PdfCanvas::new(100.0, height, PdfWriterConfig::default()).unwrap();
        Paginator::new(canvas, top, bottom).unwrap()
    }

    #[test]
    fn test_uniform_units_fill_pages() {
        let mut p = paginator(100.0, 10.0, 10.0);
        for _ in 0..25 {
            p.reserve(8.0);
            assert!(p.y() + 8.0 <= 90.0);
            p.advance(8.0);
        }
        // 80 mm usable, 10 units per page
        assert_eq!(p.page_count(), 3);
        assert_eq!(p.cursor().page, 3);
    }

    #[test]
    fn test_reserve_reports_break() {
        let mut p = paginator(100.0, 10.0, 10.0);
        p.advance(75.0);
        assert!(!p.reserve(5.0));
        assert!(p.reserve(6.0));
        assert_eq!(p.cursor(), Cursor { page: 2, y: 10.0 });
    }

    #[test]
    fn test_oversized_unit_does_not_loop() {
        let mut p = paginator(100.0, 10.0, 10.0);
        assert!(!p.reserve(500.0));
        assert_eq!(p.page_count(), 1);
        p.advance(1.0);
        assert!(p.reserve(500.0));
        assert!(!p.reserve(500.0));
        assert_eq!(p.page_count(), 2);
    }

    #[test]
    fn test_rejects_margins_that_fill_the_page() {
        let canvas = PdfCanvas::new(100.0, 50.0, PdfWriterConfig::default()).unwrap();
        assert!(matches!(Paginator::new(canvas, 30.0, 20.0), Err(Error::Layout(_))));
    }

    #[test]
    fn test_cursor_starts_at_top_margin() {
        let p = paginator(297.0, 20.0, 15.0);
        assert_eq!(p.cursor(), Cursor { page: 1, y: 20.0 });
        assert_eq!(p.layout().usable_height(), 262.0);
        assert!(p.fits(262.0));
        assert!(!p.fits(262.5));
    }
}
