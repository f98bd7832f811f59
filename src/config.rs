//! Configuration for note export.

/// Page size, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PageSize {
    /// ISO A4, 210 x 297 mm
    #[default]
    A4,
    /// US Letter, 215.9 x 279.4 mm
    Letter,
    /// Custom width and height in millimetres
    Custom(f32, f32),
}

impl PageSize {
    /// (width, height) in millimetres.
    pub fn dimensions_mm(&self) -> (f32, f32) {
        match *self {
            PageSize::A4 => (210.0, 297.0),
            PageSize::Letter => (215.9, 279.4),
            PageSize::Custom(width, height) => (width, height),
        }
    }
}

/// Export configuration.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Page size.
    pub page_size: PageSize,

    /// Distance from the top edge to the first line, in mm.
    pub top_margin: f32,

    /// Space kept free at the bottom of every page, in mm.
    pub bottom_margin: f32,

    /// Compress page content streams.
    pub compress: bool,

    /// Draw "Page i of n" in the bottom margin.
    pub page_numbers: bool,

    /// Creator written to the document information.
    pub creator: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            page_size: PageSize::A4,
            top_margin: 20.0,
            bottom_margin: 20.0,
            compress: false,
            page_numbers: true,
            creator: Some("notepress".to_string()),
        }
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set top and bottom margins.
    pub fn with_margins(mut self, top: f32, bottom: f32) -> Self {
        self.top_margin = top;
        self.bottom_margin = bottom;
        self
    }

    /// Enable stream compression.
    pub fn with_compress(mut self, enable: bool) -> Self {
        self.compress = enable;
        self
    }

    /// Enable page numbers in the footer.
    pub fn with_page_numbers(mut self, enable: bool) -> Self {
        self.page_numbers = enable;
        self
    }

    /// Set the creator string.
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }
}
