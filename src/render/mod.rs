//! Note layout.
//!
//! Turns note content into drawing calls on a [`PdfCanvas`](crate::writer::PdfCanvas):
//!
//! - [`extract`] lifts fenced code blocks and pipe tables out of the content
//! - [`inline`] splits lines into bold, italic and inline-code pieces
//! - [`measure`] measures and wraps text in millimetres
//! - [`paginator`] tracks the cursor and breaks pages
//! - [`code_block`] and [`table`] draw the extracted blocks
//! - [`composer`] ties everything together

pub mod code_block;
pub mod composer;
pub mod extract;
pub mod inline;
pub mod measure;
pub mod paginator;
pub mod table;

pub use code_block::CodeBlockRenderer;
pub use composer::{export_note, sanitize_filename, DocumentComposer, ExportedDocument};
pub use extract::{extract, ExtractedBlock, Extraction};
pub use inline::{format_runs, split_inline_code, FormattedRun, InlineSegment};
pub use measure::{PlacedRun, TextMeasurer};
pub use paginator::{Cursor, PageLayout, Paginator};
pub use table::TableRenderer;

/// Baseline position within a line box, as a fraction of the line height.
pub(crate) const BASELINE_RATIO: f32 = 0.78;
