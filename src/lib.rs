// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::should_implement_trait)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]
#![cfg_attr(test, allow(unused_variables))]

//! # notepress
//!
//! Themed, paginated PDF export for notes written in a small Markdown dialect.
//!
//! ## Features
//!
//! - **Structural blocks**: fenced code blocks and pipe tables are lifted out
//!   before line layout and drawn as containers that flow across pages
//! - **Inline formatting**: `**bold**`, `*italic*` and `` `code` ``
//! - **Themes**: classic, modern, colorful and minimal
//! - **Pagination**: every line, code row and table row is placed
//!   individually, so long blocks break cleanly
//! - **Self-contained output**: Base-14 fonts only, nothing is embedded
//!
//! ## Quick Start
//!
//! ```ignore
//! use notepress::{export_note, Note};
//!
//! # fn main() -> notepress::Result<()> {
//! let note = Note::new("Groceries", "# List\n* milk\n* **eggs**");
//! let doc = export_note(&note, "classic", true)?;
//! doc.save(".")?; // groceries_classic_markdown.pdf
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`render`] lays the note out: extraction, inline formatting,
//!   measurement, pagination, block renderers and the composer
//! - [`writer`] is the PDF backend: content streams, Base-14 metrics, object
//!   serialization and file structure, behind a millimetre canvas
//! - [`theme`] holds the static theme table

#![warn(missing_docs)]

// Error handling
pub mod error;

// Input and configuration
pub mod config;
pub mod note;
pub mod theme;

// Text preprocessing
pub mod emoji;

// PDF objects and writing
pub mod color;
pub mod object;
pub mod writer;

// Layout
pub mod render;

pub use config::{ExportConfig, PageSize};
pub use error::{Error, Result};
pub use note::Note;
pub use render::{export_note, DocumentComposer, ExportedDocument};
pub use theme::{ThemeId, ThemeStyle};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
