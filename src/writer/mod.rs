//! PDF writing module.
//!
//! ## Architecture
//!
//! ```text
//! renderers (mm, top-left origin)
//!     ↓
//! [PdfCanvas] (unit conversion, current font/colors, page switching)
//!     ↓
//! [ContentStreamBuilder] (per-page operators)
//!     ↓
//! [PdfWriter] (assembles complete PDF structure)
//!     ↓
//! [ObjectSerializer] (serializes PDF objects)
//!     ↓
//! PDF bytes
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use notepress::writer::{PdfCanvas, PdfWriterConfig};
//!
//! let mut canvas = PdfCanvas::new(210.0, 297.0, PdfWriterConfig::default())?;
//! canvas.set_font("Helvetica-Bold", 18.0)?;
//! canvas.text("Hello, World!", 20.0, 30.0)?;
//! let bytes = canvas.finish()?;
//! ```

mod canvas;
mod content_stream;
mod font_manager;
mod object_serializer;
mod pdf_writer;

pub use canvas::{PaintStyle, PdfCanvas, ShownText, PT_PER_MM};
pub use content_stream::{ContentStreamBuilder, ContentStreamOp};
pub use font_manager::{encode_win_ansi, FontFamily, FontInfo, FontManager, FontWeight, TextLayout};
pub use object_serializer::ObjectSerializer;
pub use pdf_writer::{PdfWriter, PdfWriterConfig};
