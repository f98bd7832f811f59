//! PDF document writer.
//!
//! Assembles complete PDF documents with proper structure:
//! header, body, xref table, and trailer.

use super::content_stream::ContentStreamBuilder;
use super::object_serializer::ObjectSerializer;
use crate::error::Result;
use crate::object::{Dict, Object};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::io::Write;

/// Configuration for PDF generation.
#[derive(Debug, Clone)]
pub struct PdfWriterConfig {
    /// PDF version (e.g., "1.7")
    pub version: String,
    /// Document title
    pub title: Option<String>,
    /// Creator application
    pub creator: Option<String>,
    /// Creation date written to the Info dictionary
    pub creation_date: Option<DateTime<Utc>>,
    /// Whether to compress content streams with FlateDecode
    pub compress: bool,
}

impl Default for PdfWriterConfig {
    fn default() -> Self {
        Self {
            version: "1.7".to_string(),
            title: None,
            creator: Some("notepress".to_string()),
            creation_date: None,
            compress: false,
        }
    }
}

impl PdfWriterConfig {
    /// Set document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the creator application; `None` omits `/Creator`.
    pub fn with_creator(mut self, creator: Option<String>) -> Self {
        self.creator = creator;
        self
    }

    /// Set the creation date.
    pub fn with_creation_date(mut self, date: DateTime<Utc>) -> Self {
        self.creation_date = Some(date);
        self
    }

    /// Enable or disable stream compression.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

/// Compress data using Flate/Deflate compression.
fn compress_data(data: &[u8]) -> std::io::Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Format a date as a PDF date string (ISO 32000-1, 7.9.4).
fn pdf_date(date: &DateTime<Utc>) -> String {
    format!("D:{}Z", date.format("%Y%m%d%H%M%S"))
}

/// Object numbers in write order: catalog, page tree, fonts, one
/// (page, contents) pair per page, then the information dictionary.
struct ObjectIds {
    catalog: u32,
    pages: u32,
    first_font: u32,
    first_page: u32,
    info: u32,
}

impl ObjectIds {
    fn new(fonts: usize, pages: usize) -> Self {
        let first_font = 3;
        let first_page = first_font + fonts as u32;
        Self {
            catalog: 1,
            pages: 2,
            first_font,
            first_page,
            info: first_page + 2 * pages as u32,
        }
    }

    fn font(&self, index: usize) -> u32 {
        self.first_font + index as u32
    }

    fn page(&self, index: usize) -> u32 {
        self.first_page + 2 * index as u32
    }

    /// Entries in the xref table, including object 0.
    fn size(&self) -> u32 {
        self.info + 1
    }
}

/// Internal page data.
#[derive(Debug, Clone)]
struct PageData {
    width: f32,
    height: f32,
    content: ContentStreamBuilder,
}

/// PDF document writer.
///
/// Pages are added up front and drawn into through their content builders;
/// `finish` lays out the objects in order and writes the cross-reference
/// table.
#[derive(Debug, Clone)]
pub struct PdfWriter {
    config: PdfWriterConfig,
    pages: Vec<PageData>,
    /// Base font name -> resource name (F1, F2, ...), in first-use order
    fonts: IndexMap<String, String>,
}

impl PdfWriter {
    /// Create a new PDF writer with default config.
    pub fn new() -> Self {
        Self::with_config(PdfWriterConfig::default())
    }

    /// Create a PDF writer with custom config.
    pub fn with_config(config: PdfWriterConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
            fonts: IndexMap::new(),
        }
    }

    /// Add a page with the given dimensions in points, returning its index.
    pub fn add_page(&mut self, width: f32, height: f32) -> usize {
        self.pages.push(PageData {
            width,
            height,
            content: ContentStreamBuilder::new(),
        });
        self.pages.len() - 1
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Content builder of a page.
    pub fn page_content(&self, index: usize) -> Option<&ContentStreamBuilder> {
        self.pages.get(index).map(|p| &p.content)
    }

    /// Mutable content builder of a page.
    pub fn page_content_mut(&mut self, index: usize) -> Option<&mut ContentStreamBuilder> {
        self.pages.get_mut(index).map(|p| &mut p.content)
    }

    /// Resource name for a Base-14 font, registering it on first use.
    pub fn font_resource(&mut self, base_font: &str) -> String {
        if let Some(resource) = self.fonts.get(base_font) {
            return resource.clone();
        }
        let resource = format!("F{}", self.fonts.len() + 1);
        self.fonts.insert(base_font.to_string(), resource.clone());
        resource
    }

    /// Base font registered under a resource name.
    pub fn base_font(&self, resource: &str) -> Option<&str> {
        self.fonts
            .iter()
            .find(|(_, r)| r.as_str() == resource)
            .map(|(base, _)| base.as_str())
    }

    /// Build the complete PDF document.
    pub fn finish(self) -> Result<Vec<u8>> {
        let ids = ObjectIds::new(self.fonts.len(), self.pages.len());
        let objects = self.build_objects(&ids)?;
        let serializer = ObjectSerializer::new();

        let mut output = Vec::new();
        writeln!(output, "%PDF-{}", self.config.version)?;
        // Binary marker (recommended for binary content)
        output.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

        let mut offsets = Vec::with_capacity(objects.len());
        for (id, obj) in &objects {
            offsets.push(output.len());
            output.extend_from_slice(&serializer.serialize_indirect(*id, obj)?);
        }

        let xref_start = output.len();
        write!(output, "xref\n0 {}\n0000000000 65535 f \n", ids.size())?;
        for offset in &offsets {
            writeln!(output, "{:010} 00000 n ", offset)?;
        }

        let trailer = Object::dict([
            ("Size", Object::Integer(ids.size() as i64)),
            ("Root", Object::reference(ids.catalog)),
            ("Info", Object::reference(ids.info)),
        ]);
        output.extend_from_slice(b"trailer\n");
        output.extend_from_slice(&serializer.serialize(&trailer)?);
        write!(output, "\nstartxref\n{}\n%%EOF", xref_start)?;

        log::debug!(
            "Wrote PDF: {} pages, {} fonts, {} bytes",
            self.pages.len(),
            self.fonts.len(),
            output.len()
        );
        Ok(output)
    }

    /// Every indirect object, in id order.
    fn build_objects(&self, ids: &ObjectIds) -> Result<Vec<(u32, Object)>> {
        let mut objects = Vec::with_capacity(ids.size() as usize - 1);

        objects.push((
            ids.catalog,
            Object::dict([
                ("Type", Object::name("Catalog")),
                ("Pages", Object::reference(ids.pages)),
            ]),
        ));
        let kids = (0..self.pages.len())
            .map(|i| Object::reference(ids.page(i)))
            .collect();
        objects.push((
            ids.pages,
            Object::dict([
                ("Type", Object::name("Pages")),
                ("Kids", Object::Array(kids)),
                ("Count", Object::Integer(self.pages.len() as i64)),
            ]),
        ));

        let mut font_dict = Dict::new();
        for (i, (base_font, resource)) in self.fonts.iter().enumerate() {
            font_dict.insert(resource.clone(), Object::reference(ids.font(i)));
            objects.push((
                ids.font(i),
                Object::dict([
                    ("Type", Object::name("Font")),
                    ("Subtype", Object::name("Type1")),
                    ("BaseFont", Object::name(base_font)),
                    ("Encoding", Object::name("WinAnsiEncoding")),
                ]),
            ));
        }

        for (i, page) in self.pages.iter().enumerate() {
            let page_id = ids.page(i);
            objects.push((
                page_id,
                Object::dict([
                    ("Type", Object::name("Page")),
                    ("Parent", Object::reference(ids.pages)),
                    ("MediaBox", Object::media_box(page.width, page.height)),
                    ("Resources", Object::dict([("Font", Object::Dictionary(font_dict.clone()))])),
                    ("Contents", Object::reference(page_id + 1)),
                ]),
            ));
            objects.push((page_id + 1, self.content_stream(page)?));
        }

        let mut info = Dict::new();
        info.insert("Producer".to_string(), Object::literal(crate::NAME));
        if let Some(title) = &self.config.title {
            info.insert("Title".to_string(), Object::text_string(title));
        }
        if let Some(creator) = &self.config.creator {
            info.insert("Creator".to_string(), Object::text_string(creator));
        }
        if let Some(date) = &self.config.creation_date {
            info.insert("CreationDate".to_string(), Object::literal(&pdf_date(date)));
        }
        objects.push((ids.info, Object::Dictionary(info)));

        Ok(objects)
    }

    /// Page content as a stream object, deflated when configured.
    fn content_stream(&self, page: &PageData) -> Result<Object> {
        let raw = page.content.build()?;
        let mut dict = Dict::new();
        let data = if self.config.compress {
            match compress_data(&raw) {
                Ok(packed) => {
                    dict.insert("Filter".to_string(), Object::name("FlateDecode"));
                    packed
                },
                Err(e) => {
                    log::warn!("Content stream compression failed, writing uncompressed: {}", e);
                    raw
                },
            }
        } else {
            raw
        };
        Ok(Object::Stream {
            dict,
            data: bytes::Bytes::from(data),
        })
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn as_text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).to_string()
    }

    #[test]
    fn test_create_empty_pdf() {
        let mut writer = PdfWriter::new();
        writer.add_page(595.28, 841.89);
        let content = as_text(&writer.finish().unwrap());

        assert!(content.starts_with("%PDF-1.7"));
        assert!(content.contains("/Type /Catalog"));
        assert!(content.contains("/Type /Pages"));
        assert!(content.contains("/Type /Page"));
        assert!(content.contains("/Count 1"));
        assert!(content.ends_with("%%EOF"));
    }

    #[test]
    fn test_font_resources_match_content() {
        let mut writer = PdfWriter::new();
        let page = writer.add_page(612.0, 792.0);
        let regular = writer.font_resource("Helvetica");
        let bold = writer.font_resource("Helvetica-Bold");
        assert_eq!(regular, "F1");
        assert_eq!(bold, "F2");
        assert_eq!(writer.font_resource("Helvetica"), "F1");

        writer
            .page_content_mut(page)
            .unwrap()
            .set_font(&bold, 12.0)
            .text("Hello, World!", 72.0, 720.0)
            .end_text();

        let content = as_text(&writer.finish().unwrap());
        assert!(content.contains("/BaseFont /Helvetica-Bold"));
        assert!(content.contains("/F2 4 0 R"));
        assert!(content.contains("/F2 12 Tf"));
        assert!(content.contains("(Hello, World!) Tj"));
    }

    #[test]
    fn test_metadata() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap();
        let config = PdfWriterConfig::default()
            .with_title("Weekly notes")
            .with_creation_date(date);
        let mut writer = PdfWriter::with_config(config);
        writer.add_page(612.0, 792.0);

        let content = as_text(&writer.finish().unwrap());
        assert!(content.contains("/Title (Weekly notes)"));
        assert!(content.contains("/CreationDate (D:20240305143000Z)"));
        assert!(content.contains("/Creator (notepress)"));
    }

    #[test]
    fn test_creator_can_be_omitted() {
        let mut writer = PdfWriter::with_config(PdfWriterConfig::default().with_creator(None));
        writer.add_page(612.0, 792.0);
        let content = as_text(&writer.finish().unwrap());
        assert!(!content.contains("/Creator"));
        assert!(content.contains("/Producer (notepress)"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let mut writer = PdfWriter::new();
        writer.add_page(612.0, 792.0);
        writer.add_page(612.0, 792.0);
        let bytes = writer.finish().unwrap();
        let content = as_text(&bytes);

        let xref_pos = content.find("xref\n").unwrap();
        let entries: Vec<usize> = content[xref_pos..]
            .lines()
            .skip(3)
            .take_while(|l| l.ends_with(" n "))
            .map(|l| l[..10].parse().unwrap())
            .collect();
        // catalog, pages, 2 x (page, contents), info
        assert_eq!(entries.len(), 7);
        // Offsets are byte positions; the binary marker shifts the lossy text.
        for (i, offset) in entries.iter().enumerate() {
            let expected = format!("{} 0 obj", i + 1);
            assert!(bytes[*offset..].starts_with(expected.as_bytes()));
        }
    }

    #[test]
    fn test_compressed_stream() {
        use flate2::read::ZlibDecoder;
        use std::io::Read;

        let mut writer = PdfWriter::with_config(PdfWriterConfig::default().with_compress(true));
        let page = writer.add_page(612.0, 792.0);
        let font = writer.font_resource("Courier");
        writer
            .page_content_mut(page)
            .unwrap()
            .set_font(&font, 9.0)
            .text("compressed text", 10.0, 10.0);
        let raw = writer.page_content(page).unwrap().build().unwrap();

        let bytes = writer.finish().unwrap();
        assert!(as_text(&bytes).contains("/Filter /FlateDecode"));

        let start = find(&bytes, b"stream\n").unwrap() + b"stream\n".len();
        let end = find(&bytes, b"\nendstream").unwrap();
        let mut inflated = Vec::new();
        ZlibDecoder::new(&bytes[start..end])
            .read_to_end(&mut inflated)
            .unwrap();
        assert_eq!(inflated, raw);
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }
}
