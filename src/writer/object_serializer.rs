//! PDF object syntax (ISO 32000-1, 7.3).

use crate::object::{Dict, Object};
use std::io::{self, Write};

/// Writes [`Object`]s in compact PDF syntax.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectSerializer;

impl ObjectSerializer {
    /// Create a serializer.
    pub fn new() -> Self {
        Self
    }

    /// Serialize an object.
    pub fn serialize(&self, obj: &Object) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_object(&mut buf, obj)?;
        Ok(buf)
    }

    /// Serialize `id 0 obj ... endobj`.
    pub fn serialize_indirect(&self, id: u32, obj: &Object) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        writeln!(buf, "{} 0 obj", id)?;
        self.write_object(&mut buf, obj)?;
        buf.extend_from_slice(b"\nendobj\n");
        Ok(buf)
    }

    fn write_object<W: Write>(&self, w: &mut W, obj: &Object) -> io::Result<()> {
        match obj {
            Object::Integer(i) => write!(w, "{}", i),
            Object::Real(r) => w.write_all(format_real(*r).as_bytes()),
            Object::String(bytes) => write_string(w, bytes),
            Object::Name(name) => write_name(w, name),
            Object::Array(items) => {
                w.write_all(b"[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        w.write_all(b" ")?;
                    }
                    self.write_object(w, item)?;
                }
                w.write_all(b"]")
            },
            Object::Dictionary(dict) => self.write_dict(w, dict),
            Object::Stream { dict, data } => {
                if dict.contains_key("Length") {
                    self.write_dict(w, dict)?;
                } else {
                    let mut with_length = dict.clone();
                    with_length.insert("Length".to_string(), Object::Integer(data.len() as i64));
                    self.write_dict(w, &with_length)?;
                }
                w.write_all(b"\nstream\n")?;
                w.write_all(data)?;
                w.write_all(b"\nendstream")
            },
            Object::Reference(r) => write!(w, "{}", r),
        }
    }

    fn write_dict<W: Write>(&self, w: &mut W, dict: &Dict) -> io::Result<()> {
        w.write_all(b"<<")?;
        for (key, value) in dict {
            write_name(w, key)?;
            w.write_all(b" ")?;
            self.write_object(w, value)?;
        }
        w.write_all(b">>")
    }
}

/// Up to three decimals, without trailing zeros.
fn format_real(value: f64) -> String {
    let text = format!("{:.3}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Literal `(...)` for printable ASCII, hex `<...>` otherwise.
fn write_string<W: Write>(w: &mut W, bytes: &[u8]) -> io::Result<()> {
    if bytes.iter().all(|b| (0x20..0x7F).contains(b)) {
        w.write_all(b"(")?;
        for &b in bytes {
            if matches!(b, b'(' | b')' | b'\\') {
                w.write_all(b"\\")?;
            }
            w.write_all(&[b])?;
        }
        w.write_all(b")")
    } else {
        w.write_all(b"<")?;
        for b in bytes {
            write!(w, "{:02X}", b)?;
        }
        w.write_all(b">")
    }
}

/// `/Name`, with delimiters, `#` and non-printing bytes as `#xx`.
fn write_name<W: Write>(w: &mut W, name: &str) -> io::Result<()> {
    w.write_all(b"/")?;
    for b in name.bytes() {
        let regular = (0x21..0x7F).contains(&b) && !b"()<>[]{}/%#".contains(&b);
        if regular {
            w.write_all(&[b])?;
        } else {
            write!(w, "#{:02X}", b)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(obj: &Object) -> String {
        String::from_utf8(ObjectSerializer::new().serialize(obj).unwrap()).unwrap()
    }

    #[test]
    fn test_reals() {
        assert_eq!(format_real(595.2756), "595.276");
        assert_eq!(format_real(842.0), "842");
        assert_eq!(format_real(-0.0001), "0");
    }

    #[test]
    fn test_strings() {
        assert_eq!(text(&Object::literal("a (b) \\c")), "(a \\(b\\) \\\\c)");
        assert_eq!(text(&Object::String(vec![0xFE, 0xFF, 0x00, 0xE9])), "<FEFF00E9>");
    }

    #[test]
    fn test_names_escape_delimiters() {
        assert_eq!(text(&Object::name("Type")), "/Type");
        assert_eq!(text(&Object::name("A B/C")), "/A#20B#2FC");
    }

    #[test]
    fn test_page_dictionary() {
        let page = Object::dict([
            ("Type", Object::name("Page")),
            ("MediaBox", Object::media_box(595.2756, 841.8898)),
            ("Contents", Object::reference(4)),
        ]);
        assert_eq!(
            text(&page),
            "<</Type /Page/MediaBox [0 0 595.276 841.89]/Contents 4 0 R>>"
        );
    }

    #[test]
    fn test_stream_gets_length() {
        let stream = Object::Stream {
            dict: Dict::new(),
            data: bytes::Bytes::from_static(b"BT ET"),
        };
        assert_eq!(text(&stream), "<</Length 5>>\nstream\nBT ET\nendstream");
    }

    #[test]
    fn test_indirect() {
        let bytes = ObjectSerializer::new()
            .serialize_indirect(3, &Object::Integer(42))
            .unwrap();
        assert_eq!(bytes, b"3 0 obj\n42\nendobj\n");
    }
}
