//! PDF objects emitted by the writer.
//!
//! Only what a generated note needs is modelled. Dictionaries keep insertion
//! order so `/Type` comes first and output is reproducible.

use indexmap::IndexMap;
use std::fmt;

/// Dictionary entries in insertion order.
pub type Dict = IndexMap<String, Object>;

/// A PDF object.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// Integer
    Integer(i64),
    /// Real number
    Real(f64),
    /// String; bytes are written as given
    String(Vec<u8>),
    /// Name, without the leading `/`
    Name(String),
    /// Array
    Array(Vec<Object>),
    /// Dictionary
    Dictionary(Dict),
    /// Stream; `/Length` is filled in when missing
    Stream {
        /// Stream dictionary
        dict: Dict,
        /// Payload
        data: bytes::Bytes,
    },
    /// Indirect reference
    Reference(ObjectRef),
}

/// Number and generation of an indirect object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    /// Object number
    pub id: u32,
    /// Generation number
    pub gen: u16,
}

impl ObjectRef {
    /// Reference to `id` in generation `gen`.
    pub fn new(id: u32, gen: u16) -> Self {
        Self { id, gen }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} R", self.id, self.gen)
    }
}

impl Object {
    /// `/name`
    pub fn name(name: &str) -> Self {
        Object::Name(name.to_string())
    }

    /// Byte string from ASCII text.
    pub fn literal(text: &str) -> Self {
        Object::String(text.as_bytes().to_vec())
    }

    /// Text string for the information dictionary.
    ///
    /// ASCII is kept as is; anything else becomes UTF-16BE with a byte order
    /// mark.
    pub fn text_string(text: &str) -> Self {
        if text.is_ascii() {
            return Self::literal(text);
        }
        let mut data = vec![0xFE, 0xFF];
        data.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
        Object::String(data)
    }

    /// Reference to generation 0 of `id`.
    pub fn reference(id: u32) -> Self {
        Object::Reference(ObjectRef::new(id, 0))
    }

    /// Dictionary from `(key, value)` pairs, in order.
    pub fn dict<const N: usize>(entries: [(&str, Object); N]) -> Self {
        Object::Dictionary(
            entries
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        )
    }

    /// `[0 0 width height]` box in points.
    pub fn media_box(width: f32, height: f32) -> Self {
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(width as f64),
            Object::Real(height as f64),
        ])
    }

    /// Dictionary entries of a dictionary or stream.
    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Object::Dictionary(dict) | Object::Stream { dict, .. } => Some(dict),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_display() {
        assert_eq!(ObjectRef::new(7, 0).to_string(), "7 0 R");
    }

    #[test]
    fn test_dict_keeps_order() {
        let dict = Object::dict([
            ("Type", Object::name("Page")),
            ("Parent", Object::reference(2)),
            ("Contents", Object::reference(5)),
        ]);
        let keys: Vec<_> = dict.as_dict().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["Type", "Parent", "Contents"]);
    }

    #[test]
    fn test_text_string_encoding() {
        assert_eq!(Object::text_string("Notes"), Object::String(b"Notes".to_vec()));
        assert_eq!(
            Object::text_string("Café"),
            Object::String(vec![0xFE, 0xFF, 0x00, b'C', 0x00, b'a', 0x00, b'f', 0x00, 0xE9])
        );
    }
}
