//! The note record consumed by the exporter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A note as stored by the notes service.
///
/// JSON uses camelCase keys (`createdAt`, `updatedAt`); `updatedAt` may be
/// absent or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Note title, may be empty
    #[serde(default)]
    pub title: String,
    /// Freeform content in the note dialect
    #[serde(default)]
    pub content: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Note {
    /// Create a note created now.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Set the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Set the modification timestamp.
    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Modification time when it differs from the creation time.
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at.filter(|updated| *updated != self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "title": "Groceries",
            "content": "* milk",
            "createdAt": "2024-05-01T08:00:00Z",
            "updatedAt": "2024-05-02T09:30:00Z"
        }"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.title, "Groceries");
        assert_eq!(note.created_at, Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap());
        assert_eq!(note.updated_at, Some(Utc.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap()));
    }

    #[test]
    fn test_missing_optional_fields() {
        let note: Note = serde_json::from_str(r#"{"createdAt": "2024-05-01T08:00:00Z"}"#).unwrap();
        assert!(note.title.is_empty());
        assert!(note.content.is_empty());
        assert!(note.updated_at.is_none());
    }

    #[test]
    fn test_modified_at_ignores_identical_timestamp() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let note = Note::new("t", "c").with_created_at(created).with_updated_at(created);
        assert!(note.modified_at().is_none());

        let later = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(note.with_updated_at(later).modified_at(), Some(later));
    }
}
