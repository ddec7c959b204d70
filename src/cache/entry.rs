//! Cache Entry Module
//!
//! Defines the slot stored per cache key and the tagged payload variant.

use crate::models::Document;

// == Cached Value ==
/// Payload stored in the cache, tagged by key family.
///
/// Retrieval discriminates on the variant instead of downcasting an
/// opaque value: `doc:` keys hold `Document`, `list:` keys hold
/// `DocumentList`.
#[derive(Debug, Clone)]
pub enum CachedValue {
    /// A single document
    Document(Document),
    /// An ordered query result
    DocumentList(Vec<Document>),
}

impl CachedValue {
    /// Returns the document if this value holds a single document.
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            CachedValue::Document(doc) => Some(doc),
            CachedValue::DocumentList(_) => None,
        }
    }

    /// Returns the sequence if this value holds a query result.
    pub fn as_document_list(&self) -> Option<&[Document]> {
        match self {
            CachedValue::Document(_) => None,
            CachedValue::DocumentList(docs) => Some(docs),
        }
    }
}

// == Cache Entry ==
/// A single cache slot: the stored value plus eviction metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: CachedValue,
    /// Access counter; the lowest-frequency entry is evicted first
    pub frequency: u64,
    /// Monotone insertion sequence; breaks eviction ties toward the
    /// oldest entry
    pub inserted_seq: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a fresh entry. New entries start at frequency 1; hits and
    /// overwrites increment from there.
    pub fn new(value: CachedValue, inserted_seq: u64) -> Self {
        Self {
            value,
            frequency: 1,
            inserted_seq,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_doc(id: &str) -> Document {
        Document {
            id: id.to_string(),
            name: "sample".to_string(),
            mime: "text/plain".to_string(),
            is_file: false,
            public: false,
            owner_login: "alice".to_string(),
            grant: Vec::new(),
            created_at: Utc::now(),
            json_data: None,
            file_path: None,
        }
    }

    #[test]
    fn test_entry_starts_at_frequency_one() {
        let entry = CacheEntry::new(CachedValue::Document(sample_doc("d1")), 7);
        assert_eq!(entry.frequency, 1);
        assert_eq!(entry.inserted_seq, 7);
    }

    #[test]
    fn test_document_variant_discrimination() {
        let value = CachedValue::Document(sample_doc("d1"));
        assert_eq!(value.as_document().map(|d| d.id.as_str()), Some("d1"));
        assert!(value.as_document_list().is_none());
    }

    #[test]
    fn test_list_variant_discrimination() {
        let value = CachedValue::DocumentList(vec![sample_doc("d1"), sample_doc("d2")]);
        assert!(value.as_document().is_none());
        assert_eq!(value.as_document_list().map(|docs| docs.len()), Some(2));
    }
}
