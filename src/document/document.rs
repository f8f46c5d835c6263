//! The document container.

use indexmap::IndexMap;
use uuid::Uuid;

use crate::value::{Array, Dictionary, ReadDictionary, Value};

/// Generates a fresh, non-empty document id.
pub fn generate_document_id() -> String {
    Uuid::new_v4().to_string()
}

/// A persistable collection of typed fields.
///
/// All typed getters come from [`ReadDictionary`] and are total.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    id: String,
    deleted: bool,
    /// Store-wide sequence of the last save or delete; 0 when never saved.
    sequence: u64,
    properties: Dictionary,
}

impl Document {
    /// Empty document with a generated id.
    pub fn new() -> Self {
        Self::with_id(generate_document_id())
    }

    /// Empty document with the given id.
    ///
    /// An empty id is accepted here and rejected when the document is saved.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            deleted: false,
            sequence: 0,
            properties: Dictionary::new(),
        }
    }

    /// `None` behaves exactly like [`Document::new`].
    pub fn with_optional_id<S: Into<String>>(id: Option<S>) -> Self {
        match id {
            Some(id) => Self::with_id(id),
            None => Self::new(),
        }
    }

    /// Document with the given id, populated from a name → value mapping.
    ///
    /// Nested JSON objects and arrays become [`Dictionary`] and [`Array`].
    pub fn with_dictionary<K, V>(
        id: impl Into<String>,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut doc = Self::with_id(id);
        doc.set_dictionary(fields);
        doc
    }

    /// Same as [`Document::with_dictionary`] with a generated id.
    pub fn from_dictionary<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self::with_dictionary(generate_document_id(), fields)
    }

    /// Rebuilds a document from a stored snapshot.
    pub(crate) fn from_snapshot(id: String, sequence: u64, properties: Dictionary) -> Self {
        Self {
            id,
            deleted: false,
            sequence,
            properties,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Inserts or replaces a field.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.properties.set(key, value);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.properties.remove(key)
    }

    /// Replaces every field. Previous fields do not survive.
    pub fn set_dictionary<K, V>(&mut self, fields: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.properties.set_dictionary(fields);
    }

    pub fn count(&self) -> usize {
        self.properties.count()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys()
    }

    pub fn properties(&self) -> &Dictionary {
        &self.properties
    }

    pub fn get_dictionary_mut(&mut self, key: &str) -> Option<&mut Dictionary> {
        self.properties.get_dictionary_mut(key)
    }

    pub fn get_array_mut(&mut self, key: &str) -> Option<&mut Array> {
        self.properties.get_array_mut(key)
    }

    /// Plain copy of the current fields.
    pub fn to_dictionary(&self) -> IndexMap<String, Value> {
        self.properties.to_dictionary()
    }

    pub fn to_json(&self) -> serde_json::Value {
        self.properties.to_json()
    }

    pub(crate) fn has_valid_id(&self) -> bool {
        !self.id.is_empty()
    }

    pub(crate) fn mark_saved(&mut self, sequence: u64) {
        self.sequence = sequence;
        self.deleted = false;
    }

    pub(crate) fn mark_deleted(&mut self, sequence: u64) {
        self.sequence = sequence;
        self.deleted = true;
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadDictionary for Document {
    fn value_for(&self, key: &str) -> Option<&Value> {
        self.properties.value_for(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ReadArray;
    use serde_json::json;

    #[test]
    fn test_new_document_has_generated_id() {
        let doc = Document::new();
        assert!(!doc.id().is_empty());
        assert!(!doc.is_deleted());
        assert_eq!(doc.sequence(), 0);
        assert_eq!(doc.to_dictionary().len(), 0);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(Document::new().id(), Document::new().id());
    }

    #[test]
    fn test_explicit_id() {
        let doc = Document::with_id("doc1");
        assert_eq!(doc.id(), "doc1");
        assert!(doc.has_valid_id());
    }

    #[test]
    fn test_empty_id_constructible_but_invalid() {
        let doc = Document::with_id("");
        assert_eq!(doc.id(), "");
        assert!(!doc.has_valid_id());
    }

    #[test]
    fn test_none_id_generates() {
        let doc = Document::with_optional_id(None::<String>);
        assert!(!doc.id().is_empty());
        let doc = Document::with_optional_id(Some("doc1"));
        assert_eq!(doc.id(), "doc1");
    }

    #[test]
    fn test_with_dictionary_converts_nested() {
        let fields = json!({
            "name": "Scott Tiger",
            "age": 30,
            "address": {"street": "1 Main street.", "city": "Mountain View", "state": "CA"},
            "phones": ["650-123-0001", "650-123-0002"]
        });
        let doc = Document::with_dictionary("doc1", fields.as_object().cloned().unwrap());
        assert_eq!(doc.get_string("name"), Some("Scott Tiger"));
        assert_eq!(doc.get_int("age"), 30);
        assert_eq!(
            doc.get_dictionary("address").unwrap().get_string("state"),
            Some("CA")
        );
        assert_eq!(doc.get_array("phones").unwrap().get_string(0), Some("650-123-0001"));
        assert_eq!(doc.to_json(), fields);
    }

    #[test]
    fn test_set_dictionary_full_replace() {
        let mut doc = Document::with_dictionary("doc1", [("name", "Scott Tiger"), ("city", "MV")]);
        doc.set_dictionary([("nickname", "Daniel")]);
        let keys: Vec<_> = doc.keys().collect();
        assert_eq!(keys, vec!["nickname"]);
    }

    #[test]
    fn test_nested_mutation_through_document() {
        let mut doc = Document::with_id("doc1");
        let mut phones = Array::new();
        phones.add("650-123-0001");
        doc.set("phones", phones);
        doc.get_array_mut("phones").unwrap().add("650-123-0002");
        assert_eq!(doc.get_array("phones").unwrap().count(), 2);
    }

    #[test]
    fn test_mark_deleted() {
        let mut doc = Document::with_id("doc1");
        doc.mark_deleted(4);
        assert!(doc.is_deleted());
        assert_eq!(doc.sequence(), 4);
    }
}
