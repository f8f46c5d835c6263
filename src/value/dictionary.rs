//! Keyed containers and the shared typed-getter surface.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use super::array::Array;
use super::blob::Blob;
use super::fragment::Fragment;
use super::value::Value;

/// Typed, total read access to a keyed container.
///
/// Implementors only provide [`ReadDictionary::value_for`]; every getter is
/// derived from it through the coercion functions on [`Value`]. A missing key
/// reads the same as a key holding Null.
pub trait ReadDictionary {
    /// Raw lookup. `Some(&Value::Null)` for an explicitly stored null.
    fn value_for(&self, key: &str) -> Option<&Value>;

    /// Field value, or `None` when missing or null.
    fn get_value(&self, key: &str) -> Option<&Value> {
        self.value_for(key).filter(|v| !v.is_null())
    }

    fn contains(&self, key: &str) -> bool {
        self.value_for(key).is_some()
    }

    fn get_int(&self, key: &str) -> i64 {
        self.value_for(key).map_or(0, Value::to_int)
    }

    fn get_float(&self, key: &str) -> f32 {
        self.value_for(key).map_or(0.0, Value::to_float)
    }

    fn get_double(&self, key: &str) -> f64 {
        self.value_for(key).map_or(0.0, Value::to_double)
    }

    fn get_boolean(&self, key: &str) -> bool {
        self.value_for(key).is_some_and(Value::to_bool)
    }

    fn get_string(&self, key: &str) -> Option<&str> {
        self.value_for(key).and_then(Value::as_str)
    }

    fn get_date(&self, key: &str) -> Option<DateTime<Utc>> {
        self.value_for(key).and_then(Value::as_date)
    }

    fn get_dictionary(&self, key: &str) -> Option<&Dictionary> {
        self.value_for(key).and_then(Value::as_dictionary)
    }

    fn get_array(&self, key: &str) -> Option<&Array> {
        self.value_for(key).and_then(Value::as_array)
    }

    fn get_blob(&self, key: &str) -> Option<&Blob> {
        self.value_for(key).and_then(Value::as_blob)
    }

    /// Path access starting at `key`.
    fn fragment(&self, key: &str) -> Fragment<'_> {
        Fragment::new(self.value_for(key))
    }
}

/// Insertion-ordered map from field name to [`Value`].
///
/// Equality compares as maps: two dictionaries with the same entries in a
/// different order are equal.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dictionary {
    entries: IndexMap<String, Value>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a field. A replaced key keeps its position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Removes a field, preserving the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Replaces every field with the given entries. Nothing is merged.
    pub fn set_dictionary<K, V>(&mut self, entries: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    pub fn get_dictionary_mut(&mut self, key: &str) -> Option<&mut Dictionary> {
        self.entries.get_mut(key).and_then(Value::as_dictionary_mut)
    }

    pub fn get_array_mut(&mut self, key: &str) -> Option<&mut Array> {
        self.entries.get_mut(key).and_then(Value::as_array_mut)
    }

    /// Detached copy of the entries.
    pub fn to_dictionary(&self) -> IndexMap<String, Value> {
        self.entries.clone()
    }

    pub fn into_entries(self) -> IndexMap<String, Value> {
        self.entries
    }

    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}

impl ReadDictionary for Dictionary {
    fn value_for(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<IndexMap<String, Value>> for Dictionary {
    fn from(entries: IndexMap<String, Value>) -> Self {
        Self { entries }
    }
}
