//! Ordered value sequences.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::blob::Blob;
use super::dictionary::Dictionary;
use super::fragment::Fragment;
use super::value::Value;

/// Positional write outside `0..=count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("array index {index} out of range (count {count})")]
pub struct IndexOutOfRange {
    pub index: usize,
    pub count: usize,
}

/// Typed, total read access by position.
///
/// The positional twin of [`ReadDictionary`](super::ReadDictionary):
/// implementors provide [`ReadArray::value_at`] and every getter follows the
/// same coercion table. An index past the end reads as Null.
pub trait ReadArray {
    /// Raw positional lookup. `Some(&Value::Null)` for a stored null.
    fn value_at(&self, index: usize) -> Option<&Value>;

    /// Item value, or `None` when out of range or null.
    fn get_value(&self, index: usize) -> Option<&Value> {
        self.value_at(index).filter(|v| !v.is_null())
    }

    fn get_int(&self, index: usize) -> i64 {
        self.value_at(index).map_or(0, Value::to_int)
    }

    fn get_float(&self, index: usize) -> f32 {
        self.value_at(index).map_or(0.0, Value::to_float)
    }

    fn get_double(&self, index: usize) -> f64 {
        self.value_at(index).map_or(0.0, Value::to_double)
    }

    fn get_boolean(&self, index: usize) -> bool {
        self.value_at(index).is_some_and(Value::to_bool)
    }

    fn get_string(&self, index: usize) -> Option<&str> {
        self.value_at(index).and_then(Value::as_str)
    }

    fn get_date(&self, index: usize) -> Option<DateTime<Utc>> {
        self.value_at(index).and_then(Value::as_date)
    }

    fn get_dictionary(&self, index: usize) -> Option<&Dictionary> {
        self.value_at(index).and_then(Value::as_dictionary)
    }

    fn get_array(&self, index: usize) -> Option<&Array> {
        self.value_at(index).and_then(Value::as_array)
    }

    fn get_blob(&self, index: usize) -> Option<&Blob> {
        self.value_at(index).and_then(Value::as_blob)
    }

    /// Path access starting at `index`.
    fn fragment(&self, index: usize) -> Fragment<'_> {
        Fragment::new(self.value_at(index))
    }
}

/// Ordered sequence of [`Value`]s.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array {
    items: Vec<Value>,
}

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: impl Into<Value>) {
        self.items.push(value.into());
    }

    /// Inserts at `index`, shifting later items. `index == count` appends.
    pub fn insert(&mut self, index: usize, value: impl Into<Value>) -> Result<(), IndexOutOfRange> {
        if index > self.items.len() {
            return Err(self.out_of_range(index));
        }
        self.items.insert(index, value.into());
        Ok(())
    }

    /// Replaces the item at `index`.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Result<(), IndexOutOfRange> {
        let count = self.items.len();
        match self.items.get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(IndexOutOfRange { index, count }),
        }
    }

    pub fn remove(&mut self, index: usize) -> Result<Value, IndexOutOfRange> {
        if index >= self.items.len() {
            return Err(self.out_of_range(index));
        }
        Ok(self.items.remove(index))
    }

    /// Replaces the whole content.
    pub fn set_array<V: Into<Value>>(&mut self, items: impl IntoIterator<Item = V>) {
        self.items = items.into_iter().map(Into::into).collect();
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }

    pub fn get_dictionary_mut(&mut self, index: usize) -> Option<&mut Dictionary> {
        self.items.get_mut(index).and_then(Value::as_dictionary_mut)
    }

    pub fn get_array_mut(&mut self, index: usize) -> Option<&mut Array> {
        self.items.get_mut(index).and_then(Value::as_array_mut)
    }

    /// Detached copy of the items.
    pub fn to_vec(&self) -> Vec<Value> {
        self.items.clone()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.items.iter().map(Value::to_json).collect())
    }

    fn out_of_range(&self, index: usize) -> IndexOutOfRange {
        IndexOutOfRange {
            index,
            count: self.items.len(),
        }
    }
}

impl ReadArray for Array {
    fn value_at(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }
}

impl<V: Into<Value>> FromIterator<V> for Array {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phones() -> Array {
        let mut array = Array::new();
        array.add("650-123-0001");
        array.add("650-123-0002");
        array
    }

    #[test]
    fn test_add_and_get() {
        let array = phones();
        assert_eq!(array.count(), 2);
        assert_eq!(array.get_string(0), Some("650-123-0001"));
        assert_eq!(array.get_string(1), Some("650-123-0002"));
    }

    #[test]
    fn test_insert_set_remove() {
        let mut array = phones();
        array.insert(0, "650-000-0000").unwrap();
        array.set(2, 42).unwrap();
        assert_eq!(array.get_string(0), Some("650-000-0000"));
        assert_eq!(array.get_int(2), 42);

        let removed = array.remove(1).unwrap();
        assert_eq!(removed, Value::from("650-123-0001"));
        assert_eq!(array.count(), 2);
    }

    #[test]
    fn test_insert_at_end_appends() {
        let mut array = phones();
        array.insert(2, true).unwrap();
        assert!(array.get_boolean(2));
    }

    #[test]
    fn test_out_of_range_writes_fail() {
        let mut array = phones();
        assert_eq!(
            array.set(5, 1),
            Err(IndexOutOfRange { index: 5, count: 2 })
        );
        assert!(array.insert(3, 1).is_err());
        assert!(array.remove(2).is_err());
        assert_eq!(array.count(), 2);
    }

    #[test]
    fn test_out_of_range_reads_as_null() {
        let array = phones();
        assert_eq!(array.get_int(9), 0);
        assert!(!array.get_boolean(9));
        assert!(array.get_value(9).is_none());
        assert!(!array.fragment(9).exists());
    }

    #[test]
    fn test_getters_coerce_like_keyed_getters() {
        let array: Array = vec![
            Value::Null,
            Value::Boolean(true),
            Value::Double(2.75),
            Value::from("2017-01-01T00:00:00.000Z"),
            Value::from(""),
        ]
        .into_iter()
        .collect();

        assert!(array.value_at(0).is_some());
        assert!(array.get_value(0).is_none());
        assert_eq!(array.get_int(1), 1);
        assert_eq!(array.get_int(2), 2);
        assert_eq!(array.get_float(2), 2.75);
        assert!(array.get_date(3).is_some());
        assert!(array.get_date(4).is_none());
        assert!(!array.get_boolean(4));
        assert!(array.get_dictionary(3).is_none());
        assert!(array.get_blob(1).is_none());
    }

    /// A view over a slice gets the whole getter surface from `value_at`.
    struct Window<'a>(&'a [Value]);

    impl ReadArray for Window<'_> {
        fn value_at(&self, index: usize) -> Option<&Value> {
            self.0.get(index)
        }
    }

    #[test]
    fn test_getters_derive_from_value_at() {
        let items = [Value::Integer(7), Value::from("x")];
        let window = Window(&items);
        assert_eq!(window.get_double(0), 7.0);
        assert_eq!(window.get_string(1), Some("x"));
        assert_eq!(window.get_int(2), 0);
        assert!(window.fragment(0).exists());
        assert!(!window.fragment(5).exists());
    }

    #[test]
    fn test_set_array_replaces() {
        let mut array = phones();
        array.set_array(vec![1, 2, 3]);
        assert_eq!(array.count(), 3);
        assert!(array.get_string(0).is_none());
        assert_eq!(array.get_int(2), 3);
    }

    #[test]
    fn test_nested_array_mutation() {
        let mut outer = Array::new();
        outer.add(phones());
        outer.get_array_mut(0).unwrap().add("650-123-0003");
        assert_eq!(outer.get_array(0).unwrap().count(), 3);
    }
}
