//! Path access into nested values.
//!
//! ```ignore
//! let city = doc.fragment("address").get("city").string();
//! let first = doc.fragment("phones").at(0).string();
//! ```
//!
//! A step that does not resolve produces an empty fragment, and an empty
//! fragment coerces exactly like Null.

use chrono::{DateTime, Utc};

use super::array::{Array, ReadArray};
use super::blob::Blob;
use super::dictionary::{Dictionary, ReadDictionary};
use super::value::Value;

/// Read-only view on a value that may not exist.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fragment<'a> {
    value: Option<&'a Value>,
}

impl<'a> Fragment<'a> {
    pub(crate) fn new(value: Option<&'a Value>) -> Self {
        Self { value }
    }

    /// Whether the path resolved to a stored value (a stored null counts).
    pub fn exists(&self) -> bool {
        self.value.is_some()
    }

    /// Steps into a dictionary by key.
    pub fn get(&self, key: &str) -> Fragment<'a> {
        let next = match self.value {
            Some(Value::Dictionary(dict)) => dict.value_for(key),
            _ => None,
        };
        Fragment::new(next)
    }

    /// Steps into an array by index.
    pub fn at(&self, index: usize) -> Fragment<'a> {
        let next = match self.value {
            Some(Value::Array(array)) => array.value_at(index),
            _ => None,
        };
        Fragment::new(next)
    }

    pub fn value(&self) -> Option<&'a Value> {
        self.value.filter(|v| !v.is_null())
    }

    pub fn int(&self) -> i64 {
        self.value.map_or(0, Value::to_int)
    }

    pub fn float(&self) -> f32 {
        self.value.map_or(0.0, Value::to_float)
    }

    pub fn double(&self) -> f64 {
        self.value.map_or(0.0, Value::to_double)
    }

    pub fn boolean(&self) -> bool {
        self.value.is_some_and(Value::to_bool)
    }

    pub fn string(&self) -> Option<&'a str> {
        self.value.and_then(Value::as_str)
    }

    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.value.and_then(Value::as_date)
    }

    pub fn dictionary(&self) -> Option<&'a Dictionary> {
        self.value.and_then(Value::as_dictionary)
    }

    pub fn array(&self) -> Option<&'a Array> {
        self.value.and_then(Value::as_array)
    }

    pub fn blob(&self) -> Option<&'a Blob> {
        self.value.and_then(Value::as_blob)
    }
}
