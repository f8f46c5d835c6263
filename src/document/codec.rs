//! Document body codec
//!
//! The body of a stored record is a JSON array of `[name, value]` pairs.
//! Each value carries an explicit tag so the variant survives a round trip:
//!
//! ```text
//! [["age",{"t":"i","v":30}],["ratio",{"t":"f","v":1066192077}]]
//! ```
//!
//! - Float and Double are stored as IEEE bit patterns (bit-exact, NaN safe)
//! - Blob content is standard base64
//! - Field order is preserved

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value::{Array, Blob, Dictionary, Value};

/// Body encode/decode failure.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid document body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid blob content: {0}")]
    Base64(#[from] base64::DecodeError),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "t", content = "v")]
enum StoredValue {
    #[serde(rename = "n")]
    Null,
    #[serde(rename = "b")]
    Boolean(bool),
    #[serde(rename = "i")]
    Integer(i64),
    #[serde(rename = "f")]
    Float(u32),
    #[serde(rename = "d")]
    Double(u64),
    #[serde(rename = "s")]
    String(String),
    #[serde(rename = "m")]
    Dictionary(Vec<(String, StoredValue)>),
    #[serde(rename = "a")]
    Array(Vec<StoredValue>),
    #[serde(rename = "x")]
    Blob { content_type: String, data: String },
}

impl From<&Value> for StoredValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => StoredValue::Null,
            Value::Boolean(b) => StoredValue::Boolean(*b),
            Value::Integer(i) => StoredValue::Integer(*i),
            Value::Float(f) => StoredValue::Float(f.to_bits()),
            Value::Double(d) => StoredValue::Double(d.to_bits()),
            Value::String(s) => StoredValue::String(s.clone()),
            Value::Dictionary(d) => StoredValue::Dictionary(stored_entries(d)),
            Value::Array(a) => StoredValue::Array(a.iter().map(StoredValue::from).collect()),
            Value::Blob(b) => StoredValue::Blob {
                content_type: b.content_type().to_string(),
                data: STANDARD.encode(b.content()),
            },
        }
    }
}

impl TryFrom<StoredValue> for Value {
    type Error = CodecError;

    fn try_from(stored: StoredValue) -> Result<Self, Self::Error> {
        Ok(match stored {
            StoredValue::Null => Value::Null,
            StoredValue::Boolean(b) => Value::Boolean(b),
            StoredValue::Integer(i) => Value::Integer(i),
            StoredValue::Float(bits) => Value::Float(f32::from_bits(bits)),
            StoredValue::Double(bits) => Value::Double(f64::from_bits(bits)),
            StoredValue::String(s) => Value::String(s),
            StoredValue::Dictionary(entries) => Value::Dictionary(dictionary_from(entries)?),
            StoredValue::Array(items) => {
                let items = items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Value::Array(items.into_iter().collect::<Array>())
            }
            StoredValue::Blob { content_type, data } => {
                Value::Blob(Blob::new(content_type, STANDARD.decode(data)?))
            }
        })
    }
}

fn stored_entries(dict: &Dictionary) -> Vec<(String, StoredValue)> {
    dict.iter()
        .map(|(k, v)| (k.to_string(), StoredValue::from(v)))
        .collect()
}

fn dictionary_from(entries: Vec<(String, StoredValue)>) -> Result<Dictionary, CodecError> {
    let mut dict = Dictionary::new();
    for (key, stored) in entries {
        dict.set(key, Value::try_from(stored)?);
    }
    Ok(dict)
}

/// Serializes a field set into a record body.
pub fn encode_properties(properties: &Dictionary) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec(&stored_entries(properties))?)
}

/// Parses a record body back into a field set.
///
/// An empty body (tombstone) decodes to an empty dictionary.
pub fn decode_properties(body: &[u8]) -> Result<Dictionary, CodecError> {
    if body.is_empty() {
        return Ok(Dictionary::new());
    }
    let entries: Vec<(String, StoredValue)> = serde_json::from_slice(body)?;
    dictionary_from(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ReadDictionary;

    fn roundtrip(dict: &Dictionary) -> Dictionary {
        decode_properties(&encode_properties(dict).unwrap()).unwrap()
    }

    #[test]
    fn test_numeric_limits_bit_exact() {
        let mut dict = Dictionary::new();
        dict.set("min_int", i64::MIN);
        dict.set("max_int", i64::MAX);
        dict.set("min_float", f32::MIN_POSITIVE);
        dict.set("max_float", f32::MAX);
        dict.set("min_double", f64::MIN_POSITIVE);
        dict.set("max_double", f64::MAX);
        dict.set("nan", f64::NAN);

        let back = roundtrip(&dict);
        assert_eq!(back.get_int("min_int"), i64::MIN);
        assert_eq!(back.get_int("max_int"), i64::MAX);
        assert_eq!(back.value_for("min_float"), Some(&Value::Float(f32::MIN_POSITIVE)));
        assert_eq!(back.value_for("max_float"), Some(&Value::Float(f32::MAX)));
        assert_eq!(back.get_double("min_double").to_bits(), f64::MIN_POSITIVE.to_bits());
        assert_eq!(back.get_double("max_double").to_bits(), f64::MAX.to_bits());
        assert!(back.get_double("nan").is_nan());
    }

    #[test]
    fn test_variants_preserved() {
        let mut dict = Dictionary::new();
        dict.set("null", Value::Null);
        dict.set("float", 1.5f32);
        dict.set("double", 1.5f64);
        dict.set("blob", Blob::new("text/plain", "i'm blob"));
        let mut nested = Dictionary::new();
        nested.set("list", vec![1, 2]);
        dict.set("nested", nested);

        let back = roundtrip(&dict);
        assert_eq!(back, dict);
        assert_eq!(back.value_for("null"), Some(&Value::Null));
        assert!(matches!(back.value_for("float"), Some(Value::Float(_))));
        assert!(matches!(back.value_for("double"), Some(Value::Double(_))));
        assert_eq!(back.get_blob("blob").unwrap().content(), b"i'm blob");
    }

    #[test]
    fn test_order_preserved() {
        let dict: Dictionary = [("z", 1), ("a", 2), ("m", 3)].into_iter().collect();
        let keys: Vec<_> = roundtrip(&dict).keys().map(str::to_string).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_empty_body_is_empty_dictionary() {
        assert!(decode_properties(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(decode_properties(b"not json"), Err(CodecError::Json(_))));
        let bad_blob = br#"[["b",{"t":"x","v":{"content_type":"a","data":"***"}}]]"#;
        assert!(matches!(decode_properties(bad_blob), Err(CodecError::Base64(_))));
    }
}
