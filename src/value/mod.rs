//! Value model for litedoc documents
//!
//! Every field of a document holds a [`Value`], a closed tagged variant over
//! the supported kinds. Reads are total: each typed getter coerces whatever
//! is stored into the requested type and never fails.
//!
//! # Coercion Rules
//!
//! - Float/Double → Integer truncates toward zero
//! - Numbers are true when nonzero (NaN included)
//! - Strings never parse into numbers, but date getters parse ISO-8601 text
//! - Dictionaries, arrays and blobs are truthy and 0/None for everything else
//! - A missing key reads exactly like a stored Null
//!
//! Dates have no dedicated variant. Setting a date stores its canonical
//! `yyyy-MM-dd'T'HH:mm:ss.SSS'Z'` text as a [`Value::String`].

mod array;
mod blob;
mod date;
mod dictionary;
mod fragment;
#[allow(clippy::module_inception)]
mod value;

pub use array::{Array, IndexOutOfRange, ReadArray};
pub use blob::Blob;
pub use date::{format_iso8601, parse_iso8601, truncate_to_millis, ISO8601_FORMAT};
pub use dictionary::{Dictionary, ReadDictionary};
pub use fragment::Fragment;
pub use value::Value;
