//! Documents: an id, a deleted flag, a sequence and an ordered set of fields
//!
//! A [`Document`] is an owned value. Fetching the same id twice yields two
//! independent documents; nothing is cached and no instance is shared.
//!
//! The body codec turns the field set into the bytes stored in a record and
//! back, preserving the exact variant and bit pattern of every value.

mod codec;
#[allow(clippy::module_inception)]
mod document;

pub use codec::{decode_properties, encode_properties, CodecError};
pub use document::{generate_document_id, Document};
