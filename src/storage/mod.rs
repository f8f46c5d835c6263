//! Document storage for litedoc
//!
//! The record file holds every saved snapshot of every document. It is an
//! append-only file with no in-place updates.
//!
//! # Design Principles
//!
//! - Append-only (no in-place updates)
//! - Checksum-verified on every read
//! - Latest record wins for the same document id
//! - Tombstones mark deletions and are never removed
//! - Several handles may append to the same file; each catches up before use

mod checksum;
mod errors;
mod index;
mod reader;
mod record;
mod writer;

pub use checksum::compute_checksum;
pub use errors::{StorageError, StorageResult};
pub use index::{DocumentIndex, IndexEntry};
pub use reader::StorageReader;
pub use record::DocumentRecord;
pub use writer::{StorageWriter, STORAGE_FILE_NAME};
