//! litedoc - An embedded JSON document store
//!
//! Documents are ordered maps of typed values. Getters never fail: each one
//! coerces whatever is stored to the requested type. Saved documents are
//! appended as checksummed snapshots to a per-database record file; every
//! fetch decodes a fresh, independent copy.
//!
//! ```ignore
//! use litedoc::{Database, DatabaseConfig, Document, ReadDictionary};
//!
//! let mut db = Database::open("people", DatabaseConfig::new("./data"))?;
//! let mut doc = Document::with_id("ada");
//! doc.set("born", 1815);
//! db.save(&mut doc)?;
//!
//! let copy = db.get_document("ada")?.unwrap();
//! assert_eq!(copy.get_int("born"), 1815);
//! ```

pub mod cli;
pub mod config;
pub mod database;
pub mod document;
pub mod observability;
pub mod storage;
pub mod value;

pub use config::{DatabaseConfig, SyncMode};
pub use database::{Database, DatabaseError, DatabaseResult, ErrorCode, ErrorDomain};
pub use document::Document;
pub use value::{Array, Blob, Dictionary, Fragment, ReadArray, ReadDictionary, Value};
