//! Storage errors
//!
//! Callers care about three outcomes:
//! - `Io`: the OS refused a file operation. The record file is unchanged
//!   and the operation may be retried.
//! - `Corrupt`: a record failed framing or checksum verification. No
//!   handle on the file can be trusted from here on.
//! - `RecordTooLarge`: a record was refused before anything was written.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{operation} failed for {}: {source}", .path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("corrupt record at byte {offset}: {reason}")]
    Corrupt { offset: u64, reason: String },

    #[error("record for {document_id:?} too large: {field} is {len} bytes, over the u32 length limit")]
    RecordTooLarge {
        document_id: String,
        field: &'static str,
        len: u64,
    },
}

impl StorageError {
    pub fn io(operation: &'static str, path: &Path, source: io::Error) -> Self {
        StorageError::Io {
            operation,
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn corrupt(offset: u64, reason: impl Into<String>) -> Self {
        StorageError::Corrupt {
            offset,
            reason: reason.into(),
        }
    }

    pub fn is_corruption(&self) -> bool {
        matches!(self, StorageError::Corrupt { .. })
    }

    /// Byte offset of the bad record, for corruption.
    pub fn offset(&self) -> Option<u64> {
        match self {
            StorageError::Corrupt { offset, .. } => Some(*offset),
            _ => None,
        }
    }

    /// errno of the failed file operation, if the OS reported one.
    pub fn os_error(&self) -> Option<i32> {
        match self {
            StorageError::Io { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
