//! Database error types
//!
//! Every error carries a domain and a stable numeric code so callers can
//! branch on them without matching messages:
//!
//! | Code | Domain   | Meaning                               |
//! |------|----------|---------------------------------------|
//! | 7    | LiteCore | Document not found                    |
//! | 9    | LiteCore | Invalid parameter or configuration    |
//! | 11   | LiteCore | Database file could not be opened     |
//! | 12   | LiteCore | I/O failure without an OS error code  |
//! | 15   | LiteCore | Corrupt record file or document body  |
//! | 38   | LiteCore | Bad document ID                       |
//! | *    | POSIX    | errno of the failed I/O call          |

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::document::CodecError;
use crate::storage::StorageError;

/// Namespace of an error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDomain {
    LiteCore,
    Posix,
}

impl ErrorDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorDomain::LiteCore => "LiteCore",
            ErrorDomain::Posix => "POSIX",
        }
    }
}

impl fmt::Display for ErrorDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stable codes in the `LiteCore` domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    NotFound = 7,
    InvalidParameter = 9,
    CantOpenFile = 11,
    IoError = 12,
    CorruptData = 15,
    BadDocId = 38,
}

impl ErrorCode {
    pub fn code(&self) -> i32 {
        *self as i32
    }
}

#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Save or delete of a document whose id is empty.
    #[error("bad document ID: {0:?}")]
    InvalidDocumentId(String),

    #[error("document not found: {0}")]
    NotFound(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("cannot open database at {path}: {source}")]
    CantOpen {
        path: PathBuf,
        #[source]
        source: StorageError,
    },

    #[error("invalid body for document {document_id}: {source}")]
    InvalidBody {
        document_id: String,
        #[source]
        source: CodecError,
    },

    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Config(#[from] ConfigError),
}

impl DatabaseError {
    pub fn domain(&self) -> ErrorDomain {
        match self.os_error() {
            Some(_) => ErrorDomain::Posix,
            None => ErrorDomain::LiteCore,
        }
    }

    /// Numeric code within [`DatabaseError::domain`].
    pub fn code(&self) -> i32 {
        match self.os_error() {
            Some(errno) => errno,
            None => self.error_code().code(),
        }
    }

    /// Closest `LiteCore` code, even for errors reported in the POSIX domain.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            DatabaseError::InvalidDocumentId(_) => ErrorCode::BadDocId,
            DatabaseError::NotFound(_) => ErrorCode::NotFound,
            DatabaseError::InvalidParameter(_) | DatabaseError::Config(_) => {
                ErrorCode::InvalidParameter
            }
            DatabaseError::CantOpen { .. } => ErrorCode::CantOpenFile,
            DatabaseError::InvalidBody { .. } => ErrorCode::CorruptData,
            DatabaseError::Storage(e) => match e {
                StorageError::Corrupt { .. } => ErrorCode::CorruptData,
                StorageError::RecordTooLarge { .. } => ErrorCode::InvalidParameter,
                StorageError::Io { .. } => ErrorCode::IoError,
            },
            DatabaseError::Io(_) => ErrorCode::IoError,
        }
    }

    /// Whether the database file can no longer be trusted.
    pub fn is_fatal(&self) -> bool {
        self.error_code() == ErrorCode::CorruptData
    }

    fn os_error(&self) -> Option<i32> {
        match self {
            DatabaseError::Storage(e) | DatabaseError::CantOpen { source: e, .. } => e.os_error(),
            DatabaseError::Io(e) => e.raw_os_error(),
            _ => None,
        }
    }
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_doc_id_code() {
        let err = DatabaseError::InvalidDocumentId(String::new());
        assert_eq!(err.domain(), ErrorDomain::LiteCore);
        assert_eq!(err.domain().as_str(), "LiteCore");
        assert_eq!(err.code(), 38);
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_corruption_is_fatal() {
        let err = DatabaseError::from(StorageError::corrupt(96, "checksum mismatch"));
        assert_eq!(err.code(), ErrorCode::CorruptData.code());
        assert!(err.is_fatal());
    }

    #[test]
    fn test_oversized_record_is_invalid_parameter() {
        let err = DatabaseError::from(StorageError::RecordTooLarge {
            document_id: "doc1".into(),
            field: "body",
            len: 1 << 33,
        });
        assert_eq!(err.domain(), ErrorDomain::LiteCore);
        assert_eq!(err.code(), 9);
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_storage_io_uses_posix_domain() {
        let err = DatabaseError::from(StorageError::io(
            "append",
            std::path::Path::new("/data/db.litedoc/documents.dat"),
            io::Error::from_raw_os_error(28),
        ));
        assert_eq!(err.domain(), ErrorDomain::Posix);
        assert_eq!(err.code(), 28);
        assert_eq!(err.error_code(), ErrorCode::IoError);
    }

    #[test]
    fn test_os_errors_use_posix_domain() {
        let err = DatabaseError::from(io::Error::from_raw_os_error(13));
        assert_eq!(err.domain(), ErrorDomain::Posix);
        assert_eq!(err.code(), 13);
        assert_eq!(err.error_code(), ErrorCode::IoError);
    }

    #[test]
    fn test_cant_open_without_errno() {
        let err = DatabaseError::CantOpen {
            path: PathBuf::from("/nowhere/db.litedoc"),
            source: StorageError::corrupt(0, "unreadable header"),
        };
        assert_eq!(err.domain(), ErrorDomain::LiteCore);
        assert_eq!(err.code(), 11);
    }

    #[test]
    fn test_io_without_errno_stays_in_core_domain() {
        let err = DatabaseError::from(io::Error::new(io::ErrorKind::Other, "boom"));
        assert_eq!(err.domain(), ErrorDomain::LiteCore);
        assert_eq!(err.code(), 12);
    }
}
