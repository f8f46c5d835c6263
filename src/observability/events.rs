//! Lifecycle events
//!
//! Every log line names exactly one of these events.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Database lifecycle
    /// Database handle opened
    DatabaseOpen,
    /// Database handle closed
    DatabaseClose,
    /// Database files removed
    DatabaseDeleted,
    /// Configuration loaded
    ConfigLoaded,

    // Documents
    /// Document snapshot written
    DocumentSaved,
    /// Tombstone written
    DocumentDeleted,
    /// Save or delete refused (bad id, missing document)
    DocumentRejected,

    // Batches
    /// Batch started, fsync deferred
    BatchBegin,
    /// Batch finished and synced
    BatchCommit,
    /// Documents imported from JSON lines
    ImportComplete,

    // Storage
    /// Records appended by another handle were indexed
    IndexCatchUp,
    /// Record file failed verification (FATAL)
    StorageCorruption,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::DatabaseOpen => "DATABASE_OPEN",
            Event::DatabaseClose => "DATABASE_CLOSE",
            Event::DatabaseDeleted => "DATABASE_DELETED",
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::DocumentSaved => "DOCUMENT_SAVED",
            Event::DocumentDeleted => "DOCUMENT_DELETED",
            Event::DocumentRejected => "DOCUMENT_REJECTED",

            Event::BatchBegin => "BATCH_BEGIN",
            Event::BatchCommit => "BATCH_COMMIT",
            Event::ImportComplete => "IMPORT_COMPLETE",

            Event::IndexCatchUp => "INDEX_CATCH_UP",
            Event::StorageCorruption => "STORAGE_CORRUPTION",
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::StorageCorruption)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
