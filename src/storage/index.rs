//! In-memory latest-record index
//!
//! Maps each document id to the offset of its latest record. The index is
//! built by scanning the record file and then caught up incrementally: every
//! call to [`DocumentIndex::catch_up`] scans only the bytes appended since the
//! previous call, whichever handle wrote them.

use std::collections::HashMap;

use super::errors::StorageResult;
use super::reader::StorageReader;

/// Location and state of the latest record for one id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub offset: u64,
    pub sequence: u64,
    pub is_tombstone: bool,
}

/// Latest-record-wins index over a record file.
#[derive(Debug, Default)]
pub struct DocumentIndex {
    entries: HashMap<String, IndexEntry>,
    /// Byte offset up to which the file has been scanned
    indexed_through: u64,
    last_sequence: u64,
}

impl DocumentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans records appended since the last call.
    ///
    /// Returns the number of records indexed.
    pub fn catch_up(&mut self, reader: &mut StorageReader) -> StorageResult<usize> {
        if reader.refresh_size()? <= self.indexed_through {
            return Ok(0);
        }

        reader.seek_to(self.indexed_through)?;
        let mut scanned = 0;
        loop {
            let offset = reader.current_offset();
            let Some(record) = reader.read_next()? else {
                break;
            };
            self.last_sequence = self.last_sequence.max(record.sequence);
            self.entries.insert(
                record.document_id,
                IndexEntry {
                    offset,
                    sequence: record.sequence,
                    is_tombstone: record.is_tombstone,
                },
            );
            scanned += 1;
        }
        self.indexed_through = reader.current_offset();

        Ok(scanned)
    }

    pub fn get(&self, document_id: &str) -> Option<IndexEntry> {
        self.entries.get(document_id).copied()
    }

    /// Latest record exists and is not a tombstone.
    pub fn is_live(&self, document_id: &str) -> bool {
        self.get(document_id).is_some_and(|e| !e.is_tombstone)
    }

    pub fn live_count(&self) -> usize {
        self.entries.values().filter(|e| !e.is_tombstone).count()
    }

    /// Ids of live documents, sorted.
    pub fn live_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, e)| !e.is_tombstone)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    pub fn next_sequence(&self) -> u64 {
        self.last_sequence + 1
    }
}
