//! Document record format
//!
//! ```text
//! +------------------+
//! | Record Length    | (u32 LE, whole record)
//! +------------------+
//! | Document ID      | (u32 LE length + UTF-8)
//! +------------------+
//! | Sequence         | (u64 LE)
//! +------------------+
//! | Tombstone Flag   | (u8: 0 = live, 1 = deleted)
//! +------------------+
//! | Body             | (u32 LE length + bytes)
//! +------------------+
//! | Checksum         | (u32 LE)
//! +------------------+
//! ```
//!
//! The checksum covers every byte before it.

use super::checksum::compute_checksum;
use super::errors::{StorageError, StorageResult};

/// Smallest possible record: empty id and empty body.
pub(crate) const MIN_RECORD_SIZE: usize = 4 + 4 + 8 + 1 + 4 + 4;

/// One stored document snapshot or tombstone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    pub document_id: String,
    /// Store-wide sequence assigned when the record was written
    pub sequence: u64,
    pub is_tombstone: bool,
    /// Encoded document fields (empty for tombstones)
    pub body: Vec<u8>,
}

impl DocumentRecord {
    /// Record for a saved document
    pub fn live(document_id: impl Into<String>, sequence: u64, body: Vec<u8>) -> Self {
        Self {
            document_id: document_id.into(),
            sequence,
            is_tombstone: false,
            body,
        }
    }

    /// Record for a deleted document
    pub fn tombstone(document_id: impl Into<String>, sequence: u64) -> Self {
        Self {
            document_id: document_id.into(),
            sequence,
            is_tombstone: true,
            body: Vec::new(),
        }
    }

    /// Size of the encoded record in bytes.
    pub fn encoded_len(&self) -> usize {
        MIN_RECORD_SIZE + self.document_id.len() + self.body.len()
    }

    /// Encodes the record with its length prefix and checksum.
    ///
    /// Fails with `RecordTooLarge` when the id, the body or the whole record
    /// does not fit a u32 length.
    pub fn encode(&self) -> StorageResult<Vec<u8>> {
        let id_len = length_prefix(&self.document_id, "document id", self.document_id.len())?;
        let body_len = length_prefix(&self.document_id, "body", self.body.len())?;
        let record_len = length_prefix(&self.document_id, "record", self.encoded_len())?;

        let mut buf = Vec::with_capacity(self.encoded_len());
        buf.extend_from_slice(&record_len.to_le_bytes());
        buf.extend_from_slice(&id_len.to_le_bytes());
        buf.extend_from_slice(self.document_id.as_bytes());
        buf.extend_from_slice(&self.sequence.to_le_bytes());
        buf.push(u8::from(self.is_tombstone));
        buf.extend_from_slice(&body_len.to_le_bytes());
        buf.extend_from_slice(&self.body);

        let checksum = compute_checksum(&buf);
        buf.extend_from_slice(&checksum.to_le_bytes());

        Ok(buf)
    }

    /// Decodes one complete record read from `offset`.
    ///
    /// `frame` must hold exactly the bytes announced by the length prefix.
    /// Any mismatch is reported as corruption at `offset`.
    pub fn decode(frame: &[u8], offset: u64) -> StorageResult<Self> {
        if frame.len() < MIN_RECORD_SIZE {
            return Err(StorageError::corrupt(
                offset,
                format!("{} bytes is shorter than any record", frame.len()),
            ));
        }

        let (content, checksum_bytes) = frame.split_at(frame.len() - 4);
        let stored = u32::from_le_bytes(array4(checksum_bytes));
        let computed = compute_checksum(content);
        if stored != computed {
            return Err(StorageError::corrupt(
                offset,
                format!("checksum mismatch: stored {:08x}, computed {:08x}", stored, computed),
            ));
        }

        let mut fields = Fields {
            data: content,
            pos: 0,
            offset,
        };

        let record_len = fields.u32("record length")? as usize;
        if record_len != frame.len() {
            return Err(StorageError::corrupt(
                offset,
                format!("length prefix {} does not match {} bytes read", record_len, frame.len()),
            ));
        }

        let id_len = fields.u32("document id length")? as usize;
        let document_id = String::from_utf8(fields.take(id_len, "document id")?.to_vec())
            .map_err(|e| StorageError::corrupt(offset, format!("document id is not UTF-8: {}", e)))?;

        let sequence = u64::from_le_bytes(array8(fields.take(8, "sequence")?));
        let is_tombstone = fields.take(1, "tombstone flag")?[0] != 0;

        let body_len = fields.u32("body length")? as usize;
        let body = fields.take(body_len, "body")?.to_vec();

        if fields.pos != content.len() {
            return Err(StorageError::corrupt(
                offset,
                format!("{} unexpected bytes after body", content.len() - fields.pos),
            ));
        }

        Ok(Self {
            document_id,
            sequence,
            is_tombstone,
            body,
        })
    }
}

/// Checks that `len` fits a u32 length prefix.
pub(crate) fn length_prefix(document_id: &str, field: &'static str, len: usize) -> StorageResult<u32> {
    u32::try_from(len).map_err(|_| StorageError::RecordTooLarge {
        document_id: document_id.to_string(),
        field,
        len: len as u64,
    })
}

/// Bounds-checked cursor over the fields of a verified record.
struct Fields<'a> {
    data: &'a [u8],
    pos: usize,
    offset: u64,
}

impl<'a> Fields<'a> {
    fn take(&mut self, len: usize, field: &str) -> StorageResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| StorageError::corrupt(self.offset, format!("{} overruns the record", field)))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn u32(&mut self, field: &str) -> StorageResult<u32> {
        Ok(u32::from_le_bytes(array4(self.take(4, field)?)))
    }
}

fn array4(bytes: &[u8]) -> [u8; 4] {
    let mut out = [0u8; 4];
    out.copy_from_slice(bytes);
    out
}

fn array8(bytes: &[u8]) -> [u8; 8] {
    let mut out = [0u8; 8];
    out.copy_from_slice(bytes);
    out
}
