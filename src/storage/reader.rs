//! Record reader
//!
//! Every record is checksum-verified as it is read. A record that does not
//! verify, or a file that ends inside a record, is reported as corruption
//! with the byte offset where the bad record starts. A failed OS read is an
//! ordinary I/O error.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::errors::{StorageError, StorageResult};
use super::record::{DocumentRecord, MIN_RECORD_SIZE};

/// Sequential and positional reader over a record file.
///
/// The file may grow while the reader is open (other handles append to it);
/// call [`StorageReader::refresh_size`] to see the new records.
pub struct StorageReader {
    storage_path: PathBuf,
    file: BufReader<File>,
    /// Offset of the next record to read
    position: u64,
    file_size: u64,
    /// The buffered file position no longer matches `position`
    needs_seek: bool,
}

impl StorageReader {
    pub fn open(storage_path: &Path) -> StorageResult<Self> {
        let file =
            File::open(storage_path).map_err(|e| StorageError::io("open", storage_path, e))?;
        let file_size = file
            .metadata()
            .map_err(|e| StorageError::io("stat", storage_path, e))?
            .len();

        Ok(Self {
            storage_path: storage_path.to_path_buf(),
            file: BufReader::new(file),
            position: 0,
            file_size,
            needs_seek: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    pub fn current_offset(&self) -> u64 {
        self.position
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Re-reads the file length.
    pub fn refresh_size(&mut self) -> StorageResult<u64> {
        self.file_size = self
            .file
            .get_ref()
            .metadata()
            .map_err(|e| StorageError::io("stat", &self.storage_path, e))?
            .len();
        Ok(self.file_size)
    }

    /// Reads the record at the current offset.
    ///
    /// Returns `Ok(None)` at the end of the file.
    pub fn read_next(&mut self) -> StorageResult<Option<DocumentRecord>> {
        if self.position >= self.file_size {
            return Ok(None);
        }
        if self.needs_seek {
            self.seek_to(self.position)?;
        }

        let offset = self.position;
        let available = self.file_size - offset;
        if available < MIN_RECORD_SIZE as u64 {
            return Err(StorageError::corrupt(
                offset,
                format!("file ends {} bytes into a record", available),
            ));
        }

        let mut prefix = [0u8; 4];
        self.fill(&mut prefix, offset)?;
        let frame_len = u64::from(u32::from_le_bytes(prefix));
        if frame_len < MIN_RECORD_SIZE as u64 || frame_len > available {
            return Err(StorageError::corrupt(
                offset,
                format!(
                    "record length {} does not fit the {} bytes left in the file",
                    frame_len, available
                ),
            ));
        }

        let mut frame = vec![0u8; frame_len as usize];
        frame[..4].copy_from_slice(&prefix);
        self.fill(&mut frame[4..], offset)?;

        let record = DocumentRecord::decode(&frame, offset)?;
        self.position = offset + frame_len;
        self.needs_seek = false;
        Ok(Some(record))
    }

    /// Reads every remaining record.
    pub fn read_all(&mut self) -> StorageResult<Vec<DocumentRecord>> {
        let mut records = Vec::new();
        while let Some(record) = self.read_next()? {
            records.push(record);
        }
        Ok(records)
    }

    pub fn seek_to(&mut self, offset: u64) -> StorageResult<()> {
        self.file
            .seek(SeekFrom::Start(offset))
            .map_err(|e| StorageError::io("seek", &self.storage_path, e))?;
        self.position = offset;
        self.needs_seek = false;
        Ok(())
    }

    /// Reads the record starting at `offset`.
    pub fn read_at(&mut self, offset: u64) -> StorageResult<DocumentRecord> {
        self.seek_to(offset)?;
        self.read_next()?
            .ok_or_else(|| StorageError::corrupt(offset, "no record at indexed offset"))
    }

    /// Reads exactly `buf.len()` bytes of the record starting at `offset`.
    fn fill(&mut self, buf: &mut [u8], offset: u64) -> StorageResult<()> {
        // Until the record is complete the buffered position is mid-record
        self.needs_seek = true;
        self.file.read_exact(buf).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                StorageError::corrupt(offset, "file ends inside the record")
            } else {
                StorageError::io("read", &self.storage_path, e)
            }
        })
    }
}
