//! Append-only record writer
//!
//! Records are never updated in place. Saving a document again appends a new
//! record; the latest record for an id wins.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::errors::{StorageError, StorageResult};
use super::record::DocumentRecord;

/// Name of the record file inside a database directory.
pub const STORAGE_FILE_NAME: &str = "documents.dat";

/// Writer for `<database_dir>/documents.dat`.
pub struct StorageWriter {
    storage_path: PathBuf,
    file: File,
    /// fsync after every record
    sync_on_write: bool,
    /// Records written since the last fsync
    unsynced: usize,
}

impl StorageWriter {
    /// Opens or creates the record file, creating `database_dir` if needed.
    pub fn open(database_dir: &Path) -> StorageResult<Self> {
        if !database_dir.exists() {
            fs::create_dir_all(database_dir)
                .map_err(|e| StorageError::io("create directory", database_dir, e))?;
        }

        let storage_path = database_dir.join(STORAGE_FILE_NAME);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&storage_path)
            .map_err(|e| StorageError::io("open", &storage_path, e))?;

        Ok(Self {
            storage_path,
            file,
            sync_on_write: true,
            unsynced: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    /// When disabled, records stay in the OS cache until [`StorageWriter::sync`].
    pub fn set_sync_on_write(&mut self, enabled: bool) {
        self.sync_on_write = enabled;
    }

    pub fn sync_on_write(&self) -> bool {
        self.sync_on_write
    }

    /// Number of records written but not yet fsynced.
    pub fn unsynced(&self) -> usize {
        self.unsynced
    }

    /// Appends a record.
    ///
    /// Returns the byte offset the record was written at. A record that is
    /// too large is refused before anything is written, and a failed write
    /// is rolled back so the file never ends in a partial record.
    pub fn write(&mut self, record: &DocumentRecord) -> StorageResult<u64> {
        let frame = record.encode()?;

        let offset = append_frame(&mut self.file, &frame)
            .map_err(|e| StorageError::io("append", &self.storage_path, e))?;
        self.unsynced += 1;

        if self.sync_on_write {
            self.sync()?;
        }

        Ok(offset)
    }

    /// Flushes pending records to disk. No-op when nothing is pending.
    pub fn sync(&mut self) -> StorageResult<()> {
        if self.unsynced == 0 {
            return Ok(());
        }
        self.file
            .sync_all()
            .map_err(|e| StorageError::io("fsync", &self.storage_path, e))?;
        self.unsynced = 0;
        Ok(())
    }
}

/// The file operations an append needs.
trait AppendTarget: Write {
    fn end_offset(&self) -> io::Result<u64>;
    fn truncate_to(&mut self, len: u64) -> io::Result<()>;
}

impl AppendTarget for File {
    fn end_offset(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn truncate_to(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

/// Writes `frame` at the end of `target` and returns its offset.
///
/// On a failed write the target is cut back to its previous length. If that
/// fails too, the truncation error is returned.
fn append_frame<T: AppendTarget>(target: &mut T, frame: &[u8]) -> io::Result<u64> {
    let offset = target.end_offset()?;
    if let Err(e) = target.write_all(frame) {
        target.truncate_to(offset)?;
        return Err(e);
    }
    Ok(offset)
}

#[cfg(test)]
mod tests {
    use super::super::reader::StorageReader;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writer_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let db_dir = temp_dir.path().join("nested").join("test.litedoc");

        let writer = StorageWriter::open(&db_dir).unwrap();

        assert!(db_dir.exists());
        assert_eq!(writer.path(), db_dir.join(STORAGE_FILE_NAME));
        assert!(writer.path().exists());
    }

    #[test]
    fn test_offsets_increase() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = StorageWriter::open(temp_dir.path()).unwrap();

        let first = writer.write(&DocumentRecord::live("doc1", 1, b"a".to_vec())).unwrap();
        let second = writer.write(&DocumentRecord::live("doc2", 2, b"b".to_vec())).unwrap();

        assert_eq!(first, 0);
        assert!(second > first);
    }

    #[test]
    fn test_overwrite_appends() {
        let temp_dir = TempDir::new().unwrap();
        {
            let mut writer = StorageWriter::open(temp_dir.path()).unwrap();
            writer.write(&DocumentRecord::live("doc1", 1, b"first".to_vec())).unwrap();
            writer.write(&DocumentRecord::live("doc1", 2, b"second".to_vec())).unwrap();
        }

        let mut reader = StorageReader::open(&temp_dir.path().join(STORAGE_FILE_NAME)).unwrap();
        let records = reader.read_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].body, b"second");
    }

    #[test]
    fn test_deferred_sync() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = StorageWriter::open(temp_dir.path()).unwrap();
        writer.set_sync_on_write(false);

        writer.write(&DocumentRecord::live("doc1", 1, Vec::new())).unwrap();
        writer.write(&DocumentRecord::tombstone("doc1", 2)).unwrap();
        assert_eq!(writer.unsynced(), 2);

        writer.sync().unwrap();
        assert_eq!(writer.unsynced(), 0);
    }

    #[test]
    fn test_reopen_appends() {
        let temp_dir = TempDir::new().unwrap();
        {
            let mut writer = StorageWriter::open(temp_dir.path()).unwrap();
            writer.write(&DocumentRecord::live("doc1", 1, Vec::new())).unwrap();
        }
        let offset = {
            let mut writer = StorageWriter::open(temp_dir.path()).unwrap();
            writer.write(&DocumentRecord::live("doc2", 2, Vec::new())).unwrap()
        };
        assert!(offset > 0);
    }

    /// Accepts `budget` bytes, then fails every write.
    struct ShortDisk {
        data: Vec<u8>,
        budget: usize,
    }

    impl Write for ShortDisk {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.budget == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "no space left"));
            }
            let n = buf.len().min(self.budget);
            self.data.extend_from_slice(&buf[..n]);
            self.budget -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl AppendTarget for ShortDisk {
        fn end_offset(&self) -> io::Result<u64> {
            Ok(self.data.len() as u64)
        }

        fn truncate_to(&mut self, len: u64) -> io::Result<()> {
            self.data.truncate(len as usize);
            Ok(())
        }
    }

    #[test]
    fn test_partial_write_rolled_back() {
        let frame = DocumentRecord::live("doc1", 1, b"payload".to_vec()).encode().unwrap();
        let mut disk = ShortDisk {
            data: vec![1, 2, 3],
            budget: 5,
        };

        let err = append_frame(&mut disk, &frame).unwrap_err();
        assert_eq!(err.to_string(), "no space left");
        assert_eq!(disk.data, vec![1, 2, 3]);
    }

    #[test]
    fn test_append_returns_previous_end() {
        let frame = DocumentRecord::tombstone("doc1", 2).encode().unwrap();
        let mut disk = ShortDisk {
            data: vec![0; 40],
            budget: usize::MAX,
        };

        assert_eq!(append_frame(&mut disk, &frame).unwrap(), 40);
        assert_eq!(disk.data.len(), 40 + frame.len());
    }

    #[test]
    fn test_write_after_rollback_is_readable() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = StorageWriter::open(temp_dir.path()).unwrap();
        writer.write(&DocumentRecord::live("doc1", 1, b"kept".to_vec())).unwrap();

        let end = writer.file.end_offset().unwrap();
        writer.file.write_all(&[0xAB; 9]).unwrap();
        writer.file.truncate_to(end).unwrap();

        let offset = writer.write(&DocumentRecord::live("doc2", 2, b"next".to_vec())).unwrap();
        assert_eq!(offset, end);

        let mut reader = StorageReader::open(writer.path()).unwrap();
        let records = reader.read_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].document_id, "doc2");
    }
}
