//! Database handle
//!
//! A `Database` is bound to one directory, `<config.directory>/<name>.litedoc`,
//! holding a single append-only record file. Saves append a full snapshot of
//! the document; deletes append a tombstone. Reads always decode a fresh
//! `Document` from the latest record, there is no cache or identity map.
//!
//! Several handles may be open on the same directory. Before every read or
//! write a handle indexes whatever other handles appended, so all handles
//! observe the same data.

use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::config::DatabaseConfig;
use crate::document::{decode_properties, encode_properties, Document};
use crate::observability::{log_event_at, log_event_with_fields, Event, Severity};
use crate::storage::{DocumentIndex, DocumentRecord, StorageReader, StorageWriter};
use crate::value::Value;

use super::errors::{DatabaseError, DatabaseResult};

/// Directory suffix of every database.
pub const DATABASE_EXTENSION: &str = "litedoc";

pub struct Database {
    name: String,
    path: PathBuf,
    config: DatabaseConfig,
    writer: StorageWriter,
    reader: StorageReader,
    index: DocumentIndex,
    /// Nesting level of `in_batch` calls
    batch_depth: usize,
}

impl Database {
    /// Opens the named database, creating it if it does not exist.
    pub fn open(name: &str, config: DatabaseConfig) -> DatabaseResult<Self> {
        config.validate()?;
        validate_name(name)?;

        let path = Self::database_path(name, &config.directory);
        let mut writer = StorageWriter::open(&path).map_err(|source| DatabaseError::CantOpen {
            path: path.clone(),
            source,
        })?;
        writer.set_sync_on_write(config.sync_mode.syncs_each_write());

        let reader = StorageReader::open(writer.path()).map_err(|source| {
            DatabaseError::CantOpen {
                path: path.clone(),
                source,
            }
        })?;

        let mut db = Self {
            name: name.to_string(),
            path,
            config,
            writer,
            reader,
            index: DocumentIndex::new(),
            batch_depth: 0,
        };
        db.catch_up()?;

        let path_str = db.path.display().to_string();
        let count = db.index.live_count().to_string();
        log_event_with_fields(
            Event::DatabaseOpen,
            &[("name", &db.name), ("path", &path_str), ("documents", &count)],
        );

        Ok(db)
    }

    /// Directory that holds the named database.
    pub fn database_path(name: &str, directory: &Path) -> PathBuf {
        directory.join(format!("{}.{}", name, DATABASE_EXTENSION))
    }

    pub fn exists(name: &str, directory: &Path) -> bool {
        Self::database_path(name, directory).is_dir()
    }

    /// Removes the named database from disk. Deleting a database that does
    /// not exist succeeds.
    pub fn delete_database(name: &str, directory: &Path) -> DatabaseResult<()> {
        validate_name(name)?;

        let path = Self::database_path(name, directory);
        if path.exists() {
            fs::remove_dir_all(&path)?;
        }

        let path_str = path.display().to_string();
        log_event_with_fields(Event::DatabaseDeleted, &[("name", name), ("path", &path_str)]);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Writes a snapshot of `document`.
    ///
    /// On success the document's sequence is updated and it is no longer
    /// marked deleted. Fails with a bad-document-ID error when the id is empty.
    pub fn save(&mut self, document: &mut Document) -> DatabaseResult<()> {
        if !document.has_valid_id() {
            log_event_at(
                Severity::Warn,
                Event::DocumentRejected,
                &[("reason", "bad document ID")],
            );
            return Err(DatabaseError::InvalidDocumentId(document.id().to_string()));
        }

        let body = encode_properties(document.properties()).map_err(|source| {
            DatabaseError::InvalidBody {
                document_id: document.id().to_string(),
                source,
            }
        })?;

        self.catch_up()?;
        let sequence = self.index.next_sequence();
        self.writer
            .write(&DocumentRecord::live(document.id(), sequence, body))?;
        self.catch_up()?;

        document.mark_saved(sequence);

        let seq_str = sequence.to_string();
        log_event_with_fields(
            Event::DocumentSaved,
            &[("doc_id", document.id()), ("sequence", &seq_str)],
        );
        Ok(())
    }

    /// Fetches a new, independent instance of the latest saved snapshot.
    ///
    /// Returns `Ok(None)` if the id was never saved or has been deleted.
    pub fn get_document(&mut self, id: &str) -> DatabaseResult<Option<Document>> {
        self.catch_up()?;

        let entry = match self.index.get(id) {
            Some(entry) if !entry.is_tombstone => entry,
            _ => return Ok(None),
        };

        let record = self.reader.read_at(entry.offset)?;
        let properties =
            decode_properties(&record.body).map_err(|source| DatabaseError::InvalidBody {
                document_id: record.document_id.clone(),
                source,
            })?;

        Ok(Some(Document::from_snapshot(
            record.document_id,
            record.sequence,
            properties,
        )))
    }

    /// Whether a live document with this id exists.
    pub fn contains(&mut self, id: &str) -> DatabaseResult<bool> {
        self.catch_up()?;
        Ok(self.index.is_live(id))
    }

    /// Number of live documents.
    pub fn document_count(&mut self) -> DatabaseResult<usize> {
        self.catch_up()?;
        Ok(self.index.live_count())
    }

    /// Ids of live documents, sorted.
    pub fn document_ids(&mut self) -> DatabaseResult<Vec<String>> {
        self.catch_up()?;
        Ok(self.index.live_ids())
    }

    /// Appends a tombstone for `document` and marks it deleted.
    ///
    /// Fails with not-found if the database holds no live document with its id.
    pub fn delete(&mut self, document: &mut Document) -> DatabaseResult<()> {
        if !document.has_valid_id() {
            return Err(DatabaseError::InvalidDocumentId(document.id().to_string()));
        }

        self.catch_up()?;
        if !self.index.is_live(document.id()) {
            log_event_at(
                Severity::Warn,
                Event::DocumentRejected,
                &[("doc_id", document.id()), ("reason", "not found")],
            );
            return Err(DatabaseError::NotFound(document.id().to_string()));
        }

        let sequence = self.index.next_sequence();
        self.writer
            .write(&DocumentRecord::tombstone(document.id(), sequence))?;
        self.catch_up()?;

        document.mark_deleted(sequence);

        let seq_str = sequence.to_string();
        log_event_with_fields(
            Event::DocumentDeleted,
            &[("doc_id", document.id()), ("sequence", &seq_str)],
        );
        Ok(())
    }

    /// Runs `f` with per-write fsync deferred to a single sync at the end.
    ///
    /// Batches nest; only the outermost one syncs. Writes made before `f`
    /// fails stay in the file.
    pub fn in_batch<T, F>(&mut self, f: F) -> DatabaseResult<T>
    where
        F: FnOnce(&mut Self) -> DatabaseResult<T>,
    {
        if self.batch_depth == 0 {
            log_event_at(Severity::Trace, Event::BatchBegin, &[("name", &self.name)]);
            self.writer.set_sync_on_write(false);
        }
        self.batch_depth += 1;

        let result = f(self);

        self.batch_depth -= 1;
        if self.batch_depth > 0 {
            return result;
        }

        let syncs = self.config.sync_mode.syncs_each_write();
        self.writer.set_sync_on_write(syncs);
        let records = self.writer.unsynced().to_string();
        if syncs {
            self.writer.sync()?;
        }

        log_event_with_fields(
            Event::BatchCommit,
            &[("name", &self.name), ("records", &records)],
        );
        result
    }

    /// Saves each non-blank line of `input` as a document.
    ///
    /// Every line must be a JSON object. Documents get the ids `doc-001`,
    /// `doc-002`, ... in line order, blank lines skipped. All saves share one
    /// batch. Returns the number of documents imported.
    pub fn import_json_lines<R: BufRead>(&mut self, input: R) -> DatabaseResult<usize> {
        let imported = self.in_batch(|db| {
            let mut count = 0;
            for (line_no, line) in input.lines().enumerate() {
                let line = line?;
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let json: serde_json::Value = serde_json::from_str(line).map_err(|e| {
                    DatabaseError::InvalidParameter(format!("line {}: {}", line_no + 1, e))
                })?;
                let Value::Dictionary(fields) = Value::from(json) else {
                    return Err(DatabaseError::InvalidParameter(format!(
                        "line {}: expected a JSON object",
                        line_no + 1
                    )));
                };

                count += 1;
                let mut document =
                    Document::with_dictionary(import_document_id(count), fields.into_entries());
                db.save(&mut document)?;
            }
            Ok(count)
        })?;

        let count_str = imported.to_string();
        log_event_with_fields(
            Event::ImportComplete,
            &[("name", &self.name), ("documents", &count_str)],
        );
        Ok(imported)
    }

    /// Syncs outstanding writes and releases the handle.
    pub fn close(mut self) -> DatabaseResult<()> {
        self.writer.sync()?;
        log_event_with_fields(Event::DatabaseClose, &[("name", &self.name)]);
        Ok(())
    }

    /// Indexes records appended since the last call, by this or any other
    /// handle.
    fn catch_up(&mut self) -> DatabaseResult<()> {
        match self.index.catch_up(&mut self.reader) {
            Ok(0) => Ok(()),
            Ok(scanned) => {
                let scanned = scanned.to_string();
                log_event_at(
                    Severity::Trace,
                    Event::IndexCatchUp,
                    &[("name", &self.name), ("records", &scanned)],
                );
                Ok(())
            }
            Err(e) => {
                if e.is_corruption() {
                    let path_str = self.path.display().to_string();
                    let reason = e.to_string();
                    log_event_with_fields(
                        Event::StorageCorruption,
                        &[("path", &path_str), ("reason", &reason)],
                    );
                }
                Err(e.into())
            }
        }
    }
}

fn validate_name(name: &str) -> DatabaseResult<()> {
    if name.is_empty() {
        return Err(DatabaseError::InvalidParameter(
            "database name must not be empty".into(),
        ));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(DatabaseError::InvalidParameter(format!(
            "invalid database name: {:?}",
            name
        )));
    }
    Ok(())
}

fn import_document_id(n: usize) -> String {
    format!("doc-{:03}", n)
}
