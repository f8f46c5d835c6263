//! Durability and lifecycle of a database directory

use std::fs::{self, OpenOptions};
use std::io::{Cursor, Write};

use tempfile::TempDir;

use litedoc::storage::STORAGE_FILE_NAME;
use litedoc::{Database, DatabaseConfig, Document, ErrorCode, ReadArray, ReadDictionary, SyncMode};

fn config(dir: &TempDir) -> DatabaseConfig {
    DatabaseConfig::new(dir.path())
}

fn storage_file(dir: &TempDir, name: &str) -> std::path::PathBuf {
    Database::database_path(name, dir.path()).join(STORAGE_FILE_NAME)
}

#[test]
fn test_documents_survive_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let mut db = Database::open("people", config(&dir)).unwrap();
        let mut doc = Document::with_id("ada");
        doc.set("born", 1815);
        db.save(&mut doc).unwrap();
        db.close().unwrap();
    }

    let mut db = Database::open("people", config(&dir)).unwrap();
    assert_eq!(db.document_count().unwrap(), 1);
    let doc = db.get_document("ada").unwrap().unwrap();
    assert_eq!(doc.get_int("born"), 1815);
    assert_eq!(doc.sequence(), 1);
}

#[test]
fn test_sequences_continue_after_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let mut db = Database::open("db", config(&dir)).unwrap();
        db.save(&mut Document::with_id("a")).unwrap();
        db.save(&mut Document::with_id("b")).unwrap();
        db.close().unwrap();
    }

    let mut db = Database::open("db", config(&dir)).unwrap();
    let mut doc = Document::with_id("c");
    db.save(&mut doc).unwrap();
    assert_eq!(doc.sequence(), 3);
}

#[test]
fn test_latest_save_wins() {
    let dir = TempDir::new().unwrap();
    let mut db = Database::open("db", config(&dir)).unwrap();

    let mut doc = Document::with_id("doc1");
    doc.set("version", 1);
    db.save(&mut doc).unwrap();
    doc.set("version", 2);
    db.save(&mut doc).unwrap();
    db.close().unwrap();

    let mut db = Database::open("db", config(&dir)).unwrap();
    assert_eq!(db.document_count().unwrap(), 1);
    assert_eq!(db.get_document("doc1").unwrap().unwrap().get_int("version"), 2);
}

#[test]
fn test_delete_is_visible_to_other_handles() {
    let dir = TempDir::new().unwrap();
    let mut first = Database::open("db", config(&dir)).unwrap();
    let mut second = Database::open("db", config(&dir)).unwrap();

    let mut doc = Document::with_id("doc1");
    first.save(&mut doc).unwrap();
    assert!(second.contains("doc1").unwrap());

    let mut copy = second.get_document("doc1").unwrap().unwrap();
    second.delete(&mut copy).unwrap();

    assert!(first.get_document("doc1").unwrap().is_none());
    assert_eq!(first.document_count().unwrap(), 0);

    // The stale in-memory document is unaffected, and deleting it again fails
    assert!(!doc.is_deleted());
    let err = first.delete(&mut doc).unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::NotFound);
}

#[test]
fn test_tombstone_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let mut db = Database::open("db", config(&dir)).unwrap();
        let mut doc = Document::with_id("doc1");
        db.save(&mut doc).unwrap();
        db.delete(&mut doc).unwrap();
        db.close().unwrap();
    }

    let mut db = Database::open("db", config(&dir)).unwrap();
    assert!(db.get_document("doc1").unwrap().is_none());
    assert!(db.document_ids().unwrap().is_empty());
}

#[test]
fn test_batch_writes_visible_after_batch() {
    let dir = TempDir::new().unwrap();
    let mut db = Database::open("db", config(&dir)).unwrap();

    let saved = db
        .in_batch(|db| {
            for i in 1..=10 {
                let mut doc = Document::with_id(format!("doc{}", i));
                doc.set("n", i);
                db.save(&mut doc)?;
            }
            // Nested batch only syncs at the outermost level
            db.in_batch(|db| db.save(&mut Document::with_id("nested")))?;
            Ok(11)
        })
        .unwrap();
    assert_eq!(saved, 11);

    let mut other = Database::open("db", config(&dir)).unwrap();
    assert_eq!(other.document_count().unwrap(), 11);
    assert_eq!(other.get_document("doc7").unwrap().unwrap().get_int("n"), 7);
}

#[test]
fn test_import_json_lines() {
    let dir = TempDir::new().unwrap();
    let mut db = Database::open("db", config(&dir).with_sync_mode(SyncMode::None)).unwrap();

    let input = r#"{"name": "Ada", "langs": ["en", "fr"]}
{"name": "Grace", "address": {"city": "New York"}}

{"name": "Barbara"}
"#;
    assert_eq!(db.import_json_lines(Cursor::new(input)).unwrap(), 3);
    db.close().unwrap();

    let mut db = Database::open("db", config(&dir)).unwrap();
    assert_eq!(db.document_ids().unwrap(), vec!["doc-001", "doc-002", "doc-003"]);

    let grace = db.get_document("doc-002").unwrap().unwrap();
    assert_eq!(
        grace.fragment("address").get("city").string(),
        Some("New York")
    );
    let ada = db.get_document("doc-001").unwrap().unwrap();
    assert_eq!(ada.get_array("langs").unwrap().get_string(1), Some("fr"));
}

#[test]
fn test_import_stops_at_bad_line() {
    let dir = TempDir::new().unwrap();
    let mut db = Database::open("db", config(&dir)).unwrap();

    let input = "{\"n\": 1}\nnot json\n{\"n\": 3}\n";
    let err = db.import_json_lines(Cursor::new(input)).unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::InvalidParameter);

    // Lines before the bad one were written
    assert!(db.contains("doc-001").unwrap());
    assert!(!db.contains("doc-002").unwrap());
}

#[test]
fn test_corrupted_record_detected_on_open() {
    let dir = TempDir::new().unwrap();
    {
        let mut db = Database::open("db", config(&dir)).unwrap();
        let mut doc = Document::with_id("doc1");
        doc.set("payload", "some text that will be damaged");
        db.save(&mut doc).unwrap();
        db.close().unwrap();
    }

    let path = storage_file(&dir, "db");
    let mut bytes = fs::read(&path).unwrap();
    let middle = bytes.len() / 2;
    bytes[middle] ^= 0xFF;
    fs::write(&path, bytes).unwrap();

    let err = Database::open("db", config(&dir)).err().unwrap();
    assert_eq!(err.error_code(), ErrorCode::CorruptData);
    assert_eq!(err.code(), 15);
    assert!(err.is_fatal());
}

#[test]
fn test_truncated_tail_detected() {
    let dir = TempDir::new().unwrap();
    let mut db = Database::open("db", config(&dir)).unwrap();
    db.save(&mut Document::with_id("doc1")).unwrap();

    // A partial record appended behind the handle's back
    let mut file = OpenOptions::new()
        .append(true)
        .open(storage_file(&dir, "db"))
        .unwrap();
    file.write_all(&[0x40, 0, 0, 0, 1, 2, 3]).unwrap();
    drop(file);

    let err = db.get_document("doc1").unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::CorruptData);
}

#[test]
fn test_delete_database() {
    let dir = TempDir::new().unwrap();
    let mut db = Database::open("db", config(&dir)).unwrap();
    db.save(&mut Document::with_id("doc1")).unwrap();
    db.close().unwrap();
    assert!(Database::exists("db", dir.path()));

    Database::delete_database("db", dir.path()).unwrap();
    assert!(!Database::exists("db", dir.path()));

    let mut db = Database::open("db", config(&dir)).unwrap();
    assert_eq!(db.document_count().unwrap(), 0);
}

#[test]
fn test_databases_are_isolated() {
    let dir = TempDir::new().unwrap();
    let mut a = Database::open("a", config(&dir)).unwrap();
    let mut b = Database::open("b", config(&dir)).unwrap();

    a.save(&mut Document::with_id("doc1")).unwrap();
    assert!(a.contains("doc1").unwrap());
    assert!(!b.contains("doc1").unwrap());
}

#[test]
fn test_config_file_drives_open() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("litedoc.json");
    let data_dir = dir.path().join("data");
    fs::write(
        &config_path,
        serde_json::json!({"directory": data_dir, "sync_mode": "none"}).to_string(),
    )
    .unwrap();

    let config = DatabaseConfig::load(&config_path).unwrap();
    let mut db = Database::open("db", config).unwrap();
    db.save(&mut Document::with_id("doc1")).unwrap();
    db.close().unwrap();

    assert!(data_dir.join("db.litedoc").join(STORAGE_FILE_NAME).exists());
}
