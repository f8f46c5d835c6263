//! CLI command implementations
//!
//! Each command opens the database, performs one operation, closes the
//! database and prints a single JSON response.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::{json, Value as JsonValue};

use crate::config::DatabaseConfig;
use crate::database::Database;
use crate::document::Document;
use crate::observability::Logger;
use crate::value::Value;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments and runs the command. Failures are reported as an error
/// response on stdout and returned to the caller.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    match execute(&cli) {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Loads configuration, applies the log level and runs `cli.command`.
///
/// Returns the `data` of the success response.
pub fn execute(cli: &Cli) -> CliResult<JsonValue> {
    let config = load_config(cli.config.as_deref(), cli.dir.as_deref())?;
    Logger::set_min_severity(config.log_severity());

    let mut db = Database::open(&cli.name, config)?;
    let data = match &cli.command {
        Command::Put { id } => {
            let body = read_request()?;
            put(&mut db, id.as_deref(), body)
        }
        other => run_command(&mut db, other),
    }?;
    db.close()?;

    Ok(data)
}

/// Config file if given, defaults otherwise; `--dir` overrides the directory.
pub fn load_config(config_path: Option<&Path>, dir: Option<&Path>) -> CliResult<DatabaseConfig> {
    let mut config = match config_path {
        Some(path) => DatabaseConfig::load(path)?,
        None => DatabaseConfig::default(),
    };

    if let Some(dir) = dir {
        config.directory = dir.to_path_buf();
    }
    config.validate()?;

    Ok(config)
}

/// Run a command that takes no stdin input
pub fn run_command(db: &mut Database, cmd: &Command) -> CliResult<JsonValue> {
    match cmd {
        Command::Put { .. } => Err(CliError::invalid_input(
            "put reads its document from stdin",
        )),
        Command::Get { id } => get(db, id),
        Command::Delete { id } => delete(db, id),
        Command::Import { file } => import(db, file),
        Command::Count => count(db),
    }
}

/// Save `body`, which must be a JSON object, as a document.
pub fn put(db: &mut Database, id: Option<&str>, body: JsonValue) -> CliResult<JsonValue> {
    let Value::Dictionary(fields) = Value::from(body) else {
        return Err(CliError::invalid_input("Document body must be a JSON object"));
    };

    let mut doc = Document::with_optional_id(id);
    doc.set_dictionary(fields.into_entries());
    db.save(&mut doc)?;

    Ok(json!({
        "id": doc.id(),
        "sequence": doc.sequence(),
    }))
}

pub fn get(db: &mut Database, id: &str) -> CliResult<JsonValue> {
    let doc = db.get_document(id)?.ok_or_else(|| CliError::not_found(id))?;

    Ok(json!({
        "id": doc.id(),
        "sequence": doc.sequence(),
        "properties": doc.to_json(),
    }))
}

pub fn delete(db: &mut Database, id: &str) -> CliResult<JsonValue> {
    let mut doc = db.get_document(id)?.ok_or_else(|| CliError::not_found(id))?;
    db.delete(&mut doc)?;

    Ok(json!({
        "id": doc.id(),
        "deleted": true,
    }))
}

pub fn import(db: &mut Database, file: &Path) -> CliResult<JsonValue> {
    let input = File::open(file).map_err(|e| {
        CliError::io_error(format!("Failed to open {}: {}", file.display(), e))
    })?;
    let imported = db.import_json_lines(BufReader::new(input))?;

    Ok(json!({ "imported": imported }))
}

pub fn count(db: &mut Database) -> CliResult<JsonValue> {
    Ok(json!({ "count": db.document_count()? }))
}
