//! Corpus ingestion from JSON documents.
//!
//! A corpus file is a JSON array of objects; one string field of each object
//! holds the text. Objects without that field are skipped.

use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON file: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("JSON file must contain a list, got {0}")]
    NotAList(&'static str),
    #[error("JSON file contains an empty list")]
    EmptyList,
    #[error("Item {index} has a non-string value for key '{key}'")]
    FieldNotString { index: usize, key: String },
    #[error("No item contains the key '{key}'; nothing to analyze")]
    NoTexts { key: String },
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Extract `target_key` from every object of the JSON list at `path`.
///
/// The result may be empty when no object carries the key; use
/// [`load_corpus`] to treat that as an error.
pub fn extract_texts(path: &Path, target_key: &str) -> Result<Vec<String>, IngestError> {
    let source = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => IngestError::NotFound(path.to_path_buf()),
        _ => IngestError::Io(e),
    })?;
    extract_texts_from_str(&source, target_key)
}

/// Same as [`extract_texts`], over an in-memory JSON document.
pub fn extract_texts_from_str(source: &str, target_key: &str) -> Result<Vec<String>, IngestError> {
    let root: Value = serde_json::from_str(source)?;

    let items = match root {
        Value::Array(items) => items,
        other => return Err(IngestError::NotAList(json_type_name(&other))),
    };

    if items.is_empty() {
        return Err(IngestError::EmptyList);
    }

    let mut texts = Vec::with_capacity(items.len());
    let mut skipped = 0usize;

    for (index, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(mut object) => match object.remove(target_key) {
                Some(Value::String(text)) => texts.push(text),
                Some(_) => {
                    return Err(IngestError::FieldNotString {
                        index,
                        key: target_key.to_string(),
                    })
                }
                None => skipped += 1,
            },
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        log::warn!(
            "Skipped {} item(s) without a '{}' field",
            skipped,
            target_key
        );
    }

    Ok(texts)
}

/// Extract texts and reject an empty result before any analysis starts.
pub fn load_corpus(path: &Path, target_key: &str) -> Result<Vec<String>, IngestError> {
    let texts = extract_texts(path, target_key)?;
    if texts.is_empty() {
        return Err(IngestError::NoTexts {
            key: target_key.to_string(),
        });
    }

    log::info!("Extracted {} texts from {}", texts.len(), path.display());
    Ok(texts)
}
