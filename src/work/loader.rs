use std::{fs, path::Path};

use serde_json::Value;
use tracing::debug;

use super::{ItemId, WorkItem, WorkQueue};

/// Field holding the passage text in search-result records.
pub const DEFAULT_TEXT_FIELD: &str = "text";

/// Errors that can occur while loading work items from JSON.
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// The document is not an array of records.
    NotAnArray,
    /// Record `index` lacks the string field `field`.
    MissingField { index: usize, field: String },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "Could not read work file: {e}"),
            LoadError::Parse(e) => write!(f, "Could not parse work file: {e}"),
            LoadError::NotAnArray => write!(f, "Work file must contain a JSON array of records"),
            LoadError::MissingField { index, field } => {
                write!(f, "Record {index} has no string field '{field}'")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::Io(err)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Parse(err)
    }
}

/// Load a queue from a JSON file holding an array of search-result records.
pub fn load_json_file<P: AsRef<Path>>(path: P, text_field: &str) -> Result<WorkQueue, LoadError> {
    let raw = fs::read_to_string(path.as_ref())?;
    let value: Value = serde_json::from_str(&raw)?;
    let queue = from_json_value(value, text_field)?;
    debug!(path = %path.as_ref().display(), items = queue.size(), "loaded work file");
    Ok(queue)
}

/// Build a queue from an array of JSON records.
///
/// `text_field` becomes the payload, a string `id` field becomes the item
/// key, every other field is kept as metadata. Records without an `id`
/// are identified by their position.
pub fn from_json_value(value: Value, text_field: &str) -> Result<WorkQueue, LoadError> {
    let Value::Array(records) = value else {
        return Err(LoadError::NotAnArray);
    };

    let mut items = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let missing = || LoadError::MissingField {
            index,
            field: text_field.to_string(),
        };
        let Value::Object(mut fields) = record else {
            return Err(missing());
        };
        let payload = match fields.remove(text_field) {
            Some(Value::String(s)) => s,
            _ => return Err(missing()),
        };
        let id = match fields.remove("id") {
            Some(Value::String(key)) => ItemId::Key(key),
            Some(other) => {
                fields.insert("id".into(), other);
                ItemId::Index(index)
            }
            None => ItemId::Index(index),
        };
        items.push(WorkItem::new(id, payload).with_metadata(fields));
    }

    Ok(WorkQueue::from_items(items))
}
