//! JSON dataset loader
//!
//! Reads one `data.json` file into memory and checks its shape: the
//! top-level value must be an array, and every element must be an object.

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::types::JsonValue;
use std::fs;
use std::path::Path;

/// Load a dataset from a JSON file
///
/// The file must contain a single JSON array of objects. A missing file is
/// reported as [`Error::FileNotFound`] so callers can distinguish "skip this
/// phase" from a genuinely malformed input.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::not_found(path)
        } else {
            Error::config(format!(
                "Failed to read dataset file '{}': {}",
                path.display(),
                e
            ))
        }
    })?;

    let value: JsonValue = serde_json::from_str(&content)
        .map_err(|e| Error::invalid_dataset(path, format!("invalid JSON: {e}")))?;

    let JsonValue::Array(records) = value else {
        return Err(Error::invalid_dataset(
            path,
            "top-level value must be an array of records",
        ));
    };

    validate_records(path, &records)?;
    Ok(Dataset::new(records))
}

/// Check that every record is a JSON object
fn validate_records(path: &Path, records: &[JsonValue]) -> Result<()> {
    for (index, record) in records.iter().enumerate() {
        if !record.is_object() {
            return Err(Error::invalid_dataset(
                path,
                format!("record {index} is not an object"),
            ));
        }
    }
    Ok(())
}
