//! Validation of written Parquet shards
//!
//! Reads produced files back and reports row counts, column layout,
//! on-disk size, and schema consistency. Chunk files that belong to the
//! same phase directory must share one schema; different phases carry
//! different schemas, so consistency is checked per directory.

use crate::error::{Error, Result};
use crate::output::batch_to_records;
use crate::types::{mb_to_bytes, JsonValue};
use arrow::datatypes::SchemaRef;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Facts about one Parquet file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub rows: usize,
    pub columns: Vec<String>,
    pub size_bytes: u64,
}

/// Aggregate report over a dataset directory
#[derive(Debug, Clone, Serialize)]
pub struct DatasetReport {
    /// Per-file facts, in lexicographic path order
    pub files: Vec<FileReport>,
    pub total_rows: usize,
    pub total_size_bytes: u64,
    /// Whether every directory's chunk files share one schema
    pub schema_consistent: bool,
    /// Files exceeding the size limit, when one was given
    pub oversized: Vec<PathBuf>,
}

impl DatasetReport {
    /// Whether the dataset passed every check
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.schema_consistent && self.oversized.is_empty()
    }
}

/// Validate every Parquet file under `dir`
///
/// Walks the directory tree for `*.parquet` files (sorted, so chunk order
/// matches report order), reads each file's metadata, and checks schema
/// consistency within each directory. With `max_size_mb` set, files over
/// the limit are collected in `oversized`.
pub fn validate_dataset(dir: &Path, max_size_mb: Option<f64>) -> Result<DatasetReport> {
    let paths = find_parquet_files(dir)?;
    if paths.is_empty() {
        return Err(Error::validation(format!(
            "no Parquet files found under '{}'",
            dir.display()
        )));
    }

    let size_limit = max_size_mb.map(mb_to_bytes);
    let mut files = Vec::with_capacity(paths.len());
    let mut first_schema_by_dir: HashMap<PathBuf, SchemaRef> = HashMap::new();
    let mut schema_consistent = true;
    let mut oversized = Vec::new();

    for path in paths {
        let (report, schema) = inspect_file(&path)?;
        debug!(path = %path.display(), rows = report.rows, "inspected file");

        let parent = path.parent().unwrap_or(dir).to_path_buf();
        match first_schema_by_dir.get(&parent) {
            Some(first) => {
                if first.as_ref() != schema.as_ref() {
                    schema_consistent = false;
                }
            }
            None => {
                first_schema_by_dir.insert(parent, schema);
            }
        }

        if let Some(limit) = size_limit {
            if report.size_bytes > limit {
                oversized.push(path.clone());
            }
        }

        files.push(report);
    }

    Ok(DatasetReport {
        total_rows: files.iter().map(|f| f.rows).sum(),
        total_size_bytes: files.iter().map(|f| f.size_bytes).sum(),
        files,
        schema_consistent,
        oversized,
    })
}

/// Read up to `limit` records from the start of a Parquet file
pub fn sample_records(path: &Path, limit: usize) -> Result<Vec<JsonValue>> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let reader = builder.with_batch_size(limit.max(1)).build()?;

    let mut records = Vec::new();
    for batch in reader {
        let batch = batch?;
        records.extend(batch_to_records(&batch)?);
        if records.len() >= limit {
            break;
        }
    }
    records.truncate(limit);
    Ok(records)
}

/// Read every record from a Parquet file, in row order
pub fn read_all_records(path: &Path) -> Result<Vec<JsonValue>> {
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut records = Vec::new();
    for batch in reader {
        records.extend(batch_to_records(&batch?)?);
    }
    Ok(records)
}

/// Collect `*.parquet` paths under `dir`, sorted lexicographically
fn find_parquet_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(Error::not_found(dir));
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| path.extension().is_some_and(|ext| ext == "parquet"))
        .collect();
    paths.sort();
    Ok(paths)
}

/// Read one file's metadata without materializing its rows
fn inspect_file(path: &Path) -> Result<(FileReport, SchemaRef)> {
    let size_bytes = fs::metadata(path)?.len();
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let schema = builder.schema().clone();
    let rows = usize::try_from(builder.metadata().file_metadata().num_rows()).unwrap_or(0);
    let columns = schema.fields().iter().map(|f| f.name().clone()).collect();

    Ok((
        FileReport {
            path: path.to_path_buf(),
            rows,
            columns,
            size_bytes,
        },
        schema,
    ))
}
