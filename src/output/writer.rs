//! Parquet file writer
//!
//! Thin wrapper around `parquet`'s ArrowWriter for writing one RecordBatch
//! per output file. Chunk files are small enough that a chunk is always a
//! single batch.

use crate::error::{Error, Result};
use arrow::datatypes::Schema;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Configuration for Parquet writer
#[derive(Debug, Clone)]
pub struct ParquetWriterConfig {
    compression: Compression,
    row_group_size: usize,
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: 1024 * 1024, // 1M rows
        }
    }
}

impl ParquetWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set row group size
    #[must_use]
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Use no compression
    #[must_use]
    pub fn uncompressed(mut self) -> Self {
        self.compression = Compression::UNCOMPRESSED;
        self
    }

    /// Get row group size
    #[must_use]
    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }

    /// Build writer properties
    fn build_properties(&self) -> WriterProperties {
        WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build()
    }
}

/// Parquet file writer
pub struct ParquetWriter {
    writer: ArrowWriter<File>,
    rows_written: usize,
}

impl ParquetWriter {
    /// Create a new Parquet writer
    pub fn new(
        path: impl AsRef<Path>,
        schema: &Schema,
        config: &ParquetWriterConfig,
    ) -> Result<Self> {
        let file = File::create(path.as_ref()).map_err(|e| Error::Output {
            message: format!("Failed to create file '{}': {e}", path.as_ref().display()),
        })?;

        let props = config.build_properties();
        let writer =
            ArrowWriter::try_new(file, Arc::new(schema.clone()), Some(props)).map_err(|e| {
                Error::Output {
                    message: format!("Failed to create Parquet writer: {e}"),
                }
            })?;

        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    /// Write a RecordBatch to the file
    pub fn write(&mut self, batch: &RecordBatch) -> Result<()> {
        self.writer.write(batch).map_err(|e| Error::Output {
            message: format!("Failed to write batch: {e}"),
        })?;

        self.rows_written += batch.num_rows();
        Ok(())
    }

    /// Get the number of rows written so far
    #[must_use]
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Close the writer and finalize the file
    pub fn close(self) -> Result<usize> {
        let rows = self.rows_written;
        self.writer.close().map_err(|e| Error::Output {
            message: format!("Failed to close Parquet writer: {e}"),
        })?;
        Ok(rows)
    }
}

/// Write a single RecordBatch to a Parquet file, returning the row count
pub fn write_batch_to_parquet(
    path: impl AsRef<Path>,
    batch: &RecordBatch,
    config: &ParquetWriterConfig,
) -> Result<usize> {
    let mut writer = ParquetWriter::new(path, batch.schema().as_ref(), config)?;
    writer.write(batch)?;
    writer.close()
}
