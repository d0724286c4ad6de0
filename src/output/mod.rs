//! Output module
//!
//! Handles Arrow RecordBatch creation and Parquet file writing.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Inferring one Arrow schema for a whole dataset
//! - Converting JSON records to Arrow RecordBatches under that schema
//! - Writing Parquet files
//! - Reading rows back out of a RecordBatch for validation

mod schema;
mod writer;

pub use schema::{batch_to_records, infer_schema, records_to_batch};
pub use writer::{write_batch_to_parquet, ParquetWriter, ParquetWriterConfig};
