//! Arrow schema inference and JSON to Arrow conversion
//!
//! A dataset gets exactly one schema, inferred up front over all records,
//! and every chunk is encoded under that schema. Field order is the order
//! fields are first seen, so column layout is identical across chunk files.

use crate::error::{Error, Result};
use crate::types::JsonValue;
use arrow::array::{
    ArrayRef, BooleanArray, Float64Array, Int64Array, ListArray, NullArray, StringArray,
    StructArray,
};
use arrow::buffer::OffsetBuffer;
use arrow::datatypes::{DataType, Field, Fields, Schema};
use arrow::record_batch::RecordBatch;
use std::collections::HashMap;
use std::sync::Arc;

/// Infer an Arrow schema from a set of JSON records
///
/// All fields are nullable; records missing a field contribute a null.
/// Conflicting types are merged: Null merges with anything, mixed
/// Int64/Float64 becomes Float64, anything else falls back to Utf8.
pub fn infer_schema(records: &[JsonValue]) -> Result<Schema> {
    if records.is_empty() {
        return Ok(Schema::empty());
    }

    // Field order is first-seen order so every chunk gets the same layout
    let mut field_order: Vec<String> = Vec::new();
    let mut field_types: HashMap<String, DataType> = HashMap::new();

    for record in records {
        if let JsonValue::Object(obj) = record {
            for (key, value) in obj {
                let inferred = infer_type(value);
                match field_types.get_mut(key) {
                    Some(existing) => {
                        *existing = merge_types(existing, &inferred);
                    }
                    None => {
                        field_order.push(key.clone());
                        field_types.insert(key.clone(), inferred);
                    }
                }
            }
        }
    }

    let fields: Vec<Field> = field_order
        .into_iter()
        .map(|name| {
            let dtype = field_types.remove(&name).unwrap_or(DataType::Null);
            Field::new(name, dtype, true)
        })
        .collect();

    Ok(Schema::new(fields))
}

/// Convert JSON records to an Arrow RecordBatch under a known schema
///
/// The schema comes from [`infer_schema`] over the whole dataset; passing it
/// explicitly keeps chunk batches structurally identical.
pub fn records_to_batch(records: &[JsonValue], schema: &Schema) -> Result<RecordBatch> {
    if records.is_empty() {
        return Ok(RecordBatch::new_empty(Arc::new(schema.clone())));
    }

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());

    for field in schema.fields() {
        let values: Vec<Option<&JsonValue>> = records
            .iter()
            .map(|record| {
                if let JsonValue::Object(obj) = record {
                    obj.get(field.name())
                } else {
                    None
                }
            })
            .collect();

        columns.push(build_array(&values, field.data_type())?);
    }

    RecordBatch::try_new(Arc::new(schema.clone()), columns).map_err(|e| Error::Output {
        message: format!("Failed to create RecordBatch: {e}"),
    })
}

/// Infer Arrow DataType from a JSON value
fn infer_type(value: &JsonValue) -> DataType {
    match value {
        JsonValue::Null => DataType::Null,
        JsonValue::Bool(_) => DataType::Boolean,
        JsonValue::Number(n) => {
            if n.is_i64() {
                DataType::Int64
            } else {
                DataType::Float64
            }
        }
        JsonValue::String(_) => DataType::Utf8,
        JsonValue::Array(arr) => {
            // Infer the element type from the first non-null element
            let element_type = arr
                .iter()
                .find(|v| !v.is_null())
                .map_or(DataType::Null, infer_type);
            DataType::List(Arc::new(Field::new("item", element_type, true)))
        }
        JsonValue::Object(obj) => {
            let fields: Vec<Field> = obj
                .iter()
                .map(|(k, v)| Field::new(k, infer_type(v), true))
                .collect();
            DataType::Struct(Fields::from(fields))
        }
    }
}

/// Merge two data types into a compatible type
fn merge_types(type1: &DataType, type2: &DataType) -> DataType {
    match (type1, type2) {
        (a, b) if a == b => a.clone(),

        (DataType::Null, other) | (other, DataType::Null) => other.clone(),

        (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
            DataType::Float64
        }

        // Anything else falls back to the string representation
        _ => DataType::Utf8,
    }
}

/// Build an Arrow array from JSON values
fn build_array(values: &[Option<&JsonValue>], data_type: &DataType) -> Result<ArrayRef> {
    match data_type {
        DataType::Null => Ok(Arc::new(NullArray::new(values.len()))),

        DataType::Boolean => {
            let arr: BooleanArray = values
                .iter()
                .map(|v| v.and_then(JsonValue::as_bool))
                .collect();
            Ok(Arc::new(arr))
        }

        DataType::Int64 => {
            let arr: Int64Array = values
                .iter()
                .map(|v| v.and_then(JsonValue::as_i64))
                .collect();
            Ok(Arc::new(arr))
        }

        DataType::Float64 => {
            let arr: Float64Array = values
                .iter()
                .map(|v| v.and_then(|v| v.as_f64().or_else(|| v.as_i64().map(|i| i as f64))))
                .collect();
            Ok(Arc::new(arr))
        }

        DataType::Utf8 => {
            let arr: StringArray = values
                .iter()
                .map(|v| {
                    v.map(|v| match v {
                        JsonValue::String(s) => s.clone(),
                        _ => v.to_string(),
                    })
                })
                .collect();
            Ok(Arc::new(arr))
        }

        DataType::List(field) => build_list_array(values, field),

        DataType::Struct(fields) => build_struct_array(values, fields),

        other => Err(Error::SchemaInference {
            message: format!("unsupported inferred type: {other}"),
        }),
    }
}

/// Build a list array from JSON arrays
fn build_list_array(values: &[Option<&JsonValue>], field: &Arc<Field>) -> Result<ArrayRef> {
    let mut all_items: Vec<Option<&JsonValue>> = Vec::new();
    let mut offsets: Vec<i32> = vec![0];

    for value in values {
        if let Some(JsonValue::Array(arr)) = value {
            for item in arr {
                all_items.push(Some(item));
            }
        }
        // Null and non-array rows get an empty slot; every row needs an offset
        let offset = i32::try_from(all_items.len()).map_err(|_| Error::Output {
            message: "Array too large for i32 offset".to_string(),
        })?;
        offsets.push(offset);
    }

    let items_array = build_array(&all_items, field.data_type())?;
    let offset_buffer = OffsetBuffer::new(offsets.into());

    let list_array = ListArray::new(Arc::clone(field), offset_buffer, items_array, None);
    Ok(Arc::new(list_array))
}

/// Build a struct array from JSON objects
fn build_struct_array(values: &[Option<&JsonValue>], fields: &Fields) -> Result<ArrayRef> {
    let mut child_arrays: Vec<ArrayRef> = Vec::with_capacity(fields.len());

    for field in fields {
        let child_values: Vec<Option<&JsonValue>> = values
            .iter()
            .map(|v| {
                v.and_then(|v| {
                    if let JsonValue::Object(obj) = v {
                        obj.get(field.name())
                    } else {
                        None
                    }
                })
            })
            .collect();

        child_arrays.push(build_array(&child_values, field.data_type())?);
    }

    let struct_array = StructArray::new(fields.clone(), child_arrays, None);
    Ok(Arc::new(struct_array))
}

/// Convert an Arrow RecordBatch back to JSON records
///
/// Covers the types [`infer_schema`] produces; used when sampling written
/// shards for validation and in round-trip tests.
pub fn batch_to_records(batch: &RecordBatch) -> Result<Vec<JsonValue>> {
    let schema = batch.schema();
    let num_rows = batch.num_rows();
    let mut records = Vec::with_capacity(num_rows);

    for row_idx in 0..num_rows {
        let mut record = serde_json::Map::new();

        for (col_idx, field) in schema.fields().iter().enumerate() {
            let column = batch.column(col_idx);
            let value = array_value_to_json(column.as_ref(), row_idx)?;
            record.insert(field.name().clone(), value);
        }

        records.push(JsonValue::Object(record));
    }

    Ok(records)
}

/// Convert a single array element to JSON
fn array_value_to_json(array: &dyn arrow::array::Array, row: usize) -> Result<JsonValue> {
    use arrow::array::Array;

    if array.is_null(row) {
        return Ok(JsonValue::Null);
    }

    match array.data_type() {
        DataType::Null => Ok(JsonValue::Null),

        DataType::Boolean => {
            let arr = downcast::<BooleanArray>(array, "BooleanArray")?;
            Ok(JsonValue::Bool(arr.value(row)))
        }

        DataType::Int64 => {
            let arr = downcast::<Int64Array>(array, "Int64Array")?;
            Ok(JsonValue::Number(arr.value(row).into()))
        }

        DataType::Float64 => {
            let arr = downcast::<Float64Array>(array, "Float64Array")?;
            let val = arr.value(row);
            Ok(serde_json::Number::from_f64(val).map_or(JsonValue::Null, JsonValue::Number))
        }

        DataType::Utf8 => {
            let arr = downcast::<StringArray>(array, "StringArray")?;
            Ok(JsonValue::String(arr.value(row).to_string()))
        }

        DataType::List(_) => {
            let arr = downcast::<ListArray>(array, "ListArray")?;
            let values = arr.value(row);
            let mut items = Vec::with_capacity(values.len());
            for i in 0..values.len() {
                items.push(array_value_to_json(values.as_ref(), i)?);
            }
            Ok(JsonValue::Array(items))
        }

        DataType::Struct(_) => {
            let arr = downcast::<StructArray>(array, "StructArray")?;
            let mut obj = serde_json::Map::new();
            for (i, field) in arr.fields().iter().enumerate() {
                let col = arr.column(i);
                obj.insert(field.name().clone(), array_value_to_json(col.as_ref(), row)?);
            }
            Ok(JsonValue::Object(obj))
        }

        other => Err(Error::Output {
            message: format!("unsupported Arrow type when reading rows: {other}"),
        }),
    }
}

/// Downcast a dynamic array reference, with a descriptive error on mismatch
fn downcast<'a, T: 'static>(array: &'a dyn arrow::array::Array, name: &str) -> Result<&'a T> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| Error::Output {
        message: format!("Failed to downcast to {name}"),
    })
}
