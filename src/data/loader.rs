use std::path::Path;

use arrow::array::{
    Array, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray,
    StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::{Result, SurveyError};
use super::model::{CellValue, Column, RawTable};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a survey table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – flat Parquet file, one field per survey column (recommended)
/// * `.json`    – records orientation: `[{ "column": value, ... }, ...]`
/// * `.csv`     – header row of column names, one survey row per record
///
/// Loading is faithful: names and cells arrive exactly as stored. Header
/// trimming and unit cleanup happen later in
/// [`normalize`](super::normalize::normalize).
pub fn load_file(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => Err(SurveyError::UnsupportedFormat {
            extension: other.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one survey row per record.
/// Cell types are guessed per cell; anything that is not an integer, float
/// or bool stays text, so `"45.2%"` survives for the normalizer to clean.
fn load_csv(path: &Path) -> Result<RawTable> {
    let mut reader =
        csv::Reader::from_path(path).map_err(|e| SurveyError::source_unavailable(path, e))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| SurveyError::source_unavailable(path, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];

    for record in reader.records() {
        let record = record.map_err(|e| SurveyError::source_unavailable(path, e))?;
        for (idx, column) in cells.iter_mut().enumerate() {
            column.push(guess_cell(record.get(idx).unwrap_or("")));
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, cells)| Column::new(name, cells))
        .collect();

    Ok(RawTable::new(columns))
}

fn guess_cell(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Stationing (m)": 0.0,  "OFF PSP (VE V)": -1.05, "Coating Type": "FBE" },
///   { "Stationing (m)": 20.0, "OFF PSP (VE V)": -0.98 }
/// ]
/// ```
///
/// The column set is the union over all records; keys a record lacks become
/// null cells.
fn load_json(path: &Path) -> Result<RawTable> {
    let text =
        std::fs::read_to_string(path).map_err(|e| SurveyError::source_unavailable(path, e))?;
    let root: JsonValue =
        serde_json::from_str(&text).map_err(|e| SurveyError::source_unavailable(path, e))?;

    let Some(records) = root.as_array() else {
        return Err(SurveyError::source_unavailable(
            path,
            "expected a top-level JSON array of row objects",
        ));
    };

    let mut columns: Vec<Column> = Vec::new();

    for (row, record) in records.iter().enumerate() {
        let Some(object) = record.as_object() else {
            return Err(SurveyError::source_unavailable(
                path,
                format!("row {row} is not a JSON object"),
            ));
        };

        for column in &mut columns {
            column
                .cells
                .push(object.get(&column.name).map_or(CellValue::Null, json_cell));
        }
        // Columns first seen on this row are back-filled with nulls.
        for (key, value) in object {
            if columns.iter().any(|c| &c.name == key) {
                continue;
            }
            let mut cells = vec![CellValue::Null; row];
            cells.push(json_cell(value));
            columns.push(Column::new(key.clone(), cells));
        }
    }

    Ok(RawTable::new(columns))
}

fn json_cell(value: &JsonValue) -> CellValue {
    match value {
        JsonValue::Null => CellValue::Null,
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::String(s) => CellValue::Text(s.clone()),
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet file, one field per survey column.
///
/// Supported field types: Float64/Float32, Int64/Int32, Utf8/LargeUtf8 and
/// Boolean. Other field types are skipped with a warning rather than failing
/// the whole file. Works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).map_err(|e| SurveyError::source_unavailable(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| SurveyError::source_unavailable(path, e))?;
    let reader = builder
        .build()
        .map_err(|e| SurveyError::source_unavailable(path, e))?;

    let mut batches = Vec::new();
    for batch in reader {
        batches.push(batch.map_err(|e| SurveyError::source_unavailable(path, e))?);
    }
    let Some(first) = batches.first() else {
        return Ok(RawTable::new(Vec::new()));
    };

    let schema = first.schema();
    let mut columns = Vec::new();

    for (idx, field) in schema.fields().iter().enumerate() {
        if !supported_field_type(field.data_type()) {
            log::warn!(
                "Skipping parquet column '{}': unsupported type {:?}",
                field.name(),
                field.data_type()
            );
            continue;
        }

        let mut cells = Vec::new();
        for batch in &batches {
            let array = batch.column(idx);
            for row in 0..array.len() {
                cells.push(arrow_cell(array.as_ref(), row));
            }
        }
        columns.push(Column::new(field.name().clone(), cells));
    }

    Ok(RawTable::new(columns))
}

// -- Parquet / Arrow helpers --

fn supported_field_type(dt: &DataType) -> bool {
    matches!(
        dt,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::Utf8
            | DataType::LargeUtf8
            | DataType::Boolean
    )
}

/// Extract a single cell from an Arrow column at a given row. The column's
/// type has already passed [`supported_field_type`], so the downcasts hold.
fn arrow_cell(col: &dyn Array, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            CellValue::Float(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            CellValue::Float(arr.value(row) as f64)
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            CellValue::Integer(arr.value(row))
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            CellValue::Integer(arr.value(row) as i64)
        }
        DataType::Utf8 => {
            let arr = col.as_any().downcast_ref::<StringArray>().unwrap();
            CellValue::Text(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => {
            let arr = col.as_any().downcast_ref::<LargeStringArray>().unwrap();
            CellValue::Text(arr.value(row).to_string())
        }
        DataType::Boolean => {
            let arr = col.as_any().downcast_ref::<BooleanArray>().unwrap();
            CellValue::Bool(arr.value(row))
        }
        other => {
            log::warn!("Unexpected parquet cell type {other:?}");
            CellValue::Null
        }
    }
}
