use crate::domain::model::{ExportRecord, ExportTarget, Payload};
use crate::domain::ports::Storage;
use crate::utils::error::{ExportError, Result};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::PathBuf;

/// Field name used when a scalar payload is wrapped into a record.
pub const SCALAR_FIELD: &str = "value";

/// The three payload shapes the exporter distinguishes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PayloadShape<'a> {
    Sequence(&'a [Value]),
    Keyed(&'a Map<String, Value>),
    Scalar(&'a Value),
}

impl<'a> PayloadShape<'a> {
    pub fn of(payload: &'a Payload) -> Self {
        match payload {
            Value::Array(items) => PayloadShape::Sequence(items),
            Value::Object(map) => PayloadShape::Keyed(map),
            other => PayloadShape::Scalar(other),
        }
    }
}

/// Arrays pass through, objects become a single record, scalars are wrapped as `{"value": x}`.
pub fn to_records(payload: &Payload) -> Vec<ExportRecord> {
    match PayloadShape::of(payload) {
        PayloadShape::Sequence(items) => items.to_vec(),
        PayloadShape::Keyed(map) => vec![Value::Object(map.clone())],
        PayloadShape::Scalar(value) => {
            let mut record = Map::new();
            record.insert(SCALAR_FIELD.to_string(), value.clone());
            vec![Value::Object(record)]
        }
    }
}

/// Pretty JSON with two-space indentation and no trailing newline.
pub fn render_json(payload: &Payload) -> Result<String> {
    Ok(serde_json::to_string_pretty(payload)?)
}

/// Lays the records out as a CSV table.
///
/// Columns are the union of all record keys in first-seen order. Missing keys
/// and nulls give empty cells, nested values are written as compact JSON.
pub fn render_csv(records: &[ExportRecord]) -> Result<String> {
    if records.is_empty() {
        return Err(ExportError::FormatError {
            message: "no records to export, cannot derive CSV columns".to_string(),
        });
    }

    let mut rows = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        match record {
            Value::Object(map) => rows.push(map),
            other => {
                return Err(ExportError::FormatError {
                    message: format!(
                        "record {} is {}, expected an object",
                        index,
                        describe(other)
                    ),
                })
            }
        }
    }

    let mut seen = HashSet::new();
    let mut columns: Vec<&str> = Vec::new();
    for row in &rows {
        for key in row.keys() {
            if seen.insert(key.as_str()) {
                columns.push(key.as_str());
            }
        }
    }

    if columns.is_empty() {
        return Err(ExportError::FormatError {
            message: "records have no fields, cannot derive CSV columns".to_string(),
        });
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&columns)?;
    for row in &rows {
        writer.write_record(columns.iter().map(|column| cell(row.get(*column))))?;
    }

    let bytes = writer.into_inner().map_err(|e| ExportError::FormatError {
        message: e.error().to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| ExportError::FormatError {
        message: e.to_string(),
    })
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Writes payloads to an [`ExportTarget`] through a [`Storage`] backend.
pub struct Exporter<S: Storage> {
    storage: S,
}

impl<S: Storage> Exporter<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub async fn prepare(&self, target: &ExportTarget) -> Result<()> {
        self.storage.create_dir_all(target.directory()).await
    }

    /// Writes the payload untouched to `<directory>/<base_name>.json`.
    pub async fn export_json(&self, payload: &Payload, target: &ExportTarget) -> Result<PathBuf> {
        let path = target.file_path("json");
        let document = render_json(payload)?;
        self.storage.write_file(&path, document.as_bytes()).await?;
        Ok(path)
    }

    /// Normalizes the payload and writes it as a table to `<directory>/<base_name>.csv`.
    pub async fn export_csv(&self, payload: &Payload, target: &ExportTarget) -> Result<PathBuf> {
        let path = target.file_path("csv");
        let table = render_csv(&to_records(payload))?;
        self.storage.write_file(&path, table.as_bytes()).await?;
        Ok(path)
    }
}
