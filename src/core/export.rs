//! Tabular projection of harvested records.
//!
//! Column order is the configured field order for every configured field that
//! shows up in at least one record, followed by any other key in the order it
//! was first seen. Missing keys and JSON `null` become empty cells; strings
//! are written verbatim and every other value as compact JSON.

use crate::domain::model::Record;
use crate::utils::error::{EtlError, Result};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashSet;

pub fn column_order(records: &[Record], configured: &[String]) -> Vec<String> {
    let observed: HashSet<&str> = records
        .iter()
        .flat_map(|record| record.data.keys().map(String::as_str))
        .collect();

    let mut columns = Vec::new();
    let mut placed: HashSet<&str> = HashSet::new();

    for field in configured {
        if observed.contains(field.as_str()) && placed.insert(field.as_str()) {
            columns.push(field.clone());
        }
    }

    for record in records {
        for key in record.data.keys() {
            if placed.insert(key.as_str()) {
                columns.push(key.clone());
            }
        }
    }

    // Records exist but none carried a key: keep one row per record.
    if columns.is_empty() && !records.is_empty() {
        return configured.to_vec();
    }

    columns
}

pub fn render_cell(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        None | Some(Value::Null) => Cow::Borrowed(""),
        Some(Value::String(text)) => Cow::Borrowed(text.as_str()),
        Some(other) => Cow::Owned(other.to_string()),
    }
}

/// Writes header plus one row per record. With no columns (no records) the
/// output is empty.
pub fn write_csv(records: &[Record], columns: &[String]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    if !columns.is_empty() {
        writer.write_record(columns)?;
        for record in records {
            writer.write_record(columns.iter().map(|column| {
                render_cell(record.get(column)).into_owned()
            }))?;
        }
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}
