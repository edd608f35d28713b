//! Conversion of MySQL rows into [`Record`]s.

use idlookup_core::Record;
use serde_json::Value;
use sqlx::mysql::MySqlRow;
use sqlx::{Column, Row, ValueRef};

/// Decode every column of `row`, keeping select-list order.
///
/// Columns are tried as text, signed and unsigned integers, floats, native
/// JSON, then raw bytes (decoded lossily as UTF-8). `NULL` becomes
/// [`Value::Null`].
pub fn record_from_row(row: &MySqlRow) -> Result<Record, sqlx::Error> {
    let mut record = Record::new();
    for (index, column) in row.columns().iter().enumerate() {
        record.insert(column.name(), column_value(row, index)?);
    }
    Ok(record)
}

fn column_value(row: &MySqlRow, index: usize) -> Result<Value, sqlx::Error> {
    if row.try_get_raw(index)?.is_null() {
        return Ok(Value::Null);
    }
    if let Ok(text) = row.try_get::<String, _>(index) {
        return Ok(Value::String(text));
    }
    if let Ok(n) = row.try_get::<i64, _>(index) {
        return Ok(Value::from(n));
    }
    if let Ok(n) = row.try_get::<u64, _>(index) {
        return Ok(Value::from(n));
    }
    if let Ok(n) = row.try_get::<f64, _>(index) {
        return Ok(Value::from(n));
    }
    if let Ok(json) = row.try_get::<Value, _>(index) {
        return Ok(json);
    }
    let bytes = row.try_get::<Vec<u8>, _>(index)?;
    Ok(Value::String(String::from_utf8_lossy(&bytes).into_owned()))
}
