/// Statement classification and result values.
///
/// This module decides whether a statement returns rows or an affected-row
/// count, and converts driver-level column data from both backends into one
/// small dynamic value type for display.
use crate::core::error::Result;
use rusqlite::types::ValueRef;

/// A single column value as reported by either backend driver.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl std::fmt::Display for Value {
    /// Renders the value as it appears in a result row: text single-quoted
    /// (embedded quotes doubled), NULL spelled out, blobs by size only.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Text(t) => write!(f, "'{}'", t.replace('\'', "''")),
            Value::Blob(b) => write!(f, "<BLOB: {} bytes>", b.len()),
        }
    }
}

/// The result of executing one SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    /// Ordered rows from a read statement. May be empty, but a read
    /// statement never yields `Affected`.
    Rows(Vec<Vec<Value>>),
    /// Affected-row count reported by the driver for any other statement.
    Affected(u64),
}

/// Returns true when the statement takes the read path.
///
/// The contract is a literal prefix test on the trimmed, upper-cased text;
/// no parsing happens anywhere in the crate.
pub fn is_select(sql: &str) -> bool {
    sql.trim().to_uppercase().starts_with("SELECT")
}

/// Collects one SQLite row into values. Runs inside `query_map`, so it
/// reports the driver's own error type.
pub(crate) fn sqlite_row_values(
    row: &rusqlite::Row,
    column_count: usize,
) -> rusqlite::Result<Vec<Value>> {
    let mut values = Vec::with_capacity(column_count);
    for idx in 0..column_count {
        values.push(value_from_sqlite(row.get_ref(idx)?));
    }
    Ok(values)
}

fn value_from_sqlite(value: ValueRef) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).to_string()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    }
}

/// Collects one PostgreSQL row into values.
pub(crate) fn pg_row_values(row: &postgres::Row) -> Result<Vec<Value>> {
    (0..row.len()).map(|idx| pg_value(row, idx)).collect()
}

/// Extracts one column by the type name the server reports. NULLs come
/// back as `Option::None` for every arm. Types outside the mapped set are
/// tried as text and otherwise render as NULL rather than failing the row.
fn pg_value(row: &postgres::Row, idx: usize) -> Result<Value> {
    let type_name = row.columns()[idx].type_().name();
    let value = match type_name {
        "bool" => row
            .try_get::<_, Option<bool>>(idx)?
            .map(Value::Bool)
            .unwrap_or(Value::Null),
        "int2" => row
            .try_get::<_, Option<i16>>(idx)?
            .map(|v| Value::Integer(v.into()))
            .unwrap_or(Value::Null),
        "int4" => row
            .try_get::<_, Option<i32>>(idx)?
            .map(|v| Value::Integer(v.into()))
            .unwrap_or(Value::Null),
        "int8" => row
            .try_get::<_, Option<i64>>(idx)?
            .map(Value::Integer)
            .unwrap_or(Value::Null),
        "float4" => row
            .try_get::<_, Option<f32>>(idx)?
            .map(|v| Value::Real(v.into()))
            .unwrap_or(Value::Null),
        "float8" => row
            .try_get::<_, Option<f64>>(idx)?
            .map(Value::Real)
            .unwrap_or(Value::Null),
        "text" | "varchar" | "bpchar" | "name" => row
            .try_get::<_, Option<String>>(idx)?
            .map(Value::Text)
            .unwrap_or(Value::Null),
        "bytea" => row
            .try_get::<_, Option<Vec<u8>>>(idx)?
            .map(Value::Blob)
            .unwrap_or(Value::Null),
        "date" => row
            .try_get::<_, Option<chrono::NaiveDate>>(idx)?
            .map(|v| Value::Text(v.to_string()))
            .unwrap_or(Value::Null),
        "time" => row
            .try_get::<_, Option<chrono::NaiveTime>>(idx)?
            .map(|v| Value::Text(v.to_string()))
            .unwrap_or(Value::Null),
        "timestamp" => row
            .try_get::<_, Option<chrono::NaiveDateTime>>(idx)?
            .map(|v| Value::Text(v.to_string()))
            .unwrap_or(Value::Null),
        "timestamptz" => row
            .try_get::<_, Option<chrono::DateTime<chrono::Utc>>>(idx)?
            .map(|v| Value::Text(v.to_string()))
            .unwrap_or(Value::Null),
        _ => row
            .try_get::<_, Option<String>>(idx)
            .ok()
            .flatten()
            .map(Value::Text)
            .unwrap_or(Value::Null),
    };
    Ok(value)
}
