//! Shapes result rows into resources.

use std::collections::HashMap;

use serde_json::Value;
use tokio_postgres::Row;
use tsm_query::{Datasource, Datastream, Properties, QueryError, Result, Thing};

/// A row of data as column name → JSON value
pub type DataRow = HashMap<String, Value>;

/// Convert a PostgreSQL row to a DataRow
pub fn row_to_datarow(row: &Row) -> DataRow {
    row.columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| (column.name().to_string(), extract_value(row, idx)))
        .collect()
}

/// Extract a column value, dispatching on the Postgres type name
fn extract_value(row: &Row, idx: usize) -> Value {
    let type_name = row.columns()[idx].type_().name();

    match type_name {
        "bool" => row
            .try_get::<_, Option<bool>>(idx)
            .ok()
            .flatten()
            .map(Value::Bool)
            .unwrap_or(Value::Null),

        "int2" => row
            .try_get::<_, Option<i16>>(idx)
            .ok()
            .flatten()
            .map(|v| Value::Number(v.into()))
            .unwrap_or(Value::Null),

        "int4" => row
            .try_get::<_, Option<i32>>(idx)
            .ok()
            .flatten()
            .map(|v| Value::Number(v.into()))
            .unwrap_or(Value::Null),

        "int8" => row
            .try_get::<_, Option<i64>>(idx)
            .ok()
            .flatten()
            .map(|v| Value::Number(v.into()))
            .unwrap_or(Value::Null),

        "float4" => row
            .try_get::<_, Option<f32>>(idx)
            .ok()
            .flatten()
            .and_then(|v| serde_json::Number::from_f64(v as f64))
            .map(Value::Number)
            .unwrap_or(Value::Null),

        "float8" => row
            .try_get::<_, Option<f64>>(idx)
            .ok()
            .flatten()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),

        "varchar" | "text" | "char" | "bpchar" | "name" => row
            .try_get::<_, Option<String>>(idx)
            .ok()
            .flatten()
            .map(Value::String)
            .unwrap_or(Value::Null),

        "timestamp" => row
            .try_get::<_, Option<chrono::NaiveDateTime>>(idx)
            .ok()
            .flatten()
            .map(|v| Value::String(v.format("%Y-%m-%dT%H:%M:%S%.f").to_string()))
            .unwrap_or(Value::Null),

        "timestamptz" => row
            .try_get::<_, Option<chrono::DateTime<chrono::Utc>>>(idx)
            .ok()
            .flatten()
            .map(|v| Value::String(v.to_rfc3339()))
            .unwrap_or(Value::Null),

        "json" | "jsonb" => row
            .try_get::<_, Option<Value>>(idx)
            .ok()
            .flatten()
            .unwrap_or(Value::Null),

        "uuid" => row
            .try_get::<_, Option<uuid::Uuid>>(idx)
            .ok()
            .flatten()
            .map(|v| Value::String(v.to_string()))
            .unwrap_or(Value::Null),

        // Unknown types are tried as text
        _ => row
            .try_get::<_, Option<String>>(idx)
            .ok()
            .flatten()
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}

/// Identity field: text stays text, numbers are rendered as text
fn id_field(row: &DataRow) -> Result<String> {
    match row.get("id") {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        other => Err(QueryError::Projection(format!(
            "row has no usable id: {:?}",
            other
        ))),
    }
}

fn text_field(row: &DataRow, column: &str) -> Result<String> {
    match row.get(column) {
        Some(Value::String(s)) => Ok(s.clone()),
        other => Err(QueryError::Projection(format!(
            "column '{}' is not text: {:?}",
            column, other
        ))),
    }
}

fn optional_text_field(row: &DataRow, column: &str) -> Option<String> {
    match row.get(column) {
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    }
}

/// JSON objects pass through unchanged; SQL NULL is an empty bag
fn properties_field(row: &DataRow) -> Result<Properties> {
    match row.get("properties") {
        None | Some(Value::Null) => Ok(Properties::new()),
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(other) => Err(QueryError::Projection(format!(
            "properties must be a JSON object, got {}",
            other
        ))),
    }
}

pub fn project_datasource(row: &DataRow) -> Result<Datasource> {
    Ok(Datasource::from_schema(id_field(row)?))
}

pub fn project_thing(row: &DataRow) -> Result<Thing> {
    Ok(Thing {
        id: id_field(row)?,
        name: text_field(row, "name")?,
        description: optional_text_field(row, "description"),
        properties: properties_field(row)?,
    })
}

pub fn project_datastream(row: &DataRow) -> Result<Datastream> {
    Ok(Datastream {
        id: id_field(row)?,
        name: text_field(row, "name")?,
        description: optional_text_field(row, "description"),
        properties: properties_field(row)?,
    })
}
