//! Rows for INSERT statements.

use crate::error::{QbError, QbResult};
use crate::value::Value;
use bytes::Bytes;
use std::collections::BTreeMap;

/// One row to insert.
///
/// Named rows keep their columns sorted by name, so every row of a
/// multi-row insert lists its values in the same column order.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertRow {
    Named(BTreeMap<String, Value>),
    Positional(Vec<Value>),
}

impl InsertRow {
    /// Build a named row from `(column, value)` pairs.
    pub fn named<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        InsertRow::Named(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a positional row.
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        InsertRow::Positional(values.into_iter().map(Into::into).collect())
    }

    /// Column names, in rendering order. Empty for positional rows.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            InsertRow::Named(map) => map.keys().map(String::as_str).collect(),
            InsertRow::Positional(_) => Vec::new(),
        }
    }

    /// Values, in rendering order.
    pub fn values(&self) -> Vec<&Value> {
        match self {
            InsertRow::Named(map) => map.values().collect(),
            InsertRow::Positional(values) => values.iter().collect(),
        }
    }

    /// Serialize the row as one JSON object.
    pub fn to_json(&self) -> QbResult<serde_json::Value> {
        match self {
            InsertRow::Named(map) => {
                let mut object = serde_json::Map::with_capacity(map.len());
                for (column, value) in map {
                    object.insert(column.clone(), value.to_json()?);
                }
                Ok(serde_json::Value::Object(object))
            }
            InsertRow::Positional(_) => Err(QbError::invalid_argument(
                "Positional rows cannot be serialized as JSON objects",
            )),
        }
    }

    /// Serialize rows as newline-delimited JSON (`JSONEachRow`).
    pub fn json_lines(rows: &[InsertRow]) -> QbResult<Bytes> {
        let mut out = Vec::new();
        for row in rows {
            serde_json::to_writer(&mut out, &row.to_json()?)?;
            out.push(b'\n');
        }
        Ok(Bytes::from(out))
    }
}

impl<K: Into<String>, V: Into<Value>> From<BTreeMap<K, V>> for InsertRow {
    fn from(map: BTreeMap<K, V>) -> Self {
        InsertRow::named(map)
    }
}

impl<V: Into<Value>> From<Vec<V>> for InsertRow {
    fn from(values: Vec<V>) -> Self {
        InsertRow::positional(values)
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for InsertRow {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        InsertRow::named(map)
    }
}
