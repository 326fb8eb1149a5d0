//! Executor boundary: the trait a ClickHouse transport implements, and the
//! values that cross it.

use crate::enums::Format;
use crate::error::QbResult;
use bytes::Bytes;
use futures_util::future::try_join_all;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Per-query ClickHouse settings (`max_execution_time`, `max_threads`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings(BTreeMap<String, String>);

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one setting (builder style).
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.insert(key.into(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Copy every entry of `other` over this map.
    pub fn merge(&mut self, other: &Settings) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Opaque payload of a file. The crate never reads it.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Path(PathBuf),
    Memory(Bytes),
}

impl From<PathBuf> for DataSource {
    fn from(v: PathBuf) -> Self {
        DataSource::Path(v)
    }
}

impl From<Bytes> for DataSource {
    fn from(v: Bytes) -> Self {
        DataSource::Memory(v)
    }
}

impl From<Vec<u8>> for DataSource {
    fn from(v: Vec<u8>) -> Self {
        DataSource::Memory(Bytes::from(v))
    }
}

impl From<String> for DataSource {
    fn from(v: String) -> Self {
        DataSource::Memory(Bytes::from(v))
    }
}

impl From<&'static str> for DataSource {
    fn from(v: &'static str) -> Self {
        DataSource::Memory(Bytes::from_static(v.as_bytes()))
    }
}

/// A named file handle attached to a query as an external table.
#[derive(Debug, Clone, PartialEq)]
pub struct TempTable {
    name: String,
    source: DataSource,
    structure: Vec<(String, String)>,
    format: Option<Format>,
}

impl TempTable {
    pub fn new(name: impl Into<String>, source: impl Into<DataSource>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            structure: Vec::new(),
            format: None,
        }
    }

    /// Column structure as `(name, type)` pairs.
    pub fn with_structure<I, N, T>(mut self, structure: I) -> Self
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: Into<String>,
    {
        self.structure = structure
            .into_iter()
            .map(|(n, t)| (n.into(), t.into()))
            .collect();
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub fn structure(&self) -> &[(String, String)] {
        &self.structure
    }

    pub fn format(&self) -> Option<Format> {
        self.format
    }
}

/// Compiled SELECT with everything the executor needs to run it.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub files: Vec<TempTable>,
    pub settings: Settings,
}

impl CompiledQuery {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            files: Vec::new(),
            settings: Settings::default(),
        }
    }
}

/// One result row as returned by ClickHouse JSON formats.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Rows returned for one statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    rows: Vec<Row>,
}

impl RowSet {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Deserialize every row into `T`.
    pub fn deserialize<T: DeserializeOwned>(self) -> QbResult<Vec<T>> {
        self.rows
            .into_iter()
            .map(|row| serde_json::from_value(serde_json::Value::Object(row)).map_err(Into::into))
            .collect()
    }
}

impl From<Vec<Row>> for RowSet {
    fn from(rows: Vec<Row>) -> Self {
        Self::new(rows)
    }
}

/// A ClickHouse transport.
///
/// Implementors own the network: HTTP or native protocol, retries, pooling,
/// result decoding into JSON rows. The builder only hands over SQL text,
/// attached files and settings.
pub trait ClickhouseClient: Send + Sync {
    /// Run one SELECT and return its rows.
    fn select(
        &self,
        query: &CompiledQuery,
    ) -> impl std::future::Future<Output = QbResult<RowSet>> + Send;

    /// Run several independent SELECTs; results keep the input order.
    ///
    /// The default implementation dispatches every query concurrently via
    /// [`ClickhouseClient::select`].
    fn select_batch(
        &self,
        queries: &[CompiledQuery],
    ) -> impl std::future::Future<Output = QbResult<Vec<RowSet>>> + Send {
        try_join_all(queries.iter().map(|query| self.select(query)))
    }

    /// Run a statement that returns no rows (INSERT, ALTER ... DELETE, DDL).
    ///
    /// `payload` carries the data for `INSERT ... FORMAT <fmt>` statements.
    fn write(
        &self,
        sql: &str,
        payload: Option<&DataSource>,
    ) -> impl std::future::Future<Output = QbResult<bool>> + Send;
}
