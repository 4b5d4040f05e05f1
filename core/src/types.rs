//! Data model shared by the connector, the catalog and the interactive session.
//!
//! The types here carry no I/O. Result rows keep their column order in a
//! single shared header per result set, so looking a value up by column
//! name never depends on per-row bookkeeping.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A single cell value as reported by the storage engine.
///
/// # Examples
///
/// ```
/// use ocean_explorer_core::Value;
///
/// assert_eq!(Value::Null.to_string(), "NULL");
/// assert_eq!(Value::Integer(42).to_string(), "42");
/// assert_eq!(Value::Blob(vec![0, 1, 2]).to_string(), "<blob 3 bytes>");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Returns the integer payload, if this is an integer cell.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the text payload, if this is a text cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Real(x) => write!(f, "{x:?}"),
            Value::Text(s) => f.write_str(s),
            Value::Blob(bytes) => write!(f, "<blob {} bytes>", bytes.len()),
        }
    }
}

/// One result row: an ordered mapping from column name to value.
///
/// The column header is shared with every other row of the same
/// [`RowSet`]; only the values are stored per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    /// Creates a row over a shared header.
    ///
    /// Missing trailing values are filled with [`Value::Null`] and surplus
    /// values are dropped, so a row always matches its header width.
    pub fn new(columns: Arc<[String]>, mut values: Vec<Value>) -> Self {
        values.resize(columns.len(), Value::Null);
        Self { columns, values }
    }

    /// Looks up a value by column name (first match wins on duplicates).
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|name| name == column)
            .map(|idx| &self.values[idx])
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Iterates `(column, value)` pairs in declared column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

/// An ordered sequence of rows sharing one column header.
///
/// # Examples
///
/// ```
/// use ocean_explorer_core::{RowSet, Value};
///
/// let mut rows = RowSet::new(vec!["id".into(), "name".into()]);
/// rows.push(vec![Value::Integer(1), Value::Text("alpha".into())]);
/// rows.push(vec![Value::Integer(2), Value::Text("beta".into())]);
///
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows.rows()[1].get("name"), Some(&Value::Text("beta".into())));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RowSet {
    columns: Arc<[String]>,
    rows: Vec<Row>,
}

impl RowSet {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns: columns.into(),
            rows: Vec::new(),
        }
    }

    /// Appends a row of values under this set's header.
    pub fn push(&mut self, values: Vec<Value>) {
        self.rows.push(Row::new(Arc::clone(&self.columns), values));
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the first row's first value, the usual shape of a
    /// `SELECT COUNT(*)` style query.
    pub fn scalar(&self) -> Option<&Value> {
        self.rows.first().and_then(|row| row.values().first())
    }
}

/// Outcome of executing one statement.
///
/// Read statements produce rows; everything else produces a status
/// message with an affected-row count. The two shapes never mix.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Rows(RowSet),
    Status { message: String, affected: u64 },
}

impl QueryResult {
    /// Returns the row set for read results.
    pub fn rows(&self) -> Option<&RowSet> {
        match self {
            QueryResult::Rows(rows) => Some(rows),
            QueryResult::Status { .. } => None,
        }
    }
}

/// Column metadata as reported by `PRAGMA table_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Zero-based position in the table definition.
    pub position: i64,
    pub name: String,
    /// Declared type, empty when the column was declared without one.
    pub declared_type: String,
    pub not_null: bool,
    /// Default value expression as written in the DDL.
    pub default_value: Option<String>,
    pub primary_key: bool,
}

/// A table with its columns and a best-effort row count.
///
/// `row_count` is `0` for relations the engine refuses to count, such as
/// virtual tables whose module is unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub name: String,
    pub columns: Vec<ColumnDescriptor>,
    pub row_count: u64,
}

/// Lightweight display metadata collected for one ocean candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OceanMetadata {
    pub memory_count: u64,
    /// File size in megabytes, formatted with two decimals.
    pub size_mb: String,
    /// Cosmetic label sniffed from the earliest memory; never authoritative.
    pub display_name: Option<String>,
    /// `false` when probing failed and this snapshot is degraded.
    pub exists: bool,
}

impl OceanMetadata {
    /// Snapshot substituted when probing a candidate fails.
    pub fn degraded(size_bytes: u64) -> Self {
        Self {
            memory_count: 0,
            size_mb: format_size_mb(size_bytes),
            display_name: None,
            exists: false,
        }
    }
}

/// One discovered ocean database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OceanEntry {
    /// Name of the directory holding the database.
    pub identifier: String,
    pub path: PathBuf,
    pub metadata: OceanMetadata,
}

impl OceanEntry {
    /// Display name when one was inferred, otherwise the raw identifier.
    pub fn label(&self) -> &str {
        self.metadata
            .display_name
            .as_deref()
            .unwrap_or(&self.identifier)
    }
}

/// Formats a byte count as megabytes with two decimals.
///
/// # Examples
///
/// ```
/// use ocean_explorer_core::format_size_mb;
///
/// assert_eq!(format_size_mb(0), "0.00");
/// assert_eq!(format_size_mb(1_048_576), "1.00");
/// assert_eq!(format_size_mb(3_670_016), "3.50");
/// ```
pub fn format_size_mb(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / (1024.0 * 1024.0))
}
