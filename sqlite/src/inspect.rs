//! Schema introspection: tables, columns and row counts.

use ocean_explorer_core::{ColumnDescriptor, TableDescriptor};
use rusqlite::{Connection, ErrorCode};
use tracing::debug;

use crate::error::Result;

/// Read-only view over the schema of an open connection.
///
/// # Examples
///
/// ```no_run
/// use ocean_explorer_sqlite::StoreConnector;
///
/// let store = StoreConnector::open("ocean.db").unwrap();
/// let inspector = store.inspector().unwrap();
/// for table in inspector.describe_all().unwrap() {
///     println!("{} ({} rows)", table.name, table.row_count);
/// }
/// ```
pub struct SchemaInspector<'a> {
    conn: &'a Connection,
}

impl<'a> SchemaInspector<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Lists table names in alphabetical order.
    pub fn list_tables(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Returns column metadata in the order the engine reports it.
    ///
    /// A relation the engine cannot open (see [`count`](Self::count))
    /// reports no columns.
    pub fn describe(&self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        match self.table_info(table) {
            Ok(columns) => Ok(columns),
            Err(err) if is_uncountable(&err) => {
                debug!(table, error = %err, "table cannot be described, reporting no columns");
                Ok(Vec::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn table_info(&self, table: &str) -> rusqlite::Result<Vec<ColumnDescriptor>> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({})", quote_identifier(table)))?;
        let columns = stmt
            .query_map([], |row| {
                Ok(ColumnDescriptor {
                    position: row.get(0)?,
                    name: row.get(1)?,
                    declared_type: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    not_null: row.get::<_, i64>(3)? != 0,
                    default_value: row.get(4)?,
                    primary_key: row.get::<_, i64>(5)? != 0,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(columns)
    }

    /// Counts rows in `table`.
    ///
    /// Relations the engine cannot count (for example a full-text virtual
    /// table whose module is not compiled in) report `0`. Any other failure,
    /// such as a corrupt file, is returned as an error.
    pub fn count(&self, table: &str) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_identifier(table));
        match self.conn.query_row(&sql, [], |row| row.get::<_, i64>(0)) {
            Ok(n) => Ok(n.max(0) as u64),
            Err(err) if is_uncountable(&err) => {
                debug!(table, error = %err, "table is not countable, reporting 0 rows");
                Ok(0)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Builds the full descriptor for one table.
    pub fn table(&self, name: &str) -> Result<TableDescriptor> {
        Ok(TableDescriptor {
            name: name.to_string(),
            columns: self.describe(name)?,
            row_count: self.count(name)?,
        })
    }

    /// Describes every table, alphabetically.
    pub fn describe_all(&self) -> Result<Vec<TableDescriptor>> {
        self.list_tables()?
            .iter()
            .map(|name| self.table(name))
            .collect()
    }

    /// Table names paired with their row counts, alphabetically.
    pub fn table_counts(&self) -> Result<Vec<(String, u64)>> {
        self.list_tables()?
            .into_iter()
            .map(|name| {
                let count = self.count(&name)?;
                Ok((name, count))
            })
            .collect()
    }
}

/// The generic `SQLITE_ERROR` class is what the engine raises when a
/// relation exists in the catalog but cannot be scanned (missing virtual
/// table module, failed vtable constructor).
fn is_uncountable(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _) if failure.code == ErrorCode::Unknown
    )
}

/// Quotes an identifier for interpolation into SQL text.
///
/// # Examples
///
/// ```
/// use ocean_explorer_sqlite::quote_identifier;
///
/// assert_eq!(quote_identifier("memories"), "\"memories\"");
/// assert_eq!(quote_identifier("odd\"name"), "\"odd\"\"name\"");
/// ```
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
