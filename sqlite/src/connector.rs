//! Single-connection access to one ocean database file.
//!
//! [`StoreConnector`] owns at most one open SQLite connection. Statements
//! starting with `SELECT` or `PRAGMA` take the read path and return rows;
//! every other statement is executed, committed immediately and reported
//! as a status message with the number of affected rows.
//!
//! # Example
//!
//! ```no_run
//! use ocean_explorer_sqlite::StoreConnector;
//!
//! let mut store = StoreConnector::open("ocean.db").unwrap();
//! let result = store.execute("SELECT COUNT(*) FROM memories").unwrap();
//! println!("{result:?}");
//! store.close().unwrap();
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use ocean_explorer_core::QueryResult;
use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info};

use crate::convert::collect_rows;
use crate::error::{Result, StoreError};
use crate::inspect::SchemaInspector;

/// Statement prefixes that take the row-returning path.
const READ_PREFIXES: &[&str] = &["SELECT", "PRAGMA"];

/// Handle to one database file.
///
/// The connection is released by [`close`](Self::close), which may be
/// called any number of times, or when the connector is dropped.
#[derive(Debug)]
pub struct StoreConnector {
    path: PathBuf,
    conn: Option<Connection>,
}

impl StoreConnector {
    /// Opens an existing database for reading and writing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the file does not exist, is not
    /// a SQLite database, or cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_flags(
            path.as_ref(),
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
    }

    /// Opens an existing database without write access.
    ///
    /// Used for metadata probing, which must never modify a candidate.
    pub fn open_read_only(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_flags(
            path.as_ref(),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
    }

    fn open_with_flags(path: &Path, flags: OpenFlags) -> Result<Self> {
        if !path.is_file() {
            return Err(StoreError::connection(path, "file not found"));
        }

        let conn = Connection::open_with_flags(path, flags)
            .map_err(|e| StoreError::connection(path, e))?;

        // SQLite opens lazily; reading the catalog rejects non-database files
        // here instead of on the first user statement.
        conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(|e| StoreError::connection(path, e))?;

        info!(path = %path.display(), "opened database");
        Ok(Self {
            path: path.to_path_buf(),
            conn: Some(conn),
        })
    }

    /// Path of the database file this connector was opened on.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Releases the connection. Calling this on a closed connector is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, e)| StoreError::Database(e))?;
            info!(path = %self.path.display(), "closed database");
        }
        Ok(())
    }

    /// Returns the open connection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Closed`] after [`close`](Self::close).
    pub fn connection(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(StoreError::Closed)
    }

    /// Schema introspection over the open connection.
    pub fn inspector(&self) -> Result<SchemaInspector<'_>> {
        Ok(SchemaInspector::new(self.connection()?))
    }

    /// Executes one statement.
    ///
    /// Engine failures are returned as [`StoreError::Query`] and leave the
    /// connection usable.
    pub fn execute(&self, sql: &str) -> Result<QueryResult> {
        let conn = self.connection()?;

        if is_read_statement(sql) {
            debug!(sql, "executing read statement");
            let mut stmt = conn.prepare(sql).map_err(StoreError::query)?;
            let rows = collect_rows(&mut stmt).map_err(StoreError::query)?;
            return Ok(QueryResult::Rows(rows));
        }

        debug!(sql, "executing write statement");
        let before = conn.total_changes() as u64;
        {
            let mut stmt = conn.prepare(sql).map_err(StoreError::query)?;
            let mut rows = stmt.raw_query();
            while rows.next().map_err(StoreError::query)?.is_some() {}
        }
        // Every call stands alone: a transaction opened by the statement is
        // committed before returning.
        if !conn.is_autocommit() {
            conn.execute_batch("COMMIT").map_err(StoreError::query)?;
        }
        let affected = (conn.total_changes() as u64).saturating_sub(before);

        Ok(QueryResult::Status {
            message: format!("Query executed successfully. Rows affected: {affected}"),
            affected,
        })
    }
}

/// Returns `true` when `sql` takes the row-returning path.
pub fn is_read_statement(sql: &str) -> bool {
    let normalized = sql.trim_start().to_uppercase();
    READ_PREFIXES
        .iter()
        .any(|prefix| normalized.starts_with(prefix))
}

/// Creates an empty database file at `path`.
///
/// When the file exists it is replaced only if `overwrite` is set.
///
/// # Errors
///
/// Returns [`StoreError::AlreadyExists`] if the file exists and `overwrite`
/// is `false`, or an I/O / driver error if creation fails.
pub fn create_database(path: impl AsRef<Path>, overwrite: bool) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        if !overwrite {
            return Err(StoreError::AlreadyExists(path.to_path_buf()));
        }
        fs::remove_file(path)?;
        debug!(path = %path.display(), "removed existing database before create");
    }

    let conn = Connection::open(path)?;
    conn.query_row("PRAGMA user_version", [], |row| row.get::<_, i64>(0))?;
    conn.close().map_err(|(_, e)| StoreError::Database(e))?;
    info!(path = %path.display(), "created database");
    Ok(())
}
