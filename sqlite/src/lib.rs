//! SQLite access for the ocean explorer.
//!
//! This crate wraps a single [`rusqlite::Connection`] behind
//! [`StoreConnector`] and exposes schema introspection through
//! [`SchemaInspector`].
//!
//! # Architecture
//!
//! - **`connector`**: open/close, statement execution with read/write path
//!   split, database creation
//! - **`inspect`**: table listing, column metadata, best-effort row counts
//! - **`convert`**: SQLite rows → [`RowSet`](ocean_explorer_core::RowSet)
//!
//! # Quick start
//!
//! ```no_run
//! use ocean_explorer_sqlite::StoreConnector;
//!
//! let mut store = StoreConnector::open("ocean.db").unwrap();
//! for (table, rows) in store.inspector().unwrap().table_counts().unwrap() {
//!     println!("{table}: {rows}");
//! }
//! store.close().unwrap();
//! ```

mod connector;
mod convert;
mod error;
mod inspect;

pub use connector::{StoreConnector, create_database, is_read_statement};
pub use error::{Result, StoreError};
pub use inspect::{SchemaInspector, quote_identifier};
