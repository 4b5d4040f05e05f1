//! Core data model and query policy for the ocean explorer.
//!
//! This crate defines the types shared by every other crate in the
//! workspace:
//!
//! - [`QueryResult`]: either a [`RowSet`] of ordered rows or a status
//!   message with an affected-row count.
//! - [`TableDescriptor`] / [`ColumnDescriptor`]: schema introspection
//!   results.
//! - [`OceanEntry`] / [`OceanMetadata`]: catalog entries for discovered
//!   ocean databases.
//!
//! The read-only policy lives in [`QueryGuard`], a prefix-keyword denylist
//! over write verbs.
//!
//! # Example
//!
//! ```
//! use ocean_explorer_core::*;
//!
//! let guard = QueryGuard::read_only();
//! assert!(guard.classify("DELETE FROM memories").is_blocked());
//!
//! let mut rows = RowSet::new(vec!["count".into()]);
//! rows.push(vec![Value::Integer(5)]);
//! let result = QueryResult::Rows(rows);
//! assert_eq!(result.rows().and_then(RowSet::scalar), Some(&Value::Integer(5)));
//! ```

mod guard;
mod types;

pub use guard::{PolicyViolation, QueryGuard, Verdict, WRITE_VERBS};
pub use types::*;
