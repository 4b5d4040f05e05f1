//! Conversion from SQLite rows into the shared [`RowSet`] model.

use ocean_explorer_core::{RowSet, Value};
use rusqlite::Statement;
use rusqlite::types::ValueRef;

/// Converts a borrowed SQLite value into an owned [`Value`].
///
/// Text that is not valid UTF-8 is decoded lossily rather than rejected.
pub(crate) fn value_from_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(n) => Value::Integer(n),
        ValueRef::Real(x) => Value::Real(x),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
    }
}

/// Runs a prepared statement and collects every row.
///
/// The column header is captured once from the statement before any row
/// is read.
pub(crate) fn collect_rows(stmt: &mut Statement<'_>) -> rusqlite::Result<RowSet> {
    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(ToOwned::to_owned)
        .collect();
    let width = columns.len();
    let mut set = RowSet::new(columns);

    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(width);
        for idx in 0..width {
            values.push(value_from_ref(row.get_ref(idx)?));
        }
        set.push(values);
    }
    Ok(set)
}
