//! Filesystem catalog of ocean databases.
//!
//! Oceans live two levels below the catalog root:
//!
//! ```text
//! <ocean_root>/
//!   a/                  single-character prefix directory
//!     a1b2c3/           ocean directory (identifier = directory name)
//!       ocean.db        recognized database file
//!   b/
//!     ...
//! ```
//!
//! Nothing is cached: every call re-reads the directories, so oceans added
//! or removed between calls are always reflected. Unreadable directories
//! contribute no entries, and a database that fails to probe is listed
//! with degraded metadata instead of being dropped.

use std::fs;
use std::path::{Path, PathBuf};

use ocean_explorer_core::{OceanEntry, OceanMetadata, RowSet, Value, format_size_mb};
use ocean_explorer_sqlite::{StoreConnector, StoreError, quote_identifier};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{ExplorerConfig, KnownRoot};
use crate::label::infer_display_name;

/// Columns checked, in order, for the payload used to infer a display name.
const PAYLOAD_COLUMNS: &[&str] = &["payload", "content"];

/// A configured single-database location and whether it is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnownRootStatus {
    pub label: String,
    pub path: PathBuf,
    pub exists: bool,
}

/// Summary of one prefix directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrefixSummary {
    pub prefix: char,
    /// Number of child directories holding the recognized database file.
    pub candidate_count: usize,
}

/// Scanner over the configured known roots and ocean root.
#[derive(Debug, Clone)]
pub struct OceanCatalog {
    known_roots: Vec<KnownRoot>,
    ocean_root: PathBuf,
    database_file: String,
    memory_table: String,
}

impl OceanCatalog {
    pub fn new(config: &ExplorerConfig) -> Self {
        Self {
            known_roots: config.known_roots.clone(),
            ocean_root: config.ocean_root.clone(),
            database_file: config.database_file.clone(),
            memory_table: config.memory_table.clone(),
        }
    }

    /// Root directory holding the prefix directories.
    pub fn ocean_root(&self) -> &Path {
        &self.ocean_root
    }

    /// Reports each known root in configuration order.
    pub fn scan_known_roots(&self) -> Vec<KnownRootStatus> {
        self.known_roots
            .iter()
            .map(|root| KnownRootStatus {
                label: root.label.clone(),
                path: root.path.clone(),
                exists: root.path.is_file(),
            })
            .collect()
    }

    /// Lists single-character subdirectories of `root` with their
    /// candidate counts, ordered by prefix.
    pub fn scan_prefixes(&self, root: &Path) -> Vec<PrefixSummary> {
        let mut summaries: Vec<PrefixSummary> = child_dirs(root)
            .into_iter()
            .filter_map(|(name, path)| {
                let prefix = single_char(&name)?;
                let candidate_count = self.candidates(&path).len();
                Some(PrefixSummary {
                    prefix,
                    candidate_count,
                })
            })
            .collect();
        summaries.sort_by_key(|summary| summary.prefix);
        debug!(root = %root.display(), prefixes = summaries.len(), "scanned prefixes");
        summaries
    }

    /// Lists every ocean under `root/<prefix>`, ordered by identifier,
    /// probing each one for metadata.
    pub fn scan_prefix_directory(&self, root: &Path, prefix: char) -> Vec<OceanEntry> {
        let dir = root.join(prefix.to_string());
        self.candidates(&dir)
            .into_iter()
            .map(|(identifier, path)| {
                let metadata = self.probe(&path);
                OceanEntry {
                    identifier,
                    path,
                    metadata,
                }
            })
            .collect()
    }

    /// Collects metadata for one database file.
    ///
    /// Never fails: a probe error yields a degraded snapshot with zero
    /// counts, the on-disk size, no display name and `exists = false`.
    pub fn probe(&self, path: &Path) -> OceanMetadata {
        let size_bytes = fs::metadata(path).map(|meta| meta.len()).unwrap_or(0);
        match self.try_probe(path) {
            Ok((memory_count, display_name)) => OceanMetadata {
                memory_count,
                size_mb: format_size_mb(size_bytes),
                display_name,
                exists: true,
            },
            Err(err) => {
                warn!(path = %path.display(), error = %err, "metadata probe failed");
                OceanMetadata::degraded(size_bytes)
            }
        }
    }

    fn try_probe(&self, path: &Path) -> Result<(u64, Option<String>), StoreError> {
        let mut store = StoreConnector::open_read_only(path)?;
        let table = quote_identifier(&self.memory_table);

        let count = store.execute(&format!("SELECT COUNT(*) FROM {table}"))?;
        let memory_count = count
            .rows()
            .and_then(RowSet::scalar)
            .and_then(Value::as_i64)
            .unwrap_or(0)
            .max(0) as u64;

        // The label is cosmetic; failing to read it never degrades the entry.
        let earliest = format!("SELECT * FROM {table} ORDER BY rowid LIMIT 1");
        let display_name = match store.execute(&earliest) {
            Ok(result) => result.rows().and_then(earliest_label),
            Err(err) => {
                debug!(path = %path.display(), error = %err, "could not read earliest memory");
                None
            }
        };

        store.close()?;
        Ok((memory_count, display_name))
    }

    /// Child directories of `dir` that contain the recognized database file,
    /// as `(identifier, database path)` ordered by identifier.
    fn candidates(&self, dir: &Path) -> Vec<(String, PathBuf)> {
        let mut found: Vec<(String, PathBuf)> = child_dirs(dir)
            .into_iter()
            .filter_map(|(name, path)| {
                let db = path.join(&self.database_file);
                db.is_file().then_some((name, db))
            })
            .collect();
        found.sort();
        found
    }
}

/// Infers a label from the first row of the memory table.
fn earliest_label(rows: &RowSet) -> Option<String> {
    let row = rows.rows().first()?;
    PAYLOAD_COLUMNS
        .iter()
        .filter_map(|column| row.get(column).and_then(Value::as_str))
        .find_map(infer_display_name)
}

/// Immediate subdirectories of `dir` with UTF-8 names, unordered.
fn child_dirs(dir: &Path) -> Vec<(String, PathBuf)> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!(dir = %dir.display(), error = %err, "directory not readable");
            return Vec::new();
        }
    };

    entries
        .flatten()
        .filter(|entry| entry.file_type().is_ok_and(|kind| kind.is_dir()))
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            Some((name, entry.path()))
        })
        .collect()
}

fn single_char(name: &str) -> Option<char> {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
