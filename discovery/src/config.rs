//! Explorer configuration.
//!
//! Controls where the catalog looks for oceans and how interactive results
//! are capped. Every field has a default, so an empty file (or no file at
//! all) is a valid configuration.
//!
//! # Example YAML
//!
//! ```yaml
//! known_roots:
//!   - label: Base Ocean
//!     path: ~/Dev/base-ocean/database/base-ocean.db
//! ocean_root: ~/Dev/oceans
//! database_file: ocean.db
//! memory_table: memories
//! row_limit: 50
//! ```

use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DiscoveryError, Result};

/// Default cap on rows shown per interactive query.
pub const DEFAULT_ROW_LIMIT: usize = 50;

/// A well-known single-database location offered at the top of the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownRoot {
    pub label: String,
    pub path: PathBuf,
}

impl KnownRoot {
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }
}

/// Top-level explorer configuration.
///
/// # Examples
///
/// ```
/// use ocean_explorer_discovery::ExplorerConfig;
///
/// let config: ExplorerConfig = serde_yaml::from_str("row_limit: 20").unwrap();
/// assert_eq!(config.row_limit, 20);
/// assert_eq!(config.database_file, "ocean.db");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Single-database locations listed before the prefix directories.
    pub known_roots: Vec<KnownRoot>,
    /// Directory containing the single-character prefix directories.
    pub ocean_root: PathBuf,
    /// File name that marks a directory as an ocean.
    pub database_file: String,
    /// Table counted by the metadata probe.
    pub memory_table: String,
    /// Maximum rows rendered per interactive query.
    pub row_limit: usize,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            known_roots: vec![
                KnownRoot::new("Base Ocean", "~/Dev/base-ocean/database/base-ocean.db"),
                KnownRoot::new("Sidekick Universe", "sidekick_universe.db"),
            ],
            ocean_root: PathBuf::from("~/Dev/oceans"),
            database_file: "ocean.db".to_string(),
            memory_table: "memories".to_string(),
            row_limit: DEFAULT_ROW_LIMIT,
        }
    }
}

impl ExplorerConfig {
    /// Loads and validates configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Io`] if the file cannot be read,
    /// [`DiscoveryError::Yaml`] if parsing fails, or
    /// [`DiscoveryError::InvalidConfig`] if validation fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;
        config.validate()?;
        Ok(config.expanded())
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default().expanded()),
        }
    }

    /// Checks values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<()> {
        if self.row_limit == 0 {
            return Err(DiscoveryError::InvalidConfig(
                "row_limit must be at least 1".to_string(),
            ));
        }
        if self.database_file.is_empty() || self.database_file.contains(['/', '\\']) {
            return Err(DiscoveryError::InvalidConfig(format!(
                "database_file must be a bare file name, got '{}'",
                self.database_file
            )));
        }
        if self.memory_table.trim().is_empty() {
            return Err(DiscoveryError::InvalidConfig(
                "memory_table cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns a copy with every `~/` path expanded against the home directory.
    pub fn expanded(mut self) -> Self {
        self.ocean_root = expand_home(&self.ocean_root);
        for root in &mut self.known_roots {
            root.path = expand_home(&root.path);
        }
        self
    }
}

/// Expands a leading `~` component to the user's home directory.
///
/// Paths without a leading `~`, or hosts without a home directory, are
/// returned unchanged.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
known_roots:
  - label: Harbor
    path: /srv/harbor/ocean.db
ocean_root: /srv/oceans
database_file: base.db
memory_table: records
row_limit: 25
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let config: ExplorerConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(
            config.known_roots,
            vec![KnownRoot::new("Harbor", "/srv/harbor/ocean.db")]
        );
        assert_eq!(config.ocean_root, PathBuf::from("/srv/oceans"));
        assert_eq!(config.database_file, "base.db");
        assert_eq!(config.memory_table, "records");
        assert_eq!(config.row_limit, 25);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: ExplorerConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, ExplorerConfig::default());
        assert_eq!(config.row_limit, DEFAULT_ROW_LIMIT);
    }

    #[test]
    fn test_zero_row_limit_is_invalid() {
        let config = ExplorerConfig {
            row_limit: 0,
            ..ExplorerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(DiscoveryError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_database_file_must_be_bare_name() {
        let config = ExplorerConfig {
            database_file: "nested/ocean.db".to_string(),
            ..ExplorerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_expand_home_leaves_plain_paths() {
        assert_eq!(
            expand_home(Path::new("/abs/ocean.db")),
            PathBuf::from("/abs/ocean.db")
        );
        assert_eq!(expand_home(Path::new("rel.db")), PathBuf::from("rel.db"));
    }

    #[test]
    fn test_expand_home_replaces_tilde() {
        let Some(home) = std::env::var_os("HOME") else {
            return;
        };
        assert_eq!(
            expand_home(Path::new("~/Dev/oceans")),
            PathBuf::from(home).join("Dev/oceans")
        );
    }

    #[test]
    fn test_load_from_file_matches_parsed_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("explorer.yaml");
        std::fs::write(&path, sample_yaml()).unwrap();

        let parsed: ExplorerConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        let loaded = ExplorerConfig::load(&path).unwrap();
        assert_eq!(loaded, parsed.expanded());
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("explorer.yaml");
        std::fs::write(&path, "row_limit: 0\n").unwrap();
        assert!(matches!(
            ExplorerConfig::load(&path),
            Err(DiscoveryError::InvalidConfig(_))
        ));
    }
}
