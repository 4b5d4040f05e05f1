//! Ocean discovery and database selection.
//!
//! This crate finds candidate ocean databases on disk and drives the
//! hierarchical menu used to pick one.
//!
//! # Main entry points
//!
//! - [`ExplorerConfig`]: where to look (known roots, ocean root, database
//!   file name) and how many rows to show per query.
//! - [`OceanCatalog`]: re-scans the filesystem on every call and probes
//!   each candidate for memory count, size and a cosmetic display name.
//! - [`SelectionMenu`]: the root → prefix → ocean / custom path state
//!   machine, free of terminal I/O.
//! - [`infer_display_name`]: the best-effort label heuristic.
//!
//! # Example
//!
//! ```no_run
//! use ocean_explorer_discovery::{ExplorerConfig, OceanCatalog};
//!
//! let config = ExplorerConfig::load_or_default(None).unwrap();
//! let catalog = OceanCatalog::new(&config);
//! for summary in catalog.scan_prefixes(catalog.ocean_root()) {
//!     println!("{}: {} oceans", summary.prefix, summary.candidate_count);
//! }
//! ```

pub mod catalog;
pub mod config;
mod error;
pub mod label;
pub mod menu;

pub use catalog::{KnownRootStatus, OceanCatalog, PrefixSummary};
pub use config::{DEFAULT_ROW_LIMIT, ExplorerConfig, KnownRoot, expand_home};
pub use error::{DiscoveryError, Result};
pub use label::infer_display_name;
pub use menu::{
    CustomPathStep, MenuItem, MenuItemKind, MenuOutcome, MenuState, MenuView, SelectionMenu,
    Transition,
};
