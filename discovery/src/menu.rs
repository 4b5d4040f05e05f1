//! Database selection as an explicit state machine.
//!
//! The menu starts in [`MenuState::Root`] and ends only with a
//! [`MenuOutcome`]: a selected database path or cancellation. Each state
//! produces a [`MenuView`] from a fresh catalog scan; choosing an item from
//! that view yields a [`Transition`]. No terminal I/O happens here, so a
//! driver can feed choices from a prompt, a script or a test.
//!
//! ```text
//!             ┌── known root ──────────────────────────► Selected(path)
//!   Root ─────┼── prefix ──► Prefix(c) ── ocean ───────► Selected(path)
//!    ▲  ▲     │                 │
//!    │  └─────┼─────── up ──────┘
//!    │        ├── custom ──► CustomPath ── existing ───► Selected(path)
//!    │        │                  └── cancel / no retry ► Cancelled
//!    │        └── exit ────────────────────────────────► Cancelled
//! ```

use std::path::{Path, PathBuf};

use ocean_explorer_core::OceanEntry;

use crate::catalog::{KnownRootStatus, OceanCatalog, PrefixSummary};
use crate::config::expand_home;

/// Key for the custom-path item in the root menu.
pub const CUSTOM_PATH_KEY: &str = "c";
/// Key for the exit item in the root menu.
pub const EXIT_KEY: &str = "q";
/// Key for the up item in a prefix menu.
pub const UP_KEY: &str = "b";

/// Inputs at the custom path prompt that cancel the whole selection.
pub const CANCEL_TOKENS: &[&str] = &["q", "cancel"];
/// Inputs at the custom path prompt that redisplay usage examples.
pub const HELP_TOKENS: &[&str] = &["?", "help"];

/// Current menu screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Root,
    Prefix(char),
    CustomPath,
}

/// Terminal result of a selection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuOutcome {
    Selected(PathBuf),
    Cancelled,
}

/// What choosing an item does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Goto(MenuState),
    Finish(MenuOutcome),
}

/// One selectable line in a menu view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItemKind {
    KnownRoot(KnownRootStatus),
    Prefix(PrefixSummary),
    Ocean(OceanEntry),
    CustomPath,
    Exit,
    Up,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// What the user types to choose this item.
    pub key: String,
    pub kind: MenuItemKind,
}

/// Snapshot of one menu screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuView {
    pub state: MenuState,
    pub items: Vec<MenuItem>,
}

impl MenuView {
    /// Finds the item chosen by `key` (trimmed, case-insensitive).
    pub fn find(&self, key: &str) -> Option<&MenuItem> {
        let key = key.trim();
        self.items
            .iter()
            .find(|item| item.key.eq_ignore_ascii_case(key))
    }
}

/// Result of submitting text at the custom path prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomPathStep {
    /// The path exists; selection is finished.
    Finished(MenuOutcome),
    /// Usage examples were requested; prompt again.
    Help,
    /// Nothing was entered; prompt again.
    Empty,
    /// The path does not exist; the driver should offer a retry.
    NotFound(PathBuf),
}

/// Hierarchical ocean picker.
///
/// # Examples
///
/// ```
/// use ocean_explorer_discovery::{
///     ExplorerConfig, MenuOutcome, MenuState, OceanCatalog, SelectionMenu, Transition,
/// };
///
/// let config = ExplorerConfig {
///     known_roots: Vec::new(),
///     ocean_root: "/nonexistent/oceans".into(),
///     ..ExplorerConfig::default()
/// };
/// let mut menu = SelectionMenu::new(OceanCatalog::new(&config));
/// assert_eq!(menu.state(), MenuState::Root);
///
/// let view = menu.view();
/// assert_eq!(view.items.len(), 2); // custom path + exit
/// assert_eq!(
///     menu.select(&view, "q"),
///     Some(Transition::Finish(MenuOutcome::Cancelled))
/// );
/// ```
#[derive(Debug, Clone)]
pub struct SelectionMenu {
    catalog: OceanCatalog,
    state: MenuState,
}

impl SelectionMenu {
    /// Creates a menu in the root state.
    pub fn new(catalog: OceanCatalog) -> Self {
        Self {
            catalog,
            state: MenuState::Root,
        }
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn catalog(&self) -> &OceanCatalog {
        &self.catalog
    }

    /// Builds the current screen from a fresh catalog scan.
    ///
    /// The custom path prompt has no items; it is driven through
    /// [`submit_custom_path`](Self::submit_custom_path).
    pub fn view(&self) -> MenuView {
        let items = match self.state {
            MenuState::Root => self.root_items(),
            MenuState::Prefix(prefix) => self.prefix_items(prefix),
            MenuState::CustomPath => Vec::new(),
        };
        MenuView {
            state: self.state,
            items,
        }
    }

    fn root_items(&self) -> Vec<MenuItem> {
        let roots = self
            .catalog
            .scan_known_roots()
            .into_iter()
            .filter(|root| root.exists)
            .map(MenuItemKind::KnownRoot);
        let prefixes = self
            .catalog
            .scan_prefixes(self.catalog.ocean_root())
            .into_iter()
            .map(MenuItemKind::Prefix);

        let mut items = numbered(roots.chain(prefixes));
        items.push(MenuItem {
            key: CUSTOM_PATH_KEY.to_string(),
            kind: MenuItemKind::CustomPath,
        });
        items.push(MenuItem {
            key: EXIT_KEY.to_string(),
            kind: MenuItemKind::Exit,
        });
        items
    }

    fn prefix_items(&self, prefix: char) -> Vec<MenuItem> {
        let oceans = self
            .catalog
            .scan_prefix_directory(self.catalog.ocean_root(), prefix)
            .into_iter()
            .map(MenuItemKind::Ocean);

        let mut items = numbered(oceans);
        items.push(MenuItem {
            key: UP_KEY.to_string(),
            kind: MenuItemKind::Up,
        });
        items
    }

    /// Chooses the item keyed `key` from `view`.
    ///
    /// Returns `None` (and stays put) when the key matches nothing or the
    /// view is stale. On a [`Transition::Goto`] the menu moves to the new
    /// state; on [`Transition::Finish`] it resets to the root so it can be
    /// run again.
    pub fn select(&mut self, view: &MenuView, key: &str) -> Option<Transition> {
        if view.state != self.state {
            return None;
        }
        let item = view.find(key)?;
        let transition = match &item.kind {
            MenuItemKind::KnownRoot(root) => {
                Transition::Finish(MenuOutcome::Selected(root.path.clone()))
            }
            MenuItemKind::Ocean(entry) => {
                Transition::Finish(MenuOutcome::Selected(entry.path.clone()))
            }
            MenuItemKind::Prefix(summary) => Transition::Goto(MenuState::Prefix(summary.prefix)),
            MenuItemKind::CustomPath => Transition::Goto(MenuState::CustomPath),
            MenuItemKind::Up => Transition::Goto(MenuState::Root),
            MenuItemKind::Exit => Transition::Finish(MenuOutcome::Cancelled),
        };
        self.apply(&transition);
        Some(transition)
    }

    /// Handles one line typed at the custom path prompt.
    pub fn submit_custom_path(&mut self, input: &str) -> CustomPathStep {
        let input = input.trim();
        if input.is_empty() {
            return CustomPathStep::Empty;
        }
        if CANCEL_TOKENS.iter().any(|t| input.eq_ignore_ascii_case(t)) {
            return self.finish(MenuOutcome::Cancelled);
        }
        if HELP_TOKENS.iter().any(|t| input.eq_ignore_ascii_case(t)) {
            return CustomPathStep::Help;
        }

        let path = expand_home(Path::new(input));
        if path.exists() {
            self.finish(MenuOutcome::Selected(path))
        } else {
            CustomPathStep::NotFound(path)
        }
    }

    /// The user declined to retry after a missing custom path.
    pub fn retry_declined(&mut self) -> Transition {
        let transition = Transition::Finish(MenuOutcome::Cancelled);
        self.apply(&transition);
        transition
    }

    fn finish(&mut self, outcome: MenuOutcome) -> CustomPathStep {
        self.apply(&Transition::Finish(outcome.clone()));
        CustomPathStep::Finished(outcome)
    }

    fn apply(&mut self, transition: &Transition) {
        self.state = match transition {
            Transition::Goto(next) => *next,
            Transition::Finish(_) => MenuState::Root,
        };
    }
}

fn numbered(kinds: impl Iterator<Item = MenuItemKind>) -> Vec<MenuItem> {
    kinds
        .enumerate()
        .map(|(idx, kind)| MenuItem {
            key: (idx + 1).to_string(),
            kind,
        })
        .collect()
}
