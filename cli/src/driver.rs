//! Outer loop alternating between the selection menu and sessions.

use std::io::{self, Write};
use std::path::PathBuf;

use ocean_explorer_core::QueryGuard;
use ocean_explorer_discovery::{ExplorerConfig, MenuOutcome, OceanCatalog, SelectionMenu};
use ocean_explorer_sqlite::StoreConnector;
use tracing::info;

use crate::input::LineSource;
use crate::render;
use crate::selection::run_selection;
use crate::session::{InteractiveSession, SessionExit};

/// Runs the explorer until the user exits.
///
/// Starts with `initial` when given, otherwise with the selection menu. A
/// database chosen from the menu that fails to open is reported and the
/// menu is shown again; failing to open `initial` is returned as an error.
pub fn run_explorer(
    config: &ExplorerConfig,
    initial: Option<PathBuf>,
    input: &mut dyn LineSource,
    out: &mut dyn Write,
) -> Result<(), String> {
    let mut menu = SelectionMenu::new(OceanCatalog::new(config));
    let mut pending = initial;
    let mut from_menu = false;

    loop {
        let path = match pending.take() {
            Some(path) => path,
            None => {
                from_menu = true;
                match run_selection(&mut menu, input, out).map_err(io_failure)? {
                    MenuOutcome::Selected(path) => path,
                    MenuOutcome::Cancelled => {
                        render::info(out, "Goodbye!").map_err(io_failure)?;
                        return Ok(());
                    }
                }
            }
        };

        let store = match StoreConnector::open(&path) {
            Ok(store) => store,
            Err(err) if from_menu => {
                render::error(out, &err).map_err(io_failure)?;
                continue;
            }
            Err(err) => return Err(err.to_string()),
        };

        let guard = QueryGuard::read_only();
        render::success(out, format!("Connected to: {}", path.display()))
            .map_err(io_failure)?;
        write!(out, "{}", render::render_connected(&path))
            .map_err(io_failure)?;
        write!(out, "{}", render::render_session_help()).map_err(io_failure)?;
        info!(path = %path.display(), "session started");

        let mut session = InteractiveSession::new(store, guard, config.row_limit);
        let exit = session.run(input, out);
        session.close().map_err(|e| format!("failed to close database: {e}"))?;
        info!(path = %path.display(), "session closed");

        match exit.map_err(io_failure)? {
            SessionExit::Done => return Ok(()),
            SessionExit::SwitchDatabase => continue,
        }
    }
}

fn io_failure(err: io::Error) -> String {
    format!("terminal I/O failed: {err}")
}
