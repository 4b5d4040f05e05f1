//! Terminal driver for [`SelectionMenu`].

use std::io::{self, Write};

use ocean_explorer_discovery::{CustomPathStep, MenuOutcome, MenuState, SelectionMenu, Transition};

use crate::input::{Line, LineSource, confirm};
use crate::render;

const MENU_PROMPT: &str = "Select: ";
const PATH_PROMPT: &str = "Database path: ";

/// Runs the menu until a database is chosen or the user cancels.
///
/// An interrupt or end of input at any prompt cancels the selection.
pub fn run_selection(
    menu: &mut SelectionMenu,
    input: &mut dyn LineSource,
    out: &mut dyn Write,
) -> io::Result<MenuOutcome> {
    loop {
        if menu.state() == MenuState::CustomPath {
            let Line::Text(line) = input.read_line(PATH_PROMPT)? else {
                return Ok(MenuOutcome::Cancelled);
            };
            match menu.submit_custom_path(&line) {
                CustomPathStep::Finished(outcome) => return Ok(outcome),
                CustomPathStep::Help => write!(out, "{}", render::render_custom_path_help())?,
                CustomPathStep::Empty => {}
                CustomPathStep::NotFound(path) => {
                    render::warning(out, format!("Path not found: {}", path.display()))?;
                    if !confirm(input, "Try another path?", true)? {
                        if let Transition::Finish(outcome) = menu.retry_declined() {
                            return Ok(outcome);
                        }
                    }
                }
            }
            continue;
        }

        let view = menu.view();
        write!(out, "{}", render::render_menu(&view, menu.catalog().ocean_root()))?;
        out.flush()?;

        let Line::Text(line) = input.read_line(MENU_PROMPT)? else {
            return Ok(MenuOutcome::Cancelled);
        };
        let key = line.trim();
        match menu.select(&view, key) {
            Some(Transition::Finish(outcome)) => return Ok(outcome),
            Some(Transition::Goto(MenuState::CustomPath)) => {
                write!(out, "{}", render::render_custom_path_help())?;
            }
            Some(Transition::Goto(_)) => {}
            None if key.is_empty() => {}
            None => render::warning(out, format!("Unknown choice: {key}"))?,
        }
    }
}
