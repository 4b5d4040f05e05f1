//! The read-eval loop over one open database.

use std::io::{self, Write};

use ocean_explorer_core::{QueryGuard, QueryResult, Verdict};
use ocean_explorer_sqlite::{StoreConnector, StoreError};
use tracing::{debug, info};

use crate::input::{Line, LineSource};
use crate::render;

const PROMPT: &str = "ocean> ";

/// Why a session loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionExit {
    /// Exit command or end of input.
    Done,
    /// The user asked to pick another database.
    SwitchDatabase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetaCommand {
    Schema,
    Tables,
    Switch,
    Help,
    Exit,
}

impl MetaCommand {
    fn parse(line: &str) -> Option<Self> {
        match line.to_ascii_lowercase().as_str() {
            ".schema" => Some(Self::Schema),
            ".tables" => Some(Self::Tables),
            ".switch" | ".open" => Some(Self::Switch),
            ".help" => Some(Self::Help),
            ".exit" | ".quit" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Interactive session owning the single open connection.
pub struct InteractiveSession {
    store: StoreConnector,
    guard: QueryGuard,
    row_limit: usize,
}

impl InteractiveSession {
    pub fn new(store: StoreConnector, guard: QueryGuard, row_limit: usize) -> Self {
        Self {
            store,
            guard,
            row_limit,
        }
    }

    /// Reads and handles lines until an exit, a switch request or end of
    /// input. Interrupts only print a reminder.
    pub fn run(
        &mut self,
        input: &mut dyn LineSource,
        out: &mut dyn Write,
    ) -> io::Result<SessionExit> {
        loop {
            out.flush()?;
            let line = match input.read_line(PROMPT)? {
                Line::Text(line) => line,
                Line::Interrupted => {
                    render::info(out, "Use .exit or .quit to exit")?;
                    continue;
                }
                Line::Eof => {
                    writeln!(out)?;
                    return Ok(SessionExit::Done);
                }
            };
            if let Some(exit) = self.handle_line(line.trim(), out)? {
                return Ok(exit);
            }
        }
    }

    /// Handles one trimmed input line; `Some` ends the loop.
    fn handle_line(&mut self, line: &str, out: &mut dyn Write) -> io::Result<Option<SessionExit>> {
        if line.is_empty() {
            return Ok(None);
        }
        match MetaCommand::parse(line) {
            Some(MetaCommand::Schema) => self.show_schema(out)?,
            Some(MetaCommand::Tables) => self.show_tables(out)?,
            Some(MetaCommand::Help) => write!(out, "{}", render::render_session_help())?,
            Some(MetaCommand::Switch) => return Ok(Some(SessionExit::SwitchDatabase)),
            Some(MetaCommand::Exit) => {
                render::info(out, "Goodbye!")?;
                return Ok(Some(SessionExit::Done));
            }
            None => self.run_query(line, out)?,
        }
        Ok(None)
    }

    fn show_schema(&self, out: &mut dyn Write) -> io::Result<()> {
        let tables = self.store.inspector().and_then(|i| i.describe_all());
        match tables {
            Ok(tables) => write!(out, "{}", render::render_schema_tree(&tables)),
            Err(err) => render::error(out, err),
        }
    }

    fn show_tables(&self, out: &mut dyn Write) -> io::Result<()> {
        let counts = self.store.inspector().and_then(|i| i.table_counts());
        match counts {
            Ok(counts) => write!(out, "{}", render::render_table_counts(&counts)),
            Err(err) => render::error(out, err),
        }
    }

    fn run_query(&self, sql: &str, out: &mut dyn Write) -> io::Result<()> {
        if let Verdict::Blocked(violation) = self.guard.classify(sql) {
            info!(verb = violation.verb, "blocked statement");
            return render::error(out, violation);
        }

        match self.store.execute(sql) {
            Ok(QueryResult::Rows(rows)) => {
                let rendered = render::render_rows(&rows, Some(self.row_limit));
                debug!(
                    shown = rendered.shown,
                    total = rendered.total,
                    truncated = rendered.truncated(),
                    "rendered rows"
                );
                write!(out, "{}", rendered.text)
            }
            Ok(QueryResult::Status { message, .. }) => render::success(out, message),
            Err(err) => render::error(out, err),
        }
    }

    /// Closes the connection, consuming the session.
    pub fn close(mut self) -> Result<(), StoreError> {
        self.store.close()
    }
}
