//! Line input for prompts.
//!
//! Interactive code reads through [`LineSource`] so the menu and session
//! loops can be driven by a terminal editor or by a fixed script.

use std::io;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// One read from a [`LineSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Text(String),
    /// The user pressed Ctrl-C.
    Interrupted,
    /// The input ended (Ctrl-D or a closed stream).
    Eof,
}

pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> io::Result<Line>;
}

/// Terminal input with line editing and in-memory history.
pub struct Terminal {
    editor: DefaultEditor,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let editor = DefaultEditor::new().map_err(readline_error)?;
        Ok(Self { editor })
    }
}

impl LineSource for Terminal {
    fn read_line(&mut self, prompt: &str) -> io::Result<Line> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    // History is a convenience; a rejected entry is not an input error.
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Line::Text(line))
            }
            Err(ReadlineError::Interrupted) => Ok(Line::Interrupted),
            Err(ReadlineError::Eof) => Ok(Line::Eof),
            Err(err) => Err(readline_error(err)),
        }
    }
}

fn readline_error(err: ReadlineError) -> io::Error {
    match err {
        ReadlineError::Io(err) => err,
        other => io::Error::other(other.to_string()),
    }
}

/// Asks a yes/no question.
///
/// An empty answer takes `default`; an interrupt or end of input counts as
/// "no". Unrecognized answers re-ask the question.
pub fn confirm(input: &mut dyn LineSource, question: &str, default: bool) -> io::Result<bool> {
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    let prompt = format!("{question} {hint} ");
    loop {
        match input.read_line(&prompt)? {
            Line::Text(answer) => match answer.trim().to_ascii_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => continue,
            },
            Line::Interrupted | Line::Eof => return Ok(false),
        }
    }
}

/// Replays a fixed list of lines, then reports end of input.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: std::collections::VecDeque<Line>,
    pub prompts: Vec<String>,
}

#[cfg(test)]
impl ScriptedInput {
    pub fn new<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        Self::from_lines(lines.into_iter().map(|l| Line::Text(l.to_string())))
    }

    pub fn from_lines(lines: impl IntoIterator<Item = Line>) -> Self {
        Self {
            lines: lines.into_iter().collect(),
            prompts: Vec::new(),
        }
    }
}

#[cfg(test)]
impl LineSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> io::Result<Line> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front().unwrap_or(Line::Eof))
    }
}
