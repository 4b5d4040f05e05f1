//! Text rendering for results, schema trees, panels and menus.
//!
//! Every `render_*` function returns a plain `String` ending in a newline
//! so output can be asserted on directly. Styling is limited to the
//! one-line status helpers at the bottom of this module.

use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;

use colored::Colorize;
use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use ocean_explorer_core::{OceanEntry, RowSet, TableDescriptor, WRITE_VERBS};
use ocean_explorer_discovery::{KnownRootStatus, MenuItemKind, MenuState, MenuView};

/// Horizontal alignment of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Rendered query result with the numbers behind its footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRows {
    pub text: String,
    /// Data rows actually drawn.
    pub shown: usize,
    /// Rows in the full result.
    pub total: usize,
}

impl RenderedRows {
    pub fn truncated(&self) -> bool {
        self.shown < self.total
    }
}

/// Draws a rounded box table. `aligns` shorter than `headers` defaults to
/// left alignment for the remaining columns.
pub fn render_table(
    title: Option<&str>,
    headers: &[String],
    rows: &[Vec<String>],
    aligns: &[Align],
) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(|h| single_line(h)));
    for row in rows {
        builder.push_record(row.iter().map(|cell| single_line(cell)));
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    for (idx, align) in aligns.iter().enumerate() {
        if *align == Align::Right {
            table.modify(Columns::single(idx), Alignment::right());
        }
    }

    let mut out = String::new();
    if let Some(title) = title {
        out.push_str(title);
        out.push('\n');
    }
    out.push_str(&table.to_string());
    out.push('\n');
    out
}

/// Renders a query's rows, capping the output at `limit` rows when given.
///
/// A capped result ends with a "showing first N of M" notice and a hint to
/// add a `LIMIT` clause.
pub fn render_rows(rows: &RowSet, limit: Option<usize>) -> RenderedRows {
    let total = rows.len();
    if total == 0 {
        return RenderedRows {
            text: "No results found\n".to_string(),
            shown: 0,
            total: 0,
        };
    }

    let shown = limit.map_or(total, |cap| cap.min(total));
    let cells: Vec<Vec<String>> = rows.rows()[..shown]
        .iter()
        .map(|row| row.values().iter().map(ToString::to_string).collect())
        .collect();

    let mut text = render_table(Some("Query Results"), rows.columns(), &cells, &[]);
    if shown < total {
        text.push_str(&format!(
            "Showing first {shown} of {total} rows. Add a LIMIT clause to narrow the result.\n"
        ));
    } else {
        text.push_str(&format!("Total rows: {total}\n"));
    }
    RenderedRows { text, shown, total }
}

/// Renders the schema as a tree of tables and their columns.
pub fn render_schema_tree(tables: &[TableDescriptor]) -> String {
    if tables.is_empty() {
        return "No tables found in database\n".to_string();
    }

    let mut out = String::from("Database Schema\n");
    for (t_idx, table) in tables.iter().enumerate() {
        let last_table = t_idx + 1 == tables.len();
        let (branch, stem) = if last_table {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        out.push_str(&format!(
            "{branch}{} ({} rows)\n",
            table.name, table.row_count
        ));

        for (c_idx, column) in table.columns.iter().enumerate() {
            let twig = if c_idx + 1 == table.columns.len() {
                "└── "
            } else {
                "├── "
            };
            let mut line = column.name.clone();
            if !column.declared_type.is_empty() {
                line.push(' ');
                line.push_str(&column.declared_type);
            }
            if column.not_null {
                line.push_str(" NOT NULL");
            }
            if let Some(default) = &column.default_value {
                line.push_str(&format!(" DEFAULT {default}"));
            }
            if column.primary_key {
                line.push_str(" [PK]");
            }
            out.push_str(&format!("{stem}{twig}{line}\n"));
        }
    }
    out
}

/// Renders table names with their row counts.
pub fn render_table_counts(counts: &[(String, u64)]) -> String {
    if counts.is_empty() {
        return "No tables found in database\n".to_string();
    }
    let headers = ["Table Name".to_string(), "Row Count".to_string()];
    let rows: Vec<Vec<String>> = counts
        .iter()
        .map(|(name, count)| vec![name.clone(), count.to_string()])
        .collect();
    render_table(
        Some("Database Tables"),
        &headers,
        &rows,
        &[Align::Left, Align::Right],
    )
}

/// Draws `lines` inside a rounded panel headed by `title`.
pub fn render_panel(title: &str, lines: &[String]) -> String {
    let mut builder = Builder::default();
    builder.push_record([title.to_string()]);
    for line in lines {
        builder.push_record([single_line(line)]);
    }
    let mut out = builder.build().with(Style::rounded()).to_string();
    out.push('\n');
    out
}

/// Help panel for the interactive session.
pub fn render_session_help() -> String {
    let lines = [
        "Type SQL queries or commands:".to_string(),
        "  .schema         Show database schema".to_string(),
        "  .tables         List tables with row counts".to_string(),
        "  .switch         Choose a different database".to_string(),
        "  .help           Show this help".to_string(),
        "  .exit / .quit   Leave the explorer".to_string(),
    ];
    render_panel("Interactive Ocean Mode", &lines)
}

/// Banner printed after a database is opened for an interactive session.
pub fn render_connected(path: &Path) -> String {
    let policy = format!(
        "Read-only mode: {} statements are blocked",
        WRITE_VERBS.join(", ")
    );
    render_panel(
        "Connected",
        &[format!("Database: {}", path.display()), policy],
    )
}

/// Renders one menu screen.
pub fn render_menu(view: &MenuView, ocean_root: &Path) -> String {
    let mut out = match view.state {
        MenuState::Root => format!("\nSelect an ocean (oceans under {})\n", ocean_root.display()),
        MenuState::Prefix(prefix) => format!("\nOceans in {prefix}/\n"),
        MenuState::CustomPath => return render_custom_path_help(),
    };

    for item in &view.items {
        let text = match &item.kind {
            MenuItemKind::KnownRoot(root) => {
                format!("{}  {}", root.label, root.path.display())
            }
            MenuItemKind::Prefix(summary) => format!(
                "{}/  ({} {})",
                summary.prefix,
                summary.candidate_count,
                if summary.candidate_count == 1 {
                    "ocean"
                } else {
                    "oceans"
                }
            ),
            MenuItemKind::Ocean(entry) => ocean_line(entry),
            MenuItemKind::CustomPath => "Enter a custom path".to_string(),
            MenuItemKind::Exit => "Exit".to_string(),
            MenuItemKind::Up => "Back to main menu".to_string(),
        };
        out.push_str(&format!("  [{}] {text}\n", item.key));
    }
    out
}

fn ocean_line(entry: &OceanEntry) -> String {
    let meta = &entry.metadata;
    let mut line = entry.label().to_string();
    if meta.display_name.is_some() {
        line.push_str(&format!(" ({})", entry.identifier));
    }
    line.push_str(&format!(
        "  {} memories, {} MB",
        meta.memory_count, meta.size_mb
    ));
    if !meta.exists {
        line.push_str("  [unreadable]");
    }
    line.push_str(&format!("\n        {}", entry.path.display()));
    line
}

/// Renders the non-interactive catalog listing.
pub fn render_catalog(roots: &[KnownRootStatus], ocean_root: &Path, oceans: &[OceanEntry]) -> String {
    let mut out = String::new();
    if !roots.is_empty() {
        let headers = ["Known Root".to_string(), "Status".to_string(), "Path".to_string()];
        let rows: Vec<Vec<String>> = roots
            .iter()
            .map(|root| {
                let status = if root.exists { "found" } else { "missing" };
                vec![root.label.clone(), status.to_string(), root.path.display().to_string()]
            })
            .collect();
        out.push_str(&render_table(None, &headers, &rows, &[]));
    }

    if oceans.is_empty() {
        out.push_str(&format!("No oceans found under {}\n", ocean_root.display()));
        return out;
    }
    let headers = [
        "Ocean".to_string(),
        "Name".to_string(),
        "Memories".to_string(),
        "Size MB".to_string(),
        "Path".to_string(),
    ];
    let rows: Vec<Vec<String>> = oceans
        .iter()
        .map(|entry| {
            let meta = &entry.metadata;
            let memories = if meta.exists {
                meta.memory_count.to_string()
            } else {
                "unreadable".to_string()
            };
            vec![
                entry.identifier.clone(),
                meta.display_name.clone().unwrap_or_default(),
                memories,
                meta.size_mb.clone(),
                entry.path.display().to_string(),
            ]
        })
        .collect();
    let title = format!("Oceans under {}", ocean_root.display());
    out.push_str(&render_table(
        Some(&title),
        &headers,
        &rows,
        &[Align::Left, Align::Left, Align::Right, Align::Right, Align::Left],
    ));
    out
}

/// Usage shown at the custom path prompt.
pub fn render_custom_path_help() -> String {
    let lines = [
        "Enter the path to a database file, for example:".to_string(),
        "  ~/Dev/base-ocean/database/base-ocean.db".to_string(),
        "  ./sidekick_universe.db".to_string(),
        "Type ? for this help or q to cancel.".to_string(),
    ];
    render_panel("Custom Path", &lines)
}

/// Prints a success line.
pub fn success(out: &mut dyn Write, message: impl Display) -> io::Result<()> {
    writeln!(out, "{} {}", "✓".green(), message)
}

/// Prints an error line.
pub fn error(out: &mut dyn Write, message: impl Display) -> io::Result<()> {
    writeln!(out, "{} {}", "Error:".red().bold(), message)
}

/// Prints a warning line.
pub fn warning(out: &mut dyn Write, message: impl Display) -> io::Result<()> {
    writeln!(out, "{}", message.to_string().yellow())
}

/// Prints an informational line.
pub fn info(out: &mut dyn Write, message: impl Display) -> io::Result<()> {
    writeln!(out, "{}", message.to_string().dimmed())
}

/// Cells are drawn on one line so each table row is one output line.
fn single_line(text: &str) -> String {
    text.chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocean_explorer_core::{ColumnDescriptor, OceanMetadata, Value};
    use ocean_explorer_discovery::MenuItem;
    use std::path::PathBuf;

    fn data_lines(text: &str) -> usize {
        // Header and data rows both start with the vertical bar; subtract the header.
        text.lines().filter(|l| l.starts_with('│')).count() - 1
    }

    fn numbered_rows(n: i64) -> RowSet {
        let mut rows = RowSet::new(vec!["n".into()]);
        for i in 0..n {
            rows.push(vec![Value::Integer(i)]);
        }
        rows
    }

    #[test]
    fn test_render_rows_truncates_at_limit() {
        let rendered = render_rows(&numbered_rows(120), Some(50));
        assert_eq!(rendered.shown, 50);
        assert_eq!(rendered.total, 120);
        assert!(rendered.truncated());
        assert_eq!(data_lines(&rendered.text), 50);
        assert!(rendered.text.contains("first 50 of 120"));
        assert!(rendered.text.contains("LIMIT"));
    }

    #[test]
    fn test_render_rows_under_limit_shows_total() {
        let rendered = render_rows(&numbered_rows(3), Some(50));
        assert!(!rendered.truncated());
        assert_eq!(data_lines(&rendered.text), 3);
        assert!(rendered.text.contains("Total rows: 3"));
    }

    #[test]
    fn test_render_rows_without_limit_shows_everything() {
        let rendered = render_rows(&numbered_rows(75), None);
        assert_eq!(rendered.shown, 75);
        assert_eq!(data_lines(&rendered.text), 75);
    }

    #[test]
    fn test_render_rows_empty() {
        let rendered = render_rows(&RowSet::new(vec!["n".into()]), Some(50));
        assert_eq!(rendered.text, "No results found\n");
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let headers = vec!["name".to_string(), "count".to_string()];
        let rows = vec![
            vec!["memories".to_string(), "5".to_string()],
            vec!["m".to_string(), "12345".to_string()],
        ];
        let text = render_table(None, &headers, &rows, &[Align::Left, Align::Right]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "╭──────────┬───────╮");
        assert_eq!(lines[1], "│ name     │ count │");
        assert_eq!(lines[3], "│ memories │     5 │");
        assert_eq!(lines[4], "│ m        │ 12345 │");
        assert_eq!(lines[5], "╰──────────┴───────╯");
    }

    #[test]
    fn test_wide_characters_keep_columns_aligned() {
        let headers = vec!["name".to_string(), "n".to_string()];
        let rows = vec![vec!["海洋记忆".to_string(), "1".to_string()]];
        let text = render_table(None, &headers, &rows, &[]);
        assert!(text.contains("│ name     │ n │"), "{text}");
        assert!(text.contains("│ 海洋记忆 │ 1 │"), "{text}");
        assert!(text.starts_with("╭──────────┬───╮"), "{text}");
    }

    #[test]
    fn test_null_and_newlines_render_inline() {
        let mut rows = RowSet::new(vec!["a".into(), "b".into()]);
        rows.push(vec![Value::Null, Value::Text("two\nlines".into())]);
        let text = render_rows(&rows, None).text;
        assert!(text.contains("│ NULL │ two lines │"));
    }

    #[test]
    fn test_schema_tree_marks_columns() {
        let tables = vec![TableDescriptor {
            name: "memories".into(),
            columns: vec![
                ColumnDescriptor {
                    position: 0,
                    name: "id".into(),
                    declared_type: "INTEGER".into(),
                    not_null: false,
                    default_value: None,
                    primary_key: true,
                },
                ColumnDescriptor {
                    position: 1,
                    name: "content".into(),
                    declared_type: "TEXT".into(),
                    not_null: true,
                    default_value: None,
                    primary_key: false,
                },
            ],
            row_count: 5,
        }];
        let tree = render_schema_tree(&tables);
        assert_eq!(
            tree,
            "Database Schema\n\
             └── memories (5 rows)\n    \
             ├── id INTEGER [PK]\n    \
             └── content TEXT NOT NULL\n"
        );
    }

    #[test]
    fn test_table_counts_right_aligns_counts() {
        let text = render_table_counts(&[("memories".into(), 5), ("models".into(), 4)]);
        assert!(text.starts_with("Database Tables\n"));
        assert!(text.contains("│ memories   │         5 │"));
        assert!(text.contains("│ models     │         4 │"));
    }

    #[test]
    fn test_panel_fits_longest_line() {
        let panel = render_panel("T", &["short".into(), "a longer line".into()]);
        let widths: Vec<usize> = panel.lines().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{panel}");
    }

    #[test]
    fn test_connected_banner_names_policy() {
        let text = render_connected(Path::new("/tmp/x.db"));
        assert!(text.contains("/tmp/x.db"));
        assert!(text.contains("Read-only mode"));
        assert!(text.contains("DROP"));
    }

    #[test]
    fn test_catalog_marks_missing_and_unreadable() {
        let roots = vec![KnownRootStatus {
            label: "Base".into(),
            path: PathBuf::from("/nowhere/base.db"),
            exists: false,
        }];
        let oceans = vec![OceanEntry {
            identifier: "kraken".into(),
            path: PathBuf::from("/o/k/kraken/ocean.db"),
            metadata: OceanMetadata::degraded(0),
        }];
        let text = render_catalog(&roots, Path::new("/o"), &oceans);
        assert!(text.contains("│ Base       │ missing │"));
        assert!(text.contains("Oceans under /o"));
        assert!(text.contains("unreadable"));

        let empty = render_catalog(&[], Path::new("/o"), &[]);
        assert_eq!(empty, "No oceans found under /o\n");
    }

    #[test]
    fn test_menu_shows_keys_and_ocean_details() {
        let view = MenuView {
            state: MenuState::Prefix('h'),
            items: vec![
                MenuItem {
                    key: "1".into(),
                    kind: MenuItemKind::Ocean(OceanEntry {
                        identifier: "harbor".into(),
                        path: PathBuf::from("/o/h/harbor/ocean.db"),
                        metadata: OceanMetadata {
                            memory_count: 12,
                            size_mb: "0.05".into(),
                            display_name: Some("Harbor".into()),
                            exists: true,
                        },
                    }),
                },
                MenuItem {
                    key: "b".into(),
                    kind: MenuItemKind::Up,
                },
            ],
        };
        let text = render_menu(&view, Path::new("/o"));
        assert!(text.contains("[1] Harbor (harbor)  12 memories, 0.05 MB"));
        assert!(text.contains("/o/h/harbor/ocean.db"));
        assert!(text.contains("[b] Back to main menu"));
    }
}
