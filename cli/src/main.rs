mod driver;
mod input;
mod render;
mod selection;
mod session;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand};
use ocean_explorer_core::QueryResult;
use ocean_explorer_discovery::{ExplorerConfig, OceanCatalog};
use ocean_explorer_sqlite::{StoreConnector, create_database};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::input::{Terminal, confirm};

#[derive(Debug, Parser)]
#[command(name = "ocean", version)]
#[command(about = "Browse, inspect and query ocean SQLite databases")]
struct Cli {
    /// Open this database in interactive mode instead of showing the menu.
    #[arg(short = 'd', long = "db")]
    db: Option<PathBuf>,
    /// YAML configuration file (known roots, ocean root, row limit).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the schema tree of a database.
    Schema(DatabaseArgs),
    /// Run one SQL statement without the read-only policy.
    Query(QueryArgs),
    /// List tables with their row counts.
    Tables(DatabaseArgs),
    /// Create an empty database file.
    Create(CreateArgs),
    /// List known roots and every ocean under the ocean root.
    Catalog(CatalogArgs),
}

#[derive(Debug, Args)]
struct DatabaseArgs {
    /// Path to an existing database file.
    db: PathBuf,
}

#[derive(Debug, Args)]
struct QueryArgs {
    /// Path to an existing database file.
    db: PathBuf,
    /// SQL statement to execute.
    sql: String,
    /// Show at most this many rows.
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(Debug, Args)]
struct CreateArgs {
    /// Path of the database file to create.
    db: PathBuf,
    /// Replace an existing file without asking.
    #[arg(long)]
    force: bool,
}

#[derive(Debug, Args)]
struct CatalogArgs {
    /// Print the catalog as JSON.
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Some(Command::Schema(args)) => run_schema(args),
        Some(Command::Query(args)) => run_query(args),
        Some(Command::Tables(args)) => run_tables(args),
        Some(Command::Create(args)) => run_create(args),
        Some(Command::Catalog(args)) => {
            load_config(cli.config.as_deref()).and_then(|config| run_catalog(args, &config))
        }
        None => load_config(cli.config.as_deref())
            .and_then(|config| run_interactive(&config, cli.db)),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so they never interleave with rendered output.
fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ExplorerConfig, String> {
    ExplorerConfig::load_or_default(path).map_err(|e| format!("Failed to load configuration: {e}"))
}

fn open_store(path: &Path) -> Result<StoreConnector, String> {
    StoreConnector::open(path).map_err(|e| e.to_string())
}

fn run_schema(args: DatabaseArgs) -> Result<(), String> {
    let mut store = open_store(&args.db)?;
    let tables = store
        .inspector()
        .and_then(|inspector| inspector.describe_all())
        .map_err(|e| format!("Failed to read schema: {e}"))?;
    print!("{}", render::render_schema_tree(&tables));
    store.close().map_err(|e| e.to_string())
}

fn run_query(args: QueryArgs) -> Result<(), String> {
    let mut store = open_store(&args.db)?;
    let result = store.execute(&args.sql).map_err(|e| e.to_string())?;
    match result {
        QueryResult::Rows(rows) => print!("{}", render::render_rows(&rows, args.limit).text),
        QueryResult::Status { message, .. } => {
            render::success(&mut io::stdout(), message).map_err(|e| e.to_string())?;
        }
    }
    store.close().map_err(|e| e.to_string())
}

fn run_tables(args: DatabaseArgs) -> Result<(), String> {
    let mut store = open_store(&args.db)?;
    let counts = store
        .inspector()
        .and_then(|inspector| inspector.table_counts())
        .map_err(|e| format!("Failed to list tables: {e}"))?;
    print!("{}", render::render_table_counts(&counts));
    store.close().map_err(|e| e.to_string())
}

fn run_create(args: CreateArgs) -> Result<(), String> {
    let mut overwrite = args.force;
    if args.db.exists() && !overwrite {
        let mut terminal = Terminal::new().map_err(|e| e.to_string())?;
        let question = format!("Database '{}' already exists. Overwrite?", args.db.display());
        overwrite = confirm(&mut terminal, &question, false).map_err(|e| e.to_string())?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    create_database(&args.db, overwrite).map_err(|e| e.to_string())?;
    render::success(
        &mut io::stdout(),
        format!("Created database: {}", args.db.display()),
    )
    .map_err(|e| e.to_string())
}

fn run_catalog(args: CatalogArgs, config: &ExplorerConfig) -> Result<(), String> {
    let catalog = OceanCatalog::new(config);
    let roots = catalog.scan_known_roots();
    let oceans: Vec<_> = catalog
        .scan_prefixes(catalog.ocean_root())
        .into_iter()
        .flat_map(|summary| catalog.scan_prefix_directory(catalog.ocean_root(), summary.prefix))
        .collect();

    if args.json {
        let doc = serde_json::json!({
            "ocean_root": catalog.ocean_root(),
            "known_roots": roots,
            "oceans": oceans,
        });
        let text = serde_json::to_string_pretty(&doc)
            .map_err(|e| format!("Failed to serialize catalog: {e}"))?;
        println!("{text}");
    } else {
        print!("{}", render::render_catalog(&roots, catalog.ocean_root(), &oceans));
    }
    Ok(())
}

fn run_interactive(config: &ExplorerConfig, db: Option<PathBuf>) -> Result<(), String> {
    let mut terminal = Terminal::new().map_err(|e| format!("Failed to start terminal input: {e}"))?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = driver::run_explorer(config, db, &mut terminal, &mut out);
    out.flush().map_err(|e| e.to_string())?;
    result
}
