//! Approval flow editor CLI.
//!
//! Provides the `approval` binary. Every subcommand loads one stored
//! document from the store directory, applies a single engine operation and
//! saves the document back, so each invocation is one edit.
//!
//! Exit codes: 0 = success, 1 = engine error, 2 = invariant check failure,
//! 3 = I/O or parse error.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::Level;

use approval_core::layout::step_route;
use approval_core::{audit, ApprovalGraph, CoreError, Edge, LayoutConfig, Node, NodeId, NodeKind};
use approval_storage::{DirectoryStore, DocumentStore, Session, StorageError};

const CONFIG_ENV: &str = "APPROVAL_LAYOUT";

/// Edit approval workflow documents.
#[derive(Parser)]
#[command(name = "approval", about = "Edit approval workflow documents")]
struct Cli {
    /// Directory holding the stored documents.
    #[arg(short, long, global = true, default_value = ".")]
    store: PathBuf,

    /// Layout configuration file (JSON). Falls back to $APPROVAL_LAYOUT.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log more (-v info, -vv debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Create a document with one approver between start and end.
    New {
        doc: String,
        /// Title of the initial approver.
        #[arg(long, default_value = "new approver")]
        approver: String,
    },
    /// Print nodes and edges.
    Show {
        doc: String,
        /// Also print the step route drawn for each edge.
        #[arg(long)]
        routes: bool,
    },
    /// Print the document JSON to stdout.
    Export { doc: String },
    /// Replace a document with the contents of a JSON file.
    Import { doc: String, file: PathBuf },
    /// Insert an approver in series after a node.
    Serial {
        doc: String,
        after: String,
        /// Split the edge into the end node instead.
        #[arg(long)]
        before_end: bool,
    },
    /// Insert an approver parallel to a node.
    Parallel { doc: String, beside: String },
    /// Delete a node and reconnect its neighbours.
    DeleteNode { doc: String, id: String },
    /// Delete a single edge.
    DeleteEdge {
        doc: String,
        source: String,
        target: String,
    },
    /// Change a node's title.
    Rename {
        doc: String,
        id: String,
        title: String,
    },
    /// Audit a document and report every broken invariant.
    Check { doc: String },
    /// List stored documents.
    List,
    /// Delete a stored document.
    Remove { doc: String },
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    process::exit(run(cli));
}

/// Dispatches one subcommand and returns the process exit code.
fn run(cli: Cli) -> i32 {
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 3;
        }
    };

    let mut store = match DirectoryStore::open(&cli.store) {
        Ok(store) => store,
        Err(e) => {
            eprintln!(
                "Error: failed to open store '{}': {}",
                cli.store.display(),
                e
            );
            return 3;
        }
    };

    match cli.command {
        Commands::New { doc, approver } => run_new(&mut store, &doc, &approver, config),
        Commands::Show { doc, routes } => with_session(&store, &doc, config, |session| {
            print_graph(session.graph(), routes);
            Ok(())
        }),
        Commands::Export { doc } => with_session(&store, &doc, config, |session| {
            let json = session.export().to_json_pretty()?;
            println!("{}", json);
            Ok(())
        }),
        Commands::Import { doc, file } => run_import(&mut store, &doc, &file, config),
        Commands::Serial {
            doc,
            after,
            before_end,
        } => edit(&mut store, &doc, config, |session| {
            let node = session.insert_serial(&NodeId::new(after), before_end)?;
            print_node(&node);
            Ok(())
        }),
        Commands::Parallel { doc, beside } => edit(&mut store, &doc, config, |session| {
            let node = session.insert_parallel(&NodeId::new(beside))?;
            print_node(&node);
            Ok(())
        }),
        Commands::DeleteNode { doc, id } => edit(&mut store, &doc, config, |session| {
            let node = session.delete_node(&NodeId::new(id))?;
            print_node(&node);
            Ok(())
        }),
        Commands::DeleteEdge {
            doc,
            source,
            target,
        } => edit(&mut store, &doc, config, |session| {
            let edge = Edge::new(source, target);
            if !session.delete_edge(&edge) {
                return Err(CoreError::InvalidEdge {
                    reason: format!("{edge}: no such edge"),
                }
                .into());
            }
            Ok(())
        }),
        Commands::Rename { doc, id, title } => edit(&mut store, &doc, config, |session| {
            session.rename_node(&NodeId::new(id), title)?;
            Ok(())
        }),
        Commands::Check { doc } => run_check(&store, &doc, config),
        Commands::List => match store.list() {
            Ok(names) => {
                for name in names {
                    println!("{}", name);
                }
                0
            }
            Err(e) => report(&e),
        },
        Commands::Remove { doc } => match store.delete(&doc) {
            Ok(()) => 0,
            Err(e) => report(&e),
        },
    }
}

/// Reads the layout configuration from `path`, then `$APPROVAL_LAYOUT`,
/// then the defaults.
fn load_config(path: Option<&Path>) -> Result<LayoutConfig, String> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => return Ok(LayoutConfig::default()),
        },
    };
    let text = fs::read_to_string(&path)
        .map_err(|e| format!("failed to read config '{}': {}", path.display(), e))?;
    serde_json::from_str(&text)
        .map_err(|e| format!("invalid config '{}': {}", path.display(), e))
}

fn run_new(store: &mut DirectoryStore, doc: &str, approver: &str, config: LayoutConfig) -> i32 {
    match store.exists(doc) {
        Ok(false) => {}
        Ok(true) => {
            eprintln!("Error: document '{}' already exists", doc);
            return 3;
        }
        Err(e) => return report(&e),
    }
    let graph = ApprovalGraph::seeded(config, approver);
    match store.save_graph(doc, &graph) {
        Ok(()) => 0,
        Err(e) => report(&e),
    }
}

fn run_import(store: &mut DirectoryStore, doc: &str, file: &Path, config: LayoutConfig) -> i32 {
    let text = match fs::read_to_string(file) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: failed to read '{}': {}", file.display(), e);
            return 3;
        }
    };
    let mut session = Session::new(config);
    let result = session
        .import_json(&text)
        .and_then(|()| store.save_graph(doc, session.graph()));
    match result {
        Ok(()) => 0,
        Err(e) => report(&e),
    }
}

fn run_check(store: &DirectoryStore, doc: &str, config: LayoutConfig) -> i32 {
    let graph = match store.load_graph(doc, config) {
        Ok(graph) => graph,
        Err(e) => return report(&e),
    };
    let violations = audit(&graph);
    if violations.is_empty() {
        println!(
            "ok: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        return 0;
    }
    eprintln!("Check failed with {} violation(s):", violations.len());
    for violation in &violations {
        eprintln!("  - {}", violation);
    }
    2
}

/// Loads `doc` into a session and runs a read-only command on it.
fn with_session<F>(store: &DirectoryStore, doc: &str, config: LayoutConfig, f: F) -> i32
where
    F: FnOnce(&Session) -> Result<(), StorageError>,
{
    let session = match store.load_graph(doc, config) {
        Ok(graph) => Session::with_graph(graph),
        Err(e) => return report(&e),
    };
    match f(&session) {
        Ok(()) => 0,
        Err(e) => report(&e),
    }
}

/// Loads `doc`, applies one edit and saves it back. Nothing is written if
/// the edit fails.
fn edit<F>(store: &mut DirectoryStore, doc: &str, config: LayoutConfig, f: F) -> i32
where
    F: FnOnce(&mut Session) -> Result<(), StorageError>,
{
    let mut session = match store.load_graph(doc, config) {
        Ok(graph) => Session::with_graph(graph),
        Err(e) => return report(&e),
    };
    let result = f(&mut session)
        .and_then(|()| store.save_graph(doc, session.graph()));
    match result {
        Ok(()) => 0,
        Err(e) => report(&e),
    }
}

/// Prints `e` and maps it to an exit code.
fn report(e: &StorageError) -> i32 {
    match e {
        StorageError::Structure(err) => {
            eprintln!("Error: {}", err);
            1
        }
        _ => {
            eprintln!("Error: {}", e);
            3
        }
    }
}

fn print_node(node: &Node) {
    let json = serde_json::to_string(node)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize node: {}\"}}", e));
    println!("{}", json);
}

fn print_graph(graph: &ApprovalGraph, routes: bool) {
    let canvas = graph.canvas();
    println!("canvas {} x {}", canvas.width, canvas.height);
    println!("nodes:");
    for node in graph.nodes() {
        println!(
            "  {:<12} {:<8} ({:>7}, {:>7})  {}",
            node.id.as_str(),
            kind_label(node.kind()),
            node.x,
            node.y,
            node.title
        );
    }
    println!("edges:");
    for edge in graph.edges() {
        println!("  {}", edge);
        if !routes {
            continue;
        }
        let source = graph.node(edge.source.as_str());
        let target = graph.node(edge.target.as_str());
        if let (Some(source), Some(target)) = (source, target) {
            let points: Vec<String> = step_route(graph.config(), source, target)
                .iter()
                .map(|(x, y)| format!("{x},{y}"))
                .collect();
            println!("    {}", points.join(" "));
        }
    }
}

fn kind_label(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Start => "start",
        NodeKind::End => "end",
        NodeKind::Approver => "approver",
    }
}
