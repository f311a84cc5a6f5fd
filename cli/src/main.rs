mod error_formatter;
mod formatter;
mod interactive;
#[cfg(feature = "server")]
mod server;

use anyhow::Result;
use clap::{Parser, Subcommand};
use formatter::Formatter;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use waypoint::{analysis, Engine, WaypointError};

#[derive(Parser)]
#[command(name = "waypoint")]
#[command(about = "Guided questionnaires that end in a recommendation.")]
#[command(
    long_about = "Waypoint walks through decision trees written in .tree files, one question at a time, until a rule recommends a track.\nThe CLI replays answers, runs trees interactively, checks tree files, and serves sessions over HTTP."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a tree's questions and show where they lead
    ///
    /// Loads the built-in tree and every .tree file in the workspace, starts a session on
    /// TREE and replays the given answers in order. Prints the question that is live
    /// afterwards, or the recommendation once one is reached.
    Run {
        /// Tree to run (default tree: career_advisor). May be omitted when answers follow.
        #[arg(value_name = "TREE")]
        tree: Option<String>,
        /// Answers to replay (format: question_id=answer)
        ///
        /// Examples: field_interest="Data & AI" data_ai_focus="Data Science"
        answers: Vec<String>,
        /// Workspace root directory containing .tree files
        #[arg(short = 'd', long = "dir", default_value = ".")]
        workdir: PathBuf,
        /// Keep asking the remaining questions interactively
        #[arg(short = 'i', long)]
        interactive: bool,
        /// Print the transcript and live fact as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a tree's questions and rules
    Show {
        /// Name of the tree to show
        tree: String,
        /// Workspace root directory containing .tree files
        #[arg(short = 'd', long = "dir", default_value = ".")]
        workdir: PathBuf,
    },
    /// List all trees with question and rule counts
    List {
        /// Workspace root directory containing .tree files
        #[arg(default_value = ".")]
        root: PathBuf,
    },
    /// Parse and validate every .tree file, reporting all problems
    Check {
        /// Workspace root directory containing .tree files
        #[arg(default_value = ".")]
        root: PathBuf,
    },
    /// Print every answer sequence from the root to a recommendation
    Paths {
        /// Name of the tree
        tree: String,
        /// Only paths whose track contains this text (case-insensitive)
        #[arg(short = 't', long)]
        track: Option<String>,
        /// Workspace root directory containing .tree files
        #[arg(short = 'd', long = "dir", default_value = ".")]
        workdir: PathBuf,
        /// Print paths as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start HTTP REST API server (default: localhost:3000)
    ///
    /// Serves one session per client over HTTP. Each session has its own facts.
    /// API: POST /sessions with {tree}, then POST /sessions/:id/answer with {question_id, value}
    Server {
        /// Workspace root directory containing .tree files
        #[arg(short = 'd', long = "dir", default_value = ".")]
        workdir: PathBuf,
        /// Host address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port number to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

fn main() {
    let cli = Cli::parse();

    if !matches!(cli.command, Commands::Server { .. }) {
        init_tracing("warn");
    }

    let result = match &cli.command {
        Commands::Run {
            tree,
            answers,
            workdir,
            interactive,
            json,
        } => run_command(workdir, tree.as_deref(), answers, *interactive, *json),
        Commands::Show { tree, workdir } => show_command(workdir, tree),
        Commands::List { root } => list_command(root),
        Commands::Check { root } => check_command(root),
        Commands::Paths {
            tree,
            track,
            workdir,
            json,
        } => paths_command(workdir, tree, track.as_deref(), *json),
        Commands::Server {
            workdir,
            host,
            port,
        } => server_command(workdir, host, *port),
    };

    if let Err(e) = result {
        // Render tree errors against their source, everything else plainly
        if let Some(waypoint_err) = e.downcast_ref::<WaypointError>() {
            eprintln!("{}", error_formatter::format_error(waypoint_err));
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

/// Log to stderr, honouring RUST_LOG when set
pub(crate) fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_command(
    workdir: &Path,
    tree: Option<&str>,
    answers: &[String],
    interactive: bool,
    json: bool,
) -> Result<()> {
    let engine = load_workspace(workdir)?;

    // A tree name never contains '=', so a first positional that does is an answer
    let (tree, answers) = match tree {
        Some(first) if first.contains('=') => {
            let mut all = vec![first.to_string()];
            all.extend(answers.iter().cloned());
            (None, all)
        }
        other => (other, answers.to_vec()),
    };

    let tree = match tree {
        Some(name) => name.to_string(),
        None if interactive => interactive::select_tree(&engine)?,
        None => waypoint::builtin::CAREER_ADVISOR.to_string(),
    };

    let mut session = engine.session(&tree)?;

    let refs: Vec<&str> = answers.iter().map(|s| s.as_str()).collect();
    for answer in waypoint::parse_answers(&refs)? {
        session.answer(&answer.question_id, &answer.value)?;
    }

    if interactive {
        interactive::run_interactive(&mut session)?;
    }

    // Interactive runs have already shown the outcome
    let formatter = Formatter::default();
    if json {
        println!("{}", formatter.format_session_json(&session)?);
    } else if !interactive {
        print!("{}", formatter.format_session(&session));
    }

    Ok(())
}

fn show_command(workdir: &Path, tree_name: &str) -> Result<()> {
    let engine = load_workspace(workdir)?;

    if let Some(table) = engine.get_tree(tree_name) {
        let formatter = Formatter::default();
        print!("{}", formatter.format_tree_inspection(table));
    } else {
        eprintln!("Error: Tree '{}' not found", tree_name);
        std::process::exit(1);
    }

    Ok(())
}

fn list_command(root: &Path) -> Result<()> {
    println!("Loading workspace from {}...", root.display());

    let mut engine = Engine::with_builtin()?;
    let mut file_count = 0;
    for path in tree_files(root)? {
        file_count += 1;
        let source_id = path.to_string_lossy().to_string();
        let code = fs::read_to_string(&path)?;
        if !is_builtin_copy(&code) {
            engine.add_tree_code(&code, &source_id)?;
        }
    }

    let trees = engine.list_trees();
    let tree_stats: Vec<(String, usize, usize)> = trees
        .iter()
        .filter_map(|name| {
            engine
                .get_tree(name)
                .map(|t| (name.clone(), t.question_count(), t.rule_count()))
        })
        .collect();

    println!();
    let formatter = Formatter::default();
    print!(
        "{}",
        formatter.format_workspace_summary(file_count, trees.len(), &tree_stats)
    );

    Ok(())
}

fn check_command(root: &Path) -> Result<()> {
    let mut engine = Engine::with_builtin()?;
    let mut failed = 0;
    let mut checked = 0;

    for path in tree_files(root)? {
        checked += 1;
        let source_id = path.to_string_lossy().to_string();
        let code = fs::read_to_string(&path)?;
        if is_builtin_copy(&code) {
            println!("ok      {} (built-in)", source_id);
            continue;
        }
        match engine.add_tree_code(&code, &source_id) {
            Ok(()) => println!("ok      {}", source_id),
            Err(e) => {
                failed += 1;
                println!("failed  {}", source_id);
                eprintln!("{}", error_formatter::format_error(&e));
            }
        }
    }

    println!();
    println!(
        "{} file(s) checked, {} failed, {} tree(s) valid",
        checked,
        failed,
        engine.list_trees().len()
    );

    if failed > 0 {
        anyhow::bail!("{} tree file(s) failed validation", failed);
    }
    Ok(())
}

fn paths_command(workdir: &Path, tree_name: &str, track: Option<&str>, json: bool) -> Result<()> {
    let engine = load_workspace(workdir)?;
    let table = engine
        .get_tree(tree_name)
        .ok_or_else(|| WaypointError::Engine(format!("Tree '{}' not found", tree_name)))?;

    let paths = match track {
        Some(fragment) => analysis::paths_to(table, fragment),
        None => analysis::paths(table),
    };

    let formatter = Formatter::default();
    if json {
        println!("{}", serde_json::to_string_pretty(&paths)?);
    } else {
        print!("{}", formatter.format_paths(&paths));
    }

    Ok(())
}

fn server_command(workdir: &Path, host: &str, port: u16) -> Result<()> {
    #[cfg(feature = "server")]
    {
        use tokio::runtime::Runtime;
        let rt = Runtime::new()?;
        rt.block_on(async {
            let engine = load_workspace(workdir)?;

            println!(
                "Starting HTTP server with {} tree(s) loaded",
                engine.list_trees().len()
            );
            server::http::start_server(engine, host, port).await
        })?;
    }

    #[cfg(not(feature = "server"))]
    {
        let _ = (workdir, host, port);
        eprintln!("Error: Server feature not enabled");
        eprintln!("Recompile with: cargo build --features server");
        std::process::exit(1);
    }

    Ok(())
}

/// Every .tree file under `root`, in a stable order
fn tree_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.path().extension().and_then(|s| s.to_str()) == Some("tree") {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// A file holding the built-in tree's own source, as in a checkout of this
/// repository. Line endings are ignored.
fn is_builtin_copy(code: &str) -> bool {
    code.lines()
        .eq(waypoint::builtin::CAREER_ADVISOR_SOURCE.lines())
}

/// Load the built-in tree plus all .tree files from the workspace directory
fn load_workspace(workdir: &Path) -> Result<Engine> {
    let mut engine = Engine::with_builtin()?;
    for path in tree_files(workdir)? {
        let code = fs::read_to_string(&path)?;
        if is_builtin_copy(&code) {
            tracing::debug!(path = %path.display(), "skipping copy of built-in tree");
            continue;
        }
        let source_id = path.to_string_lossy().to_string();
        engine.add_tree_code(&code, &source_id)?;
    }

    Ok(engine)
}
