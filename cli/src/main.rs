//! tidyscan - run clang-tidy over C/C++ files and print its diagnostics.
//!
//! ```text
//! main() -> load config -> Analyzer / FallbackPolicy per file (concurrent)
//!                                |
//!                                v
//!                 AnalysisEvent channel -> output::print_*
//! ```
//!
//! Exit status: 0 when no error diagnostics were reported, 1 when any were,
//! 2 when configuration failed or the analyzer could not be run.

mod output;

use std::env;
use std::io::{self, IsTerminal};
use std::path::{self, Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tidyscan_config::{Configuration, WorkspaceFolder};
use tidyscan_core::{AnalysisEvent, Analyzer, Document, FallbackPolicy};

/// Run clang-tidy and print position-resolved diagnostics.
#[derive(Parser, Debug)]
#[command(name = "tidyscan", version, about)]
struct Cli {
    /// Configuration file applied on top of the user and project files
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Workspace folder (repeatable; the first one anchors relative paths)
    #[arg(long = "workspace", value_name = "DIR")]
    workspaces: Vec<PathBuf>,

    /// Language id for every file instead of inferring it from the extension
    #[arg(long, value_name = "ID")]
    language: Option<String>,

    /// Analyzer executable, overriding the configuration
    #[arg(long, value_name = "PATH")]
    executable: Option<String>,

    /// Re-run against the including source file when a header reports nothing
    #[arg(long)]
    fallback: bool,

    /// Print one JSON object per analyzed file
    #[arg(long)]
    json: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Files to analyze
    #[arg(required = true, value_name = "FILES")]
    files: Vec<PathBuf>,
}

fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal()),
        )
        .with(env_filter)
        .init();
}

/// Language id for a file extension. `None` for files we do not know.
fn language_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "c" => Some("c"),
        "cc" | "cpp" | "cxx" | "c++" | "h" | "hh" | "hpp" | "hxx" => Some("cpp"),
        _ => None,
    }
}

fn workspace_folders(dirs: &[PathBuf]) -> Result<Vec<WorkspaceFolder>> {
    let dirs = if dirs.is_empty() {
        vec![env::current_dir().context("reading current directory")?]
    } else {
        dirs.to_vec()
    };
    dirs.iter()
        .map(|dir| {
            let absolute = path::absolute(dir)
                .with_context(|| format!("resolving workspace {}", dir.display()))?;
            Ok(WorkspaceFolder::from_path(&absolute))
        })
        .collect()
}

fn load_documents(cli: &Cli) -> Result<Vec<Arc<Document>>> {
    let mut documents = Vec::with_capacity(cli.files.len());
    for file in &cli.files {
        let language = match cli.language.as_deref().or_else(|| language_for(file)) {
            Some(language) => language,
            None => {
                tracing::warn!(path = %file.display(), "Unknown file type, skipping");
                continue;
            }
        };
        let absolute =
            path::absolute(file).with_context(|| format!("resolving {}", file.display()))?;
        let document = Document::read(&absolute, language)
            .with_context(|| format!("reading {}", absolute.display()))?;
        documents.push(Arc::new(document));
    }
    Ok(documents)
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let folders = workspace_folders(&cli.workspaces)?;
    let project_root = folders.first().map(WorkspaceFolder::path);
    let mut config = Configuration::load(project_root, cli.config.as_deref())
        .context("loading configuration")?;
    if let Some(executable) = &cli.executable {
        config.executable.clone_from(executable);
    }
    let analyzer = Analyzer::new(Arc::new(config.resolve(&folders)));
    let documents = load_documents(&cli)?;

    let (tx, mut rx) = mpsc::channel(documents.len().max(1));
    if cli.fallback {
        let policy = Arc::new(FallbackPolicy::new());
        for document in documents {
            policy.spawn(&analyzer, document, tx.clone());
        }
    } else {
        for document in documents {
            analyzer.spawn(document, tx.clone());
        }
    }
    drop(tx);

    let mut reports = Vec::new();
    let mut failed = false;
    while let Some(event) = rx.recv().await {
        match event {
            AnalysisEvent::Completed(report) => reports.push(report),
            AnalysisEvent::Failed { path, error } => {
                eprintln!("tidyscan: {}: {error}", path.display());
                failed = true;
            }
        }
    }
    reports.sort_by(|a, b| a.document().path().cmp(b.document().path()));

    if cli.json {
        output::print_json(&reports)?;
    } else {
        output::print_plain(&reports);
    }

    let errors: usize = reports.iter().map(|r| r.diagnostics().error_count()).sum();
    Ok(if failed {
        ExitCode::from(2)
    } else if errors > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("tidyscan: {e:#}");
            ExitCode::from(2)
        }
    }
}
