use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;

use cxx_sieve::{FsSource, Sieve};

#[derive(Parser)]
#[command(
    name = "cxx-sieve",
    about = "List a repository's own C/C++ files, honoring .gitignore and .gitmodules"
)]
struct Cli {
    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List C/C++ source and header files outside ignored and submodule directories
    List {
        /// Repository root
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Print paths relative to the repository root
        #[arg(short, long)]
        relative: bool,

        /// Emit a JSON report (root, banned dirs, files) instead of plain lines
        #[arg(long)]
        json: bool,
    },
    /// Show the directories excluded by ignore and submodule declarations
    Banned {
        /// Repository root
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Emit a JSON array instead of plain lines
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the listing on stdout stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("cxx-sieve v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();

    match cli.command {
        Commands::List {
            path,
            relative,
            json,
        } => run_list(&path, relative, json)?,
        Commands::Banned { path, json } => run_banned(&path, json)?,
    }

    Ok(())
}

fn run_list(root: &Path, relative: bool, json: bool) -> anyhow::Result<()> {
    if !root.is_dir() {
        anyhow::bail!("'{}' is not a directory", root.display());
    }
    let mut report = Sieve::new(FsSource::new())
        .report(root)
        .map_err(|e| anyhow::anyhow!("Failed to sieve '{}': {}", root.display(), e))?;
    report.files.sort();

    if relative {
        report.files = report
            .files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap_or(f).to_path_buf())
            .collect();
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for file in &report.files {
            println!("{}", file.display());
        }
    }
    Ok(())
}

fn run_banned(root: &Path, json: bool) -> anyhow::Result<()> {
    if !root.is_dir() {
        anyhow::bail!("'{}' is not a directory", root.display());
    }
    let banned = Sieve::new(FsSource::new()).banned_dirs(root).sorted();

    if json {
        println!("{}", serde_json::to_string_pretty(&banned)?);
    } else {
        for dir in &banned {
            println!("{}", dir.display());
        }
    }
    Ok(())
}
