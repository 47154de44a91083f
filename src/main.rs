//! formula-miner: Homebrew formula dependency graph miner
//!
//! Reads a formula corpus and writes its dependency graph as TSV.

#![allow(clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use formula_miner::{cli, config::MinerConfig, reports::ReportFormat};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "formula-miner")]
#[command(version)]
#[command(about = "Mine Homebrew formula metadata into a dependency graph", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Graph written
    1  Error occurred

EXAMPLES:
    # Mine the default checkout into out/deps-brew-<date>.tsv
    formula-miner mine

    # Mine a different checkout with four workers
    formula-miner mine --corpus ~/src/homebrew-core --workers 4

    # Show what a single formula resolves to
    formula-miner inspect Formula/j/jq.rb")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Arguments for the `mine` subcommand
#[derive(Parser)]
struct MineArgs {
    /// Corpus root holding `Formula/` and `Aliases/`
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Directory receiving the dated graph file
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Graph output format
    #[arg(short, long)]
    format: Option<ReportFormat>,

    /// Write the graph to stdout instead of the output directory
    #[arg(long)]
    stdout: bool,

    /// Number of concurrent reader workers
    #[arg(short, long)]
    workers: Option<usize>,

    /// License written for formulas without one
    #[arg(long)]
    fallback_license: Option<String>,

    /// Only use explicit head URLs as repository URLs
    #[arg(long)]
    no_derive_repo: bool,
}

/// Arguments for the `inspect` subcommand
#[derive(Parser)]
struct InspectArgs {
    /// Formula file to extract
    file: PathBuf,

    /// Print the raw extraction instead of the resolved formula
    #[arg(long)]
    raw: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Read the corpus and write the dependency graph
    Mine(MineArgs),

    /// Extract a single formula file and print it as JSON
    Inspect(InspectArgs),

    /// Print an example configuration file
    Init,

    /// Generate JSON Schema for the config file format
    Schema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl MineArgs {
    /// CLI values as a config layer for [`MinerConfig::merge`].
    fn overrides(&self) -> MinerConfig {
        let mut builder = MinerConfig::builder().derive_repo(!self.no_derive_repo);
        if let Some(dir) = &self.corpus {
            builder = builder.corpus_dir(dir);
        }
        if let Some(dir) = &self.output_dir {
            builder = builder.output_dir(dir);
        }
        if let Some(format) = self.format {
            builder = builder.format(format);
        }
        if let Some(workers) = self.workers {
            builder = builder.max_workers(workers);
        }
        if let Some(license) = &self.fallback_license {
            builder = builder.fallback_license(license);
        }
        builder.build()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    match cli.command {
        Commands::Mine(args) => {
            let (config, loaded_from) =
                MinerConfig::from_file_with_overrides(cli.config.as_deref(), &args.overrides());
            if let Some(path) = &loaded_from {
                tracing::debug!("Loaded config from {}", path.display());
            }
            let exit_code = cli::run_mine(config, args.stdout, cli.quiet)?;
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
            Ok(())
        }

        Commands::Inspect(args) => {
            let (config, _) = formula_miner::config::load_or_default(cli.config.as_deref());
            cli::run_inspect(&args.file, args.raw, &config)?;
            Ok(())
        }

        Commands::Init => {
            print!("{}", formula_miner::config::generate_example_config());
            Ok(())
        }

        Commands::Schema { output } => {
            let schema = formula_miner::config::generate_json_schema();
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => {
                    println!("{schema}");
                }
            }
            Ok(())
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "formula-miner", &mut io::stdout());
            Ok(())
        }
    }
}
