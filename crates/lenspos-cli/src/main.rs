mod commands;
mod job;
mod models;
mod summary;
mod timeout;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lenspos", about = "Strong-lensing multiple-image position solver")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Worker threads for candidate refinement (default: all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find every image position of each source in a job file
    Find(commands::find::FindArgs),
    /// Pair observed positions with precise image positions
    Pair(commands::pair::PairArgs),
    /// Print or save a default job file
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    match &cli.command {
        Commands::Find(args) => commands::find::run(args),
        Commands::Pair(args) => commands::pair::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
