#![forbid(unsafe_code)]
use std::{num::NonZeroU32, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use log::{debug, error};

mod commands;
mod config;

#[derive(Debug, Parser)]
/// Plant equipment scheduler
struct App {
    #[command(flatten)]
    verbose: Verbosity,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Schedule the plant data referenced by a settings file
    Schedule(Schedule),
    /// Generate a random plant data set together with its settings file
    Generate(Generate),
    /// Compare the algorithms over a folder of plant data sets
    Benchmark(Benchmark),
}

#[derive(Args, Debug)]
pub struct Schedule {
    /// Settings file (JSON)
    #[arg(short, long)]
    pub config: PathBuf,

    /// Algorithm to use instead of the configured one
    #[arg(short, long)]
    pub algorithm: Option<String>,

    /// Iteration cap of each optimization stage
    #[arg(short, long)]
    pub max_iterations: Option<NonZeroU32>,

    /// Output file instead of the configured one (.json for JSON, text otherwise)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct Generate {
    /// Number of machine tools
    #[arg(long, default_value_t = 4)]
    pub equipment: usize,

    /// Number of nomenclature entries
    #[arg(long, default_value_t = 5)]
    pub nomenclature: usize,

    /// Number of parties
    #[arg(long, default_value_t = 40)]
    pub parties: usize,

    /// Seed of the random generator, random if absent
    #[arg(long)]
    pub seed: Option<u64>,

    /// Target directory
    #[arg(required = true)]
    pub dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct Benchmark {
    /// Folder with one plant data set per subdirectory
    #[arg(required = true)]
    pub folder: PathBuf,

    /// File receiving one line per data set
    #[arg(required = true)]
    pub output: PathBuf,
}

fn main() {
    let args: App = App::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    debug!("{args:?}");

    if let Err(err) = match args.command {
        Commands::Schedule(schedule) => commands::schedule(schedule),
        Commands::Generate(generate) => commands::generate(generate),
        Commands::Benchmark(benchmark) => commands::benchmark(benchmark),
    } {
        error!("An error occurred: {err:#}");
        std::process::exit(1);
    }
}
