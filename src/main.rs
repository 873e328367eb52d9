//! SSN CLI - run structural selection experiments and inspect saved state.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// SSN - structural selection network experiments
#[derive(Parser, Debug)]
#[command(name = "ssn")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play one rock-paper-scissors match against a synthetic opponent
    Play {
        #[command(flatten)]
        engine: cli::EngineArgs,

        /// Rounds to play (default: 1000)
        #[arg(short = 'n', long, default_value = "1000")]
        steps: u32,

        /// Opponent model
        #[arg(short, long, default_value = "biased")]
        opponent: cli::OpponentArg,

        /// Opponent seed (default: derived from the engine seed)
        #[arg(long)]
        opponent_seed: Option<u64>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::PlayFormat,

        /// Write per-round CSV log to file
        #[arg(long)]
        log: Option<PathBuf>,

        /// Save each context engine's state into this directory
        #[arg(long)]
        save_dir: Option<PathBuf>,

        /// Resume context engines from state files in this directory; the
        /// active context still starts at Rock
        #[arg(long)]
        load_dir: Option<PathBuf>,
    },

    /// Run many matches in parallel and aggregate win rates
    Sweep {
        #[command(flatten)]
        engine: cli::EngineArgs,

        /// Number of matches (default: 100)
        #[arg(short, long, default_value = "100")]
        matches: u64,

        /// Rounds per match (default: 1000)
        #[arg(short = 'n', long, default_value = "1000")]
        steps: u32,

        /// Opponent model
        #[arg(short, long, default_value = "biased")]
        opponent: cli::OpponentArg,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::SweepFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Reward a single target symbol and report how often it is selected
    Scenario {
        /// Select/update cycles (default: 1000)
        #[arg(short, long, default_value = "1000")]
        cycles: u32,

        /// Trailing cycles to measure (default: 200)
        #[arg(short, long, default_value = "200")]
        window: u32,

        /// Target symbol (default: 0)
        #[arg(short, long, default_value = "0")]
        target: u8,

        /// Engine seed (default: 42)
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::PlayFormat,
    },

    /// Decode a saved state file and summarize it
    Inspect {
        /// State file
        #[arg(required = true)]
        state: PathBuf,

        /// Alphabet size the state was written with
        #[arg(long, default_value = "3")]
        arity: u8,

        /// Print every path with its energy
        #[arg(long)]
        paths: bool,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::PlayFormat,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    cli::init_logging(args.verbose);

    let result = match args.command {
        Commands::Play {
            engine,
            steps,
            opponent,
            opponent_seed,
            format,
            log,
            save_dir,
            load_dir,
        } => cli::play::execute(
            &engine,
            steps,
            opponent,
            opponent_seed,
            format,
            log.as_deref(),
            save_dir.as_deref(),
            load_dir.as_deref(),
        ),

        Commands::Sweep {
            engine,
            matches,
            steps,
            opponent,
            threads,
            format,
            progress,
        } => cli::sweep::execute(&engine, matches, steps, opponent, threads, format, progress),

        Commands::Scenario {
            cycles,
            window,
            target,
            seed,
            format,
        } => cli::scenario::execute(cycles, window, target, seed, format),

        Commands::Inspect {
            state,
            arity,
            paths,
            format,
        } => cli::inspect::execute(&state, arity, paths, format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
