//! Sweep command implementation.

use std::time::Instant;

use super::output::{format_sweep_csv, format_sweep_text, JsonSweepResult};
use super::{entropy_seed, CliError, EngineArgs, OpponentArg, SweepFormat};
use indicatif::{ProgressBar, ProgressStyle};
use ssn::rps::{run_sweep, MatchConfig};

/// Execute the sweep command.
///
/// # Errors
///
/// Returns an error if the config is invalid or no match completes.
pub(crate) fn execute(
    engine_args: &EngineArgs,
    matches: u64,
    steps: u32,
    opponent: OpponentArg,
    threads: Option<usize>,
    format: SweepFormat,
    progress: bool,
) -> Result<(), CliError> {
    let engine = engine_args.resolve(MatchConfig::default().engine)?;
    let base_seed = match engine.seed {
        0 => entropy_seed(),
        s => s,
    };

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let pb = if progress {
        let pb = ProgressBar::new(matches);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} matches ({per_sec})")
            .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let config = MatchConfig {
        steps,
        engine,
        opponent: opponent.into(),
        opponent_seed: 0,
    };

    let start = Instant::now();
    let stats = run_sweep(&config, matches, base_seed, |_| {
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    });
    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }
    let duration = start.elapsed();

    if stats.matches == 0 && matches > 0 {
        return Err(CliError::new(format!(
            "all {} matches failed to start",
            stats.failures
        )));
    }

    match format {
        SweepFormat::Text => {
            println!();
            print!("{}", format_sweep_text(&stats, base_seed));
            println!();
            println!("Duration: {:.2}s", duration.as_secs_f64());
        }
        SweepFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonSweepResult::from_stats(&stats, base_seed))?;
            println!("{json}");
        }
        SweepFormat::Csv => {
            print!("{}", format_sweep_csv(&stats, base_seed));
        }
    }

    Ok(())
}
