//! Play command implementation.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use super::output::{format_match_text, JsonMatchResult};
use super::{entropy_seed, CliError, EngineArgs, OpponentArg, PlayFormat};
use ssn::persistence::{context_state_path, load_state_file, save_state_file};
use ssn::rps::{run_match, write_csv, ContextualPlayer, MatchConfig, OpponentKind};
use tracing::info;

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the config is invalid or a file cannot be read or
/// written.
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute(
    engine_args: &EngineArgs,
    steps: u32,
    opponent: OpponentArg,
    opponent_seed: Option<u64>,
    format: PlayFormat,
    log: Option<&Path>,
    save_dir: Option<&Path>,
    load_dir: Option<&Path>,
) -> Result<(), CliError> {
    let mut engine = engine_args.resolve(MatchConfig::default().engine)?;
    if engine.seed == 0 {
        engine.seed = entropy_seed();
    }
    let opponent_seed = opponent_seed.unwrap_or(engine.seed ^ 0x9E37_79B9_7F4A_7C15);

    let mut player = ContextualPlayer::new(engine)?;
    if let Some(dir) = load_dir {
        for (i, context_engine) in player.engines_mut().iter_mut().enumerate() {
            load_state_file(context_engine, &context_state_path(dir, i))?;
        }
        info!(dir = %dir.display(), "resumed context engines");
    }

    let mut opponent = OpponentKind::from(opponent).build(opponent_seed);
    let report = run_match(&mut player, opponent.as_mut(), steps)?;

    if let Some(path) = log {
        let file = File::create(path)
            .map_err(|e| CliError::new(format!("Failed to create {}: {e}", path.display())))?;
        write_csv(&report, BufWriter::new(file))?;
    }

    if let Some(dir) = save_dir {
        fs::create_dir_all(dir)
            .map_err(|e| CliError::new(format!("Failed to create {}: {e}", dir.display())))?;
        for (i, context_engine) in player.engines().iter().enumerate() {
            save_state_file(context_engine, &context_state_path(dir, i))?;
        }
        info!(dir = %dir.display(), "saved context engines");
    }

    match format {
        PlayFormat::Text => {
            print!("{}", format_match_text(&report, engine.seed));
            if let Some(path) = log {
                println!("  Log: {}", path.display());
            }
        }
        PlayFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonMatchResult::from_report(
                &report,
                engine.seed,
                opponent_seed,
            ))?;
            println!("{json}");
        }
    }

    Ok(())
}
