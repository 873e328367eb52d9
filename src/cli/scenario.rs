//! Scenario command implementation.

use super::output::format_scenario_text;
use super::{CliError, PlayFormat};
use ssn::scenario::TargetScenario;
use ssn::Config;

/// Execute the scenario command.
///
/// # Errors
///
/// Returns an error if the target is outside the alphabet or the engine
/// fails.
pub(crate) fn execute(
    cycles: u32,
    window: u32,
    target: u8,
    seed: u64,
    format: PlayFormat,
) -> Result<(), CliError> {
    let defaults = TargetScenario::default();
    if target >= defaults.engine.arity {
        return Err(CliError::new(format!(
            "target symbol {target} is outside an alphabet of {}",
            defaults.engine.arity
        )));
    }

    let scenario = TargetScenario {
        engine: Config {
            seed,
            ..defaults.engine
        },
        cycles,
        window,
        target,
        ..defaults
    };
    let report = scenario.run()?;

    match format {
        PlayFormat::Text => print!("{}", format_scenario_text(&report, target)),
        PlayFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}
