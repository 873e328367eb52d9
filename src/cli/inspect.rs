//! Inspect command implementation.

use std::fs;
use std::path::Path;

use super::output::{format_state_text, JsonStateSummary};
use super::{CliError, PlayFormat};
use ssn::Engine;

/// Execute the inspect command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not decode.
pub(crate) fn execute(path: &Path, arity: u8, paths: bool, format: PlayFormat) -> Result<(), CliError> {
    let bytes = fs::read(path)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", path.display())))?;
    let engine = Engine::restore(&bytes, arity)
        .map_err(|e| CliError::new(format!("{}: {e}", path.display())))?;
    let state = engine.state()?;

    match format {
        PlayFormat::Text => print!("{}", format_state_text(state, bytes.len(), paths)),
        PlayFormat::Json => {
            let summary = JsonStateSummary::from_state(state, bytes.len(), paths);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
