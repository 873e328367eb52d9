//! CLI command implementations for SSN.

pub(crate) mod inspect;
pub(crate) mod play;
pub(crate) mod scenario;
pub(crate) mod sweep;

mod output;

use std::fs;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use ssn::persistence::PersistenceError;
use ssn::rps::OpponentKind;
use ssn::{Config, SsnError};
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format for `play`, `scenario` and `inspect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum PlayFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `sweep` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SweepFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// Opponent model selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OpponentArg {
    /// Mostly one move, rotating every 300 rounds.
    Biased,
    /// Uniformly random moves.
    Uniform,
}

impl From<OpponentArg> for OpponentKind {
    fn from(arg: OpponentArg) -> Self {
        match arg {
            OpponentArg::Biased => Self::Biased,
            OpponentArg::Uniform => Self::Uniform,
        }
    }
}

/// Engine hyperparameters shared by the experiment commands.
///
/// Values come from the command's defaults, then `--config`, then any
/// individual flag.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct EngineArgs {
    /// JSON file with engine config fields (missing fields keep defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Paths per engine
    #[arg(long)]
    pop_size: Option<i32>,

    /// Symbols per path
    #[arg(long)]
    path_len: Option<i32>,

    /// Selection inverse temperature
    #[arg(long, allow_negative_numbers = true)]
    alpha: Option<f32>,

    /// Reward learning rate
    #[arg(long, allow_negative_numbers = true)]
    beta: Option<f32>,

    /// Energy decay
    #[arg(long, allow_negative_numbers = true)]
    gamma: Option<f32>,

    /// Base seed (default: entropy)
    #[arg(short, long)]
    seed: Option<u64>,
}

impl EngineArgs {
    /// Layer the config file and flags over `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed, or the
    /// result fails validation.
    pub(crate) fn resolve(&self, base: Config) -> Result<Config, CliError> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|e| {
                    CliError::new(format!("Failed to read {}: {e}", path.display()))
                })?;
                layer_json(base, &text).map_err(|e| {
                    CliError::new(format!("Failed to parse {}: {e}", path.display()))
                })?
            }
            None => base,
        };

        if let Some(v) = self.pop_size {
            config.population_size = v;
        }
        if let Some(v) = self.path_len {
            config.path_length = v;
        }
        if let Some(v) = self.alpha {
            config.alpha = v;
        }
        if let Some(v) = self.beta {
            config.beta = v;
        }
        if let Some(v) = self.gamma {
            config.gamma = v;
        }
        if let Some(v) = self.seed {
            config.seed = v;
        }

        config.validate().map_err(SsnError::from)?;
        Ok(config)
    }
}

/// Overlay the fields present in a JSON object onto `base`.
fn layer_json(base: Config, text: &str) -> Result<Config, serde_json::Error> {
    let overlay: serde_json::Map<String, serde_json::Value> = serde_json::from_str(text)?;
    let mut merged = serde_json::to_value(base)?;
    if let serde_json::Value::Object(fields) = &mut merged {
        fields.extend(overlay);
    }
    serde_json::from_value(merged)
}

/// Install the stderr log subscriber.
///
/// `-v` flags win over `RUST_LOG`; with neither, only warnings are shown.
pub(crate) fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Seed used when the user gave none.
pub(crate) fn entropy_seed() -> u64 {
    match rand::random::<u64>() {
        0 => 1,
        s => s,
    }
}

/// CLI error type.
#[derive(Debug, Error)]
#[error("{message}")]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<SsnError> for CliError {
    fn from(e: SsnError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<PersistenceError> for CliError {
    fn from(e: PersistenceError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}
