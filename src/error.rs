//! Error types for the selection engine.

use thiserror::Error;

/// Why a [`Config`](crate::Config) was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigIssue {
    /// Population size must be strictly positive.
    #[error("population size must be > 0, got {0}")]
    NonPositivePopulation(i32),
    /// Path length must be strictly positive.
    #[error("path length must be > 0, got {0}")]
    NonPositivePathLength(i32),
    /// A hyperparameter was NaN or infinite.
    #[error("{name} must be finite, got {value}")]
    NonFiniteParameter {
        /// Parameter name (`alpha`, `beta` or `gamma`).
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// The symbol alphabet needs at least one symbol.
    #[error("alphabet arity must be > 0")]
    ZeroArity,
    /// Encoded state would not fit in a 32-bit size.
    #[error("encoded state for {population_size} paths of length {path_length} exceeds u32::MAX bytes")]
    StateTooLarge {
        /// Requested population size.
        population_size: i32,
        /// Requested path length.
        path_length: i32,
    },
}

/// Why a saved state buffer was rejected by `load`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CorruptReason {
    /// Buffer is shorter than the version tag plus config header.
    #[error("buffer of {0} bytes is too short for a state header")]
    TruncatedHeader(usize),
    /// Version tag is not one this build understands.
    #[error("unsupported state version {0}")]
    UnknownVersion(u32),
    /// Embedded config is not a valid config.
    #[error("embedded config is invalid")]
    InvalidHeader,
    /// Embedded population shape differs from the live engine.
    #[error(
        "state holds {found_population} paths of length {found_path_length}, \
         engine expects {expected_population} of length {expected_path_length}"
    )]
    ShapeMismatch {
        /// Population size in the live engine.
        expected_population: i32,
        /// Path length in the live engine.
        expected_path_length: i32,
        /// Population size in the buffer.
        found_population: i32,
        /// Path length in the buffer.
        found_path_length: i32,
    },
    /// Buffer length does not match the size implied by its header.
    #[error("expected {expected} bytes, got {actual}")]
    LengthMismatch {
        /// Size implied by the embedded config.
        expected: usize,
        /// Actual buffer length.
        actual: usize,
    },
    /// A path symbol lies outside the alphabet.
    #[error("symbol {symbol} at offset {offset} is outside an alphabet of {arity}")]
    SymbolOutOfAlphabet {
        /// Offset within the flattened symbol block.
        offset: usize,
        /// The offending symbol.
        symbol: u8,
        /// Alphabet size of the live engine.
        arity: u8,
    },
    /// The generator position is the one state xorshift can never reach.
    #[error("random source position is zero")]
    ZeroRngPosition,
}

/// Errors surfaced by engine operations.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SsnError {
    /// Invalid hyperparameters or sizes at creation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigIssue),
    /// A path id outside `[0, population_size)`.
    #[error("path id {id} out of range (population size {population_size})")]
    OutOfRange {
        /// The rejected id.
        id: u32,
        /// Population size of the engine.
        population_size: usize,
    },
    /// Operation on a destroyed engine.
    #[error("engine has been destroyed")]
    InvalidHandle,
    /// Saved state failed validation; the live engine is untouched.
    #[error("corrupt state: {0}")]
    CorruptState(#[from] CorruptReason),
    /// Reward was NaN or infinite.
    #[error("reward must be finite, got {0}")]
    InvalidReward(f32),
}

/// Result type for engine operations.
pub type SsnResult<T> = Result<T, SsnError>;
