//! Binary state codec.
//!
//! Layout (all little-endian):
//!
//! ```text
//! offset  size      field
//! 0       4         version tag (u32)
//! 4       32        config header
//!                     +0  i32 population_size
//!                     +4  i32 path_length
//!                     +8  f32 alpha
//!                     +12 f32 beta
//!                     +16 f32 gamma
//!                     +20 4 bytes padding (seed alignment)
//!                     +24 u64 seed
//! 36      8         random source position (u64)
//! 44      P*L       path symbols, path by path
//! ..      4*P       energies (f32)
//! ..      8         update counter (u64)
//! ```
//!
//! The total size depends only on the config, so [`state_size`] needs no
//! live engine.

use crate::config::{Config, DEFAULT_ARITY};
use crate::engine::EngineState;
use crate::error::{ConfigIssue, CorruptReason, SsnError, SsnResult};
use crate::population::Population;
use crate::rng::RandomSource;

/// Current state format version.
pub const STATE_VERSION: u32 = 1;

/// Size of the encoded config header.
pub const CONFIG_HEADER_SIZE: usize = 32;

const VERSION_SIZE: usize = 4;
const RNG_SIZE: usize = 8;
const COUNTER_SIZE: usize = 8;
const HEADER_SIZE: usize = VERSION_SIZE + CONFIG_HEADER_SIZE;

/// Encode the 32-byte config header.
#[must_use]
pub fn encode_config(config: &Config) -> [u8; CONFIG_HEADER_SIZE] {
    let mut buf = [0u8; CONFIG_HEADER_SIZE];
    buf[0..4].copy_from_slice(&config.population_size.to_le_bytes());
    buf[4..8].copy_from_slice(&config.path_length.to_le_bytes());
    buf[8..12].copy_from_slice(&config.alpha.to_le_bytes());
    buf[12..16].copy_from_slice(&config.beta.to_le_bytes());
    buf[16..20].copy_from_slice(&config.gamma.to_le_bytes());
    // 20..24 stays zero
    buf[24..32].copy_from_slice(&config.seed.to_le_bytes());
    buf
}

/// Decode a 32-byte config header. Padding is ignored; arity is the default.
#[must_use]
pub fn decode_config(buf: &[u8; CONFIG_HEADER_SIZE]) -> Config {
    let mut reader = Reader::new(buf);
    let population_size = i32::from_le_bytes(reader.array());
    let path_length = i32::from_le_bytes(reader.array());
    let alpha = f32::from_le_bytes(reader.array());
    let beta = f32::from_le_bytes(reader.array());
    let gamma = f32::from_le_bytes(reader.array());
    let _padding: [u8; 4] = reader.array();
    let seed = u64::from_le_bytes(reader.array());

    Config {
        population_size,
        path_length,
        alpha,
        beta,
        gamma,
        seed,
        arity: DEFAULT_ARITY,
    }
}

/// Exact encoded size for `config`.
///
/// # Errors
///
/// Returns [`SsnError::Config`](crate::SsnError::Config) if the config is
/// invalid or the state would not fit in `u32`.
pub fn state_size(config: &Config) -> SsnResult<u32> {
    config.validate()?;
    let too_large = ConfigIssue::StateTooLarge {
        population_size: config.population_size,
        path_length: config.path_length,
    };
    let size = encoded_len(config).ok_or(too_large)?;
    u32::try_from(size).map_err(|_| SsnError::from(too_large))
}

/// Serialize a full engine state.
#[must_use]
pub fn encode(state: &EngineState) -> Vec<u8> {
    let population = &state.population;
    let mut buf = Vec::with_capacity(
        HEADER_SIZE + RNG_SIZE + population.symbols().len() + 4 * population.len() + COUNTER_SIZE,
    );

    buf.extend_from_slice(&STATE_VERSION.to_le_bytes());
    buf.extend_from_slice(&encode_config(&state.config));
    buf.extend_from_slice(&state.rng.position().to_le_bytes());
    buf.extend_from_slice(population.symbols());
    for energy in population.energies() {
        buf.extend_from_slice(&energy.to_le_bytes());
    }
    buf.extend_from_slice(&population.update_count().to_le_bytes());
    buf
}

/// Read the version tag and embedded config without decoding the body.
///
/// # Errors
///
/// Returns [`SsnError::CorruptState`](crate::SsnError::CorruptState) for a
/// short buffer or unknown version.
pub fn read_header(bytes: &[u8]) -> SsnResult<Config> {
    let header: &[u8; HEADER_SIZE] = bytes
        .get(..HEADER_SIZE)
        .and_then(|h| h.try_into().ok())
        .ok_or(CorruptReason::TruncatedHeader(bytes.len()))?;

    let mut reader = Reader::new(header);
    let version = u32::from_le_bytes(reader.array());
    if version != STATE_VERSION {
        return Err(CorruptReason::UnknownVersion(version).into());
    }
    Ok(decode_config(&reader.array()))
}

/// Decode a state buffer for an engine configured as `expected`.
///
/// The embedded config must describe the same population shape as
/// `expected`; its hyperparameters and seed replace the live ones. Symbols
/// are checked against `expected.arity`.
///
/// # Errors
///
/// Returns [`SsnError::CorruptState`](crate::SsnError::CorruptState) if the
/// buffer fails any check. Nothing is returned partially.
pub fn decode(bytes: &[u8], expected: &Config) -> SsnResult<EngineState> {
    let embedded = read_header(bytes)?;
    let config = Config {
        arity: expected.arity,
        ..embedded
    };
    if config.validate().is_err() {
        return Err(CorruptReason::InvalidHeader.into());
    }
    if !config.same_shape(expected) {
        return Err(CorruptReason::ShapeMismatch {
            expected_population: expected.population_size,
            expected_path_length: expected.path_length,
            found_population: config.population_size,
            found_path_length: config.path_length,
        }
        .into());
    }

    let size = encoded_len(&config).ok_or(CorruptReason::InvalidHeader)?;
    if bytes.len() != size {
        return Err(CorruptReason::LengthMismatch {
            expected: size,
            actual: bytes.len(),
        }
        .into());
    }

    let mut reader = Reader::new(&bytes[HEADER_SIZE..]);
    let rng = RandomSource::from_position(u64::from_le_bytes(reader.array()))
        .ok_or(CorruptReason::ZeroRngPosition)?;

    let count = config.population_len();
    let path_length = config.path_len();
    let symbols = reader.take(count * path_length).to_vec();
    if let Some((offset, &symbol)) = symbols
        .iter()
        .enumerate()
        .find(|&(_, &s)| s >= config.arity)
    {
        return Err(CorruptReason::SymbolOutOfAlphabet {
            offset,
            symbol,
            arity: config.arity,
        }
        .into());
    }

    let energies = (0..count)
        .map(|_| f32::from_le_bytes(reader.array()))
        .collect();
    let update_count = u64::from_le_bytes(reader.array());

    Ok(EngineState {
        config,
        population: Population::from_parts(path_length, config.arity, symbols, energies, update_count),
        rng,
    })
}

/// Encoded byte count, or `None` if it overflows `usize`.
pub(crate) fn encoded_len(config: &Config) -> Option<usize> {
    let count = config.population_len();
    let path_length = config.path_len();
    count
        .checked_mul(path_length.checked_add(4)?)?
        .checked_add(HEADER_SIZE + RNG_SIZE + COUNTER_SIZE)
}

/// Forward-only reader over a buffer whose length was checked up front.
struct Reader<'a> {
    bytes: &'a [u8],
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    fn take(&mut self, n: usize) -> &'a [u8] {
        let (head, tail) = self.bytes.split_at(n.min(self.bytes.len()));
        self.bytes = tail;
        head
    }

    fn array<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        let head = self.take(N);
        out[..head.len()].copy_from_slice(head);
        out
    }
}
