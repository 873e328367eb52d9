//! Deterministic random source.
//!
//! Every stochastic step in the engine (initial paths, selection draws,
//! mutation) pulls from one [`RandomSource`]. Its whole position is a single
//! non-zero `u64`, so state buffers can capture and resume it exactly.

// RNG output narrowing is intentional
#![allow(clippy::cast_possible_truncation)]

use rand::{RngCore, SeedableRng};

/// Substitute state for the one value xorshift cannot leave.
const ZERO_GUARD: u64 = 0x5555_5555_5555_5555;

/// Seeded xorshift64 generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomSource {
    state: u64,
}

impl RandomSource {
    /// Create a generator from a seed.
    ///
    /// The seed is scrambled with splitmix64 so small seeds do not produce
    /// a run of near-zero outputs.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let state = splitmix64(seed);
        Self {
            state: if state == 0 { ZERO_GUARD } else { state },
        }
    }

    /// Create a generator from a config seed: 0 means draw from system entropy.
    #[must_use]
    pub fn from_config_seed(seed: u64) -> Self {
        if seed == 0 {
            Self::new(rand::random::<u64>())
        } else {
            Self::new(seed)
        }
    }

    /// Resume a generator at a saved position.
    ///
    /// Returns `None` for position 0, which no generator ever occupies.
    #[must_use]
    pub fn from_position(position: u64) -> Option<Self> {
        (position != 0).then_some(Self { state: position })
    }

    /// Current position, suitable for [`RandomSource::from_position`].
    #[must_use]
    pub fn position(&self) -> u64 {
        self.state
    }
}

impl RngCore for RandomSource {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let word = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }
}

impl SeedableRng for RandomSource {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}

fn splitmix64(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
