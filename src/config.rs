//! Engine hyperparameters.

use serde::{Deserialize, Serialize};

use crate::error::ConfigIssue;

/// Alphabet size used when none is configured (rock, paper, scissors).
pub const DEFAULT_ARITY: u8 = 3;

/// Hyperparameters for one engine instance.
///
/// The first six fields make up the 32-byte wire header written by
/// [`codec::encode`](crate::codec::encode). `arity` is local to the process
/// and never serialized into state buffers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of candidate paths.
    pub population_size: i32,
    /// Symbols per path.
    pub path_length: i32,
    /// Selection sharpness (inverse temperature).
    pub alpha: f32,
    /// Reward learning rate.
    pub beta: f32,
    /// Energy decay rate, expected in `[0, 1]`.
    ///
    /// Values outside that range are accepted and make energies diverge.
    pub gamma: f32,
    /// RNG seed; 0 draws one from system entropy at creation.
    pub seed: u64,
    /// Number of distinct symbols a path position can take.
    pub arity: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            population_size: 100,
            path_length: 10,
            alpha: 0.5,
            beta: 0.1,
            gamma: 0.05,
            seed: 0,
            arity: DEFAULT_ARITY,
        }
    }
}

impl Config {
    /// Check sizes and hyperparameters, including that a saved state would
    /// fit a `u32` byte count.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigIssue`] found.
    pub fn validate(&self) -> Result<(), ConfigIssue> {
        if self.population_size <= 0 {
            return Err(ConfigIssue::NonPositivePopulation(self.population_size));
        }
        if self.path_length <= 0 {
            return Err(ConfigIssue::NonPositivePathLength(self.path_length));
        }
        for (name, value) in [("alpha", self.alpha), ("beta", self.beta), ("gamma", self.gamma)] {
            if !value.is_finite() {
                return Err(ConfigIssue::NonFiniteParameter { name, value });
            }
        }
        if self.arity == 0 {
            return Err(ConfigIssue::ZeroArity);
        }
        if crate::codec::encoded_len(self).is_none_or(|len| u32::try_from(len).is_err()) {
            return Err(ConfigIssue::StateTooLarge {
                population_size: self.population_size,
                path_length: self.path_length,
            });
        }
        Ok(())
    }

    /// Population size as an index bound. Zero for invalid configs.
    #[must_use]
    pub fn population_len(&self) -> usize {
        usize::try_from(self.population_size).unwrap_or(0)
    }

    /// Path length as an index bound. Zero for invalid configs.
    #[must_use]
    pub fn path_len(&self) -> usize {
        usize::try_from(self.path_length).unwrap_or(0)
    }

    /// Same population shape as `other` (size and path length).
    #[must_use]
    pub fn same_shape(&self, other: &Self) -> bool {
        self.population_size == other.population_size && self.path_length == other.path_length
    }
}
