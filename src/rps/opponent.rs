//! Synthetic opponents.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::rng::RandomSource;
use crate::rps::moves::Move;

/// Steps between bias switches for [`BiasedOpponent`].
pub const SWITCH_PERIOD: u32 = 300;

/// Probability that [`BiasedOpponent`] plays its current bias.
pub const BIAS_PROBABILITY: f64 = 0.9;

/// A move generator the player competes against.
pub trait Opponent {
    /// Produce the next move.
    fn next_move(&mut self) -> Move;
}

/// Which opponent a match uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpponentKind {
    /// Mostly plays one move, rotating the favourite periodically.
    Biased,
    /// Uniformly random moves.
    Uniform,
}

impl OpponentKind {
    /// Build the opponent; seed 0 draws from entropy.
    #[must_use]
    pub fn build(self, seed: u64) -> Box<dyn Opponent + Send> {
        match self {
            Self::Biased => Box::new(BiasedOpponent::new(seed)),
            Self::Uniform => Box::new(UniformOpponent::new(seed)),
        }
    }
}

/// Plays a bias move with high probability; the bias cycles
/// Rock, Paper, Scissors every switch period.
#[derive(Debug, Clone, Copy)]
pub struct BiasedOpponent {
    rng: RandomSource,
    step: u32,
    bias: Move,
    switch_period: u32,
    bias_probability: f64,
}

impl BiasedOpponent {
    /// Default schedule: bias Rock, switch every [`SWITCH_PERIOD`] steps.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_schedule(seed, SWITCH_PERIOD, BIAS_PROBABILITY)
    }

    /// Custom switch period and bias probability.
    #[must_use]
    pub fn with_schedule(seed: u64, switch_period: u32, bias_probability: f64) -> Self {
        Self {
            rng: RandomSource::from_config_seed(seed),
            step: 0,
            bias: Move::Rock,
            switch_period: switch_period.max(1),
            bias_probability: bias_probability.clamp(0.0, 1.0),
        }
    }

    /// Current favourite move.
    #[must_use]
    pub fn bias(&self) -> Move {
        self.bias
    }
}

impl Opponent for BiasedOpponent {
    fn next_move(&mut self) -> Move {
        self.step += 1;
        if self.step % self.switch_period == 0 {
            self.bias = self.bias.next();
        }
        if self.rng.random_bool(self.bias_probability) {
            self.bias
        } else {
            Move::random(&mut self.rng)
        }
    }
}

/// Uniform noise.
#[derive(Debug, Clone, Copy)]
pub struct UniformOpponent {
    rng: RandomSource,
}

impl UniformOpponent {
    /// Seed 0 draws from entropy.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: RandomSource::from_config_seed(seed),
        }
    }
}

impl Opponent for UniformOpponent {
    fn next_move(&mut self) -> Move {
        Move::random(&mut self.rng)
    }
}
