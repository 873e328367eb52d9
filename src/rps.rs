//! Rock-paper-scissors experiment harness.
//!
//! Drives engines against synthetic opponents:
//! - One engine per context (the opponent's previous move)
//! - Opponents with a drifting bias or pure noise
//! - Per-step records with CSV export
//! - Parallel sweeps over many seeds

mod arena;
mod moves;
mod opponent;
mod sweep;

pub use arena::{
    play_match, run_match, write_csv, Choice, ContextualPlayer, MatchConfig, MatchReport,
    StepRecord, CONTEXTS, CONTEXT_SEED_STRIDE,
};
pub use moves::{Move, Outcome, LOSS_REWARD, TIE_REWARD, WIN_REWARD};
pub use opponent::{
    BiasedOpponent, Opponent, OpponentKind, UniformOpponent, BIAS_PROBABILITY, SWITCH_PERIOD,
};
pub use sweep::{run_sweep, SweepStats};
