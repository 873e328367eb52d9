//! Moves, outcomes and rewards.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Reward for a win.
pub const WIN_REWARD: f32 = 1.0;
/// Reward for a tie.
pub const TIE_REWARD: f32 = 0.0;
/// Reward for a loss.
pub const LOSS_REWARD: f32 = -0.5;

/// A rock-paper-scissors move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Beats scissors.
    Rock,
    /// Beats rock.
    Paper,
    /// Beats paper.
    Scissors,
}

impl Move {
    /// All moves in index order.
    pub const ALL: [Self; 3] = [Self::Rock, Self::Paper, Self::Scissors];

    /// Map a path symbol to a move (`symbol % 3`).
    #[must_use]
    pub fn from_symbol(symbol: u8) -> Self {
        match symbol % 3 {
            0 => Self::Rock,
            1 => Self::Paper,
            _ => Self::Scissors,
        }
    }

    /// Dense index in `0..3`.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Rock => 0,
            Self::Paper => 1,
            Self::Scissors => 2,
        }
    }

    /// The move this one beats.
    #[must_use]
    pub fn beats(self) -> Self {
        match self {
            Self::Rock => Self::Scissors,
            Self::Paper => Self::Rock,
            Self::Scissors => Self::Paper,
        }
    }

    /// Next move in the Rock, Paper, Scissors cycle.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Rock => Self::Paper,
            Self::Paper => Self::Scissors,
            Self::Scissors => Self::Rock,
        }
    }

    /// Uniformly random move.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Rock => "Rock",
            Self::Paper => "Paper",
            Self::Scissors => "Scissors",
        };
        f.write_str(name)
    }
}

/// Result of one round from the player's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Player's move beat the opponent's.
    Win,
    /// Same move.
    Tie,
    /// Opponent's move beat the player's.
    Loss,
}

impl Outcome {
    /// Score `mine` against `theirs`.
    #[must_use]
    pub fn of(mine: Move, theirs: Move) -> Self {
        if mine == theirs {
            Self::Tie
        } else if mine.beats() == theirs {
            Self::Win
        } else {
            Self::Loss
        }
    }

    /// Reward fed back to the engine.
    #[must_use]
    pub fn reward(self) -> f32 {
        match self {
            Self::Win => WIN_REWARD,
            Self::Tie => TIE_REWARD,
            Self::Loss => LOSS_REWARD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_mapping() {
        assert_eq!(Move::from_symbol(0), Move::Rock);
        assert_eq!(Move::from_symbol(1), Move::Paper);
        assert_eq!(Move::from_symbol(2), Move::Scissors);
        assert_eq!(Move::from_symbol(5), Move::Scissors);
    }

    #[test]
    fn test_outcomes() {
        assert_eq!(Outcome::of(Move::Rock, Move::Scissors), Outcome::Win);
        assert_eq!(Outcome::of(Move::Paper, Move::Rock), Outcome::Win);
        assert_eq!(Outcome::of(Move::Scissors, Move::Paper), Outcome::Win);
        assert_eq!(Outcome::of(Move::Rock, Move::Paper), Outcome::Loss);
        assert_eq!(Outcome::of(Move::Paper, Move::Paper), Outcome::Tie);
    }

    #[test]
    fn test_rewards() {
        assert!((Outcome::Win.reward() - 1.0).abs() < f32::EPSILON);
        assert!(Outcome::Tie.reward().abs() < f32::EPSILON);
        assert!((Outcome::Loss.reward() + 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_cycle_and_index() {
        for m in Move::ALL {
            assert_eq!(Move::ALL[m.index()], m);
            assert_eq!(m.next().next().next(), m);
        }
        assert_eq!(Move::Scissors.to_string(), "Scissors");
    }
}
