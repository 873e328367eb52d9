//! Contextual player and the match loop.

// Step counts and win rates use intentional casts
#![allow(clippy::cast_precision_loss)]

use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::engine::Engine;
use crate::error::SsnResult;
use crate::rps::moves::{Move, Outcome};
use crate::rps::opponent::{Opponent, OpponentKind};

/// Number of contexts, one per possible previous opponent move.
pub const CONTEXTS: usize = 3;

/// Seed offset between consecutive context engines.
pub const CONTEXT_SEED_STRIDE: u64 = 1000;

/// Match parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Rounds to play.
    pub steps: u32,
    /// Config shared by the context engines; `seed` is the base seed.
    pub engine: Config,
    /// Opponent model.
    pub opponent: OpponentKind,
    /// Opponent seed; 0 draws from entropy.
    pub opponent_seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            steps: 1000,
            engine: Config {
                population_size: 100,
                alpha: 2.0,
                beta: 0.2,
                gamma: 0.1,
                ..Config::default()
            },
            opponent: OpponentKind::Biased,
            opponent_seed: 0,
        }
    }
}

/// A move chosen by the active context engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    /// Context the choice was made in.
    pub context: Move,
    /// Path id returned by `select`.
    pub path_id: u32,
    /// Move read from the path's first symbol.
    pub play: Move,
}

/// Ensemble of engines keyed by the opponent's previous move.
#[derive(Debug, Clone)]
pub struct ContextualPlayer {
    engines: Vec<Engine>,
    context: Move,
}

impl ContextualPlayer {
    /// One engine per context. A nonzero base seed gives each engine
    /// `seed + i * CONTEXT_SEED_STRIDE`; zero leaves every engine on entropy.
    ///
    /// # Errors
    ///
    /// Returns [`SsnError::Config`](crate::SsnError::Config) if `config` is invalid.
    pub fn new(config: Config) -> SsnResult<Self> {
        let engines = (0..CONTEXTS as u64)
            .map(|i| {
                let seed = if config.seed == 0 {
                    0
                } else {
                    config.seed.wrapping_add(i * CONTEXT_SEED_STRIDE)
                };
                Engine::new(Config { seed, ..config })
            })
            .collect::<SsnResult<Vec<_>>>()?;

        Ok(Self {
            engines,
            context: Move::Rock,
        })
    }

    /// Context the next choice will be made in.
    #[must_use]
    pub fn context(&self) -> Move {
        self.context
    }

    /// Engines indexed by context.
    #[must_use]
    pub fn engines(&self) -> &[Engine] {
        &self.engines
    }

    /// Mutable engines indexed by context.
    pub fn engines_mut(&mut self) -> &mut [Engine] {
        &mut self.engines
    }

    /// Ask the active engine for a move.
    ///
    /// # Errors
    ///
    /// Propagates engine errors.
    pub fn choose(&mut self) -> SsnResult<Choice> {
        let context = self.context;
        let engine = &mut self.engines[context.index()];
        let path_id = engine.select()?;
        let path = engine.get_path(path_id)?;
        let play = path.first().map_or(Move::Rock, |&s| Move::from_symbol(s));
        Ok(Choice {
            context,
            path_id,
            play,
        })
    }

    /// Reward the engine that made `choice` and move to the next context.
    ///
    /// # Errors
    ///
    /// Propagates engine errors.
    pub fn learn(&mut self, choice: Choice, opponent_move: Move, reward: f32) -> SsnResult<()> {
        self.engines[choice.context.index()].update(choice.path_id, reward)?;
        self.context = opponent_move;
        Ok(())
    }
}

/// One round of a match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepRecord {
    /// 1-based round number.
    pub step: u32,
    /// Context the player acted in.
    pub context: Move,
    /// Opponent's move.
    pub opponent_move: Move,
    /// Player's move.
    pub my_move: Move,
    /// Path id the player used.
    pub path_id: u32,
    /// Reward fed back.
    pub reward: f32,
    /// Cumulative win rate after this round.
    pub win_rate: f64,
}

/// Full record of a match.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchReport {
    /// Per-round records.
    pub records: Vec<StepRecord>,
    /// Rounds won.
    pub wins: u32,
    /// Rounds tied.
    pub ties: u32,
    /// Rounds lost.
    pub losses: u32,
}

impl MatchReport {
    /// Rounds played.
    #[must_use]
    pub fn rounds(&self) -> u32 {
        self.wins + self.ties + self.losses
    }

    /// Overall win rate (0.0-1.0).
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        match self.rounds() {
            0 => 0.0,
            n => f64::from(self.wins) / f64::from(n),
        }
    }

    /// Win rate over the last `window` rounds.
    #[must_use]
    pub fn recent_win_rate(&self, window: usize) -> f64 {
        let start = self.records.len().saturating_sub(window);
        let recent = &self.records[start..];
        if recent.is_empty() {
            return 0.0;
        }
        let wins = recent
            .iter()
            .filter(|r| Outcome::of(r.my_move, r.opponent_move) == Outcome::Win)
            .count();
        wins as f64 / recent.len() as f64
    }

    fn record(&mut self, step: u32, choice: Choice, opponent_move: Move, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Tie => self.ties += 1,
            Outcome::Loss => self.losses += 1,
        }
        let win_rate = self.win_rate();
        self.records.push(StepRecord {
            step,
            context: choice.context,
            opponent_move,
            my_move: choice.play,
            path_id: choice.path_id,
            reward: outcome.reward(),
            win_rate,
        });
    }
}

/// Play `steps` rounds of `player` against `opponent`.
///
/// # Errors
///
/// Propagates engine errors.
pub fn run_match(
    player: &mut ContextualPlayer,
    opponent: &mut dyn Opponent,
    steps: u32,
) -> SsnResult<MatchReport> {
    let mut report = MatchReport {
        records: Vec::with_capacity(steps as usize),
        ..MatchReport::default()
    };

    for step in 1..=steps {
        let choice = player.choose()?;
        let opponent_move = opponent.next_move();
        let outcome = Outcome::of(choice.play, opponent_move);
        player.learn(choice, opponent_move, outcome.reward())?;
        report.record(step, choice, opponent_move, outcome);
    }

    debug!(
        steps,
        wins = report.wins,
        ties = report.ties,
        losses = report.losses,
        "match finished"
    );
    Ok(report)
}

/// Build a player and opponent from `config` and play one match.
///
/// # Errors
///
/// Returns an error if the engine config is invalid.
pub fn play_match(config: &MatchConfig) -> SsnResult<MatchReport> {
    let mut player = ContextualPlayer::new(config.engine)?;
    let mut opponent = config.opponent.build(config.opponent_seed);
    run_match(&mut player, opponent.as_mut(), config.steps)
}

/// Write a match as CSV: `Step,Context,OpponentMove,MyMove,Reward,WinRate`.
///
/// `Context` is the context the player acted in on that row, i.e. the
/// previous row's `OpponentMove` (Rock on the first row), not the context
/// the next round will use.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_csv<W: Write>(report: &MatchReport, mut out: W) -> io::Result<()> {
    writeln!(out, "Step,Context,OpponentMove,MyMove,Reward,WinRate")?;
    for r in &report.records {
        writeln!(
            out,
            "{},{},{},{},{:.1},{:.3}",
            r.step, r.context, r.opponent_move, r.my_move, r.reward, r.win_rate
        )?;
    }
    out.flush()
}
