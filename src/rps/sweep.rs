//! Parallel match sweeps over consecutive seeds.

// Sweep statistics use intentional casts
#![allow(clippy::cast_precision_loss)]

use rayon::prelude::*;
use tracing::warn;

use crate::config::Config;
use crate::rps::arena::{play_match, MatchConfig, MatchReport};

/// Aggregated results of many matches.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SweepStats {
    /// Matches that completed.
    pub matches: u64,
    /// Matches that failed to start.
    pub failures: u64,
    /// Total rounds won.
    pub wins: u64,
    /// Total rounds tied.
    pub ties: u64,
    /// Total rounds lost.
    pub losses: u64,
    win_rate_sum: f64,
    win_rate_sq_sum: f64,
    best_win_rate: f64,
    worst_win_rate: f64,
}

impl SweepStats {
    /// Fold one match into the totals.
    pub fn add_report(&mut self, report: &MatchReport) {
        let rate = report.win_rate();
        if self.matches == 0 {
            self.best_win_rate = rate;
            self.worst_win_rate = rate;
        } else {
            self.best_win_rate = self.best_win_rate.max(rate);
            self.worst_win_rate = self.worst_win_rate.min(rate);
        }
        self.matches += 1;
        self.wins += u64::from(report.wins);
        self.ties += u64::from(report.ties);
        self.losses += u64::from(report.losses);
        self.win_rate_sum += rate;
        self.win_rate_sq_sum += rate * rate;
    }

    /// Combine two partial aggregates.
    pub fn merge(&mut self, other: &Self) {
        if other.matches > 0 {
            if self.matches == 0 {
                self.best_win_rate = other.best_win_rate;
                self.worst_win_rate = other.worst_win_rate;
            } else {
                self.best_win_rate = self.best_win_rate.max(other.best_win_rate);
                self.worst_win_rate = self.worst_win_rate.min(other.worst_win_rate);
            }
        }
        self.matches += other.matches;
        self.failures += other.failures;
        self.wins += other.wins;
        self.ties += other.ties;
        self.losses += other.losses;
        self.win_rate_sum += other.win_rate_sum;
        self.win_rate_sq_sum += other.win_rate_sq_sum;
    }

    /// Mean per-match win rate.
    #[must_use]
    pub fn mean_win_rate(&self) -> f64 {
        if self.matches == 0 {
            return 0.0;
        }
        self.win_rate_sum / self.matches as f64
    }

    /// Standard deviation of per-match win rate.
    #[must_use]
    pub fn win_rate_std_dev(&self) -> f64 {
        if self.matches == 0 {
            return 0.0;
        }
        let mean = self.mean_win_rate();
        let variance = self.win_rate_sq_sum / self.matches as f64 - mean * mean;
        if variance < 0.0 { 0.0 } else { variance.sqrt() }
    }

    /// Best single-match win rate.
    #[must_use]
    pub fn best_win_rate(&self) -> f64 {
        self.best_win_rate
    }

    /// Worst single-match win rate.
    #[must_use]
    pub fn worst_win_rate(&self) -> f64 {
        self.worst_win_rate
    }
}

/// Seed for match `index` of a sweep starting at `base`; never 0.
fn match_seed(base: u64, index: u64) -> u64 {
    match base.wrapping_add(index) {
        0 => 1,
        s => s,
    }
}

/// Play `matches` independent matches in parallel.
///
/// Match `i` seeds its engines with `base_seed + i` and its opponent with
/// the same value mixed, so the sweep is reproducible. `on_match` runs after
/// each completed match, from whichever worker thread finished it.
pub fn run_sweep<F>(config: &MatchConfig, matches: u64, base_seed: u64, on_match: F) -> SweepStats
where
    F: Fn(&MatchReport) + Sync,
{
    (0..matches)
        .into_par_iter()
        .fold(SweepStats::default, |mut local, i| {
            let seed = match_seed(base_seed, i);
            let match_config = MatchConfig {
                engine: Config {
                    seed,
                    ..config.engine
                },
                opponent_seed: match_seed(seed ^ 0x9E37_79B9_7F4A_7C15, 0),
                ..*config
            };
            match play_match(&match_config) {
                Ok(report) => {
                    on_match(&report);
                    local.add_report(&report);
                }
                Err(e) => {
                    warn!(seed, error = %e, "match failed");
                    local.failures += 1;
                }
            }
            local
        })
        .reduce(SweepStats::default, |mut a, b| {
            a.merge(&b);
            a
        })
}
