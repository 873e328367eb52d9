//! Output formatting utilities for CLI.

// Rates and means use intentional casts
#![allow(clippy::cast_precision_loss)]

use serde::Serialize;
use ssn::rps::{MatchReport, SweepStats};
use ssn::scenario::ScenarioReport;
use ssn::{Config, EngineState};

/// Rounds used for the "recent" win rate.
const RECENT_WINDOW: usize = 100;

/// JSON-serializable match summary.
#[derive(Debug, Serialize)]
pub(super) struct JsonMatchResult {
    /// Base engine seed.
    pub(super) seed: u64,
    /// Opponent seed.
    pub(super) opponent_seed: u64,
    /// Rounds played.
    pub(super) rounds: u32,
    /// Rounds won.
    pub(super) wins: u32,
    /// Rounds tied.
    pub(super) ties: u32,
    /// Rounds lost.
    pub(super) losses: u32,
    /// Overall win rate (0.0-1.0).
    pub(super) win_rate: f64,
    /// Win rate over the last 100 rounds.
    pub(super) recent_win_rate: f64,
}

impl JsonMatchResult {
    /// Create from a match report.
    pub(super) fn from_report(report: &MatchReport, seed: u64, opponent_seed: u64) -> Self {
        Self {
            seed,
            opponent_seed,
            rounds: report.rounds(),
            wins: report.wins,
            ties: report.ties,
            losses: report.losses,
            win_rate: report.win_rate(),
            recent_win_rate: report.recent_win_rate(RECENT_WINDOW),
        }
    }
}

/// Format a match report as human-readable text.
pub(super) fn format_match_text(report: &MatchReport, seed: u64) -> String {
    let mut output = String::new();

    output.push_str(&format!("Match Result (seed: {seed})\n"));
    output.push_str(&format!("  Rounds: {}\n", report.rounds()));
    output.push_str(&format!(
        "  Wins: {}  Ties: {}  Losses: {}\n",
        report.wins, report.ties, report.losses
    ));
    output.push_str(&format!("  Win rate: {:.1}%\n", report.win_rate() * 100.0));
    output.push_str(&format!(
        "  Last {RECENT_WINDOW} rounds: {:.1}%\n",
        report.recent_win_rate(RECENT_WINDOW) * 100.0
    ));

    output
}

/// JSON-serializable sweep result.
#[derive(Debug, Serialize)]
pub(super) struct JsonSweepResult {
    /// Matches completed.
    matches: u64,
    /// Matches that failed to start.
    failures: u64,
    /// First seed of the sweep.
    base_seed: u64,
    /// Total rounds won.
    wins: u64,
    /// Total rounds tied.
    ties: u64,
    /// Total rounds lost.
    losses: u64,
    /// Mean per-match win rate.
    mean_win_rate: f64,
    /// Standard deviation of per-match win rate.
    win_rate_std_dev: f64,
    /// Best per-match win rate.
    best_win_rate: f64,
    /// Worst per-match win rate.
    worst_win_rate: f64,
}

impl JsonSweepResult {
    /// Create from sweep stats.
    pub(super) fn from_stats(stats: &SweepStats, base_seed: u64) -> Self {
        Self {
            matches: stats.matches,
            failures: stats.failures,
            base_seed,
            wins: stats.wins,
            ties: stats.ties,
            losses: stats.losses,
            mean_win_rate: stats.mean_win_rate(),
            win_rate_std_dev: stats.win_rate_std_dev(),
            best_win_rate: stats.best_win_rate(),
            worst_win_rate: stats.worst_win_rate(),
        }
    }
}

/// Format sweep results as human-readable text.
pub(super) fn format_sweep_text(stats: &SweepStats, base_seed: u64) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Sweep Results ({} matches, base seed {base_seed})\n",
        stats.matches
    ));
    output.push_str("═══════════════════════════════════════\n\n");
    output.push_str(&format!(
        "  Win rate: {:.1}% ± {:.1}%\n",
        stats.mean_win_rate() * 100.0,
        stats.win_rate_std_dev() * 100.0
    ));
    output.push_str(&format!(
        "  Best: {:.1}%  Worst: {:.1}%\n",
        stats.best_win_rate() * 100.0,
        stats.worst_win_rate() * 100.0
    ));
    output.push_str(&format!(
        "  Rounds: {} won, {} tied, {} lost\n",
        stats.wins, stats.ties, stats.losses
    ));
    if stats.failures > 0 {
        output.push_str(&format!("  Failed matches: {}\n", stats.failures));
    }

    output
}

/// Format sweep results as CSV.
pub(super) fn format_sweep_csv(stats: &SweepStats, base_seed: u64) -> String {
    let mut output = String::new();

    output.push_str("matches,failures,base_seed,wins,ties,losses,mean_win_rate,std_dev,best,worst\n");
    output.push_str(&format!(
        "{},{},{},{},{},{},{:.4},{:.4},{:.4},{:.4}\n",
        stats.matches,
        stats.failures,
        base_seed,
        stats.wins,
        stats.ties,
        stats.losses,
        stats.mean_win_rate(),
        stats.win_rate_std_dev(),
        stats.best_win_rate(),
        stats.worst_win_rate()
    ));

    output
}

/// Format a scenario report as human-readable text.
pub(super) fn format_scenario_text(report: &ScenarioReport, target: u8) -> String {
    let mut output = String::new();

    output.push_str(&format!("Target Scenario (symbol {target})\n"));
    output.push_str(&format!(
        "  Hits: {}/{} cycles\n",
        report.total_hits, report.cycles
    ));
    output.push_str(&format!(
        "  Final {} cycles: {:.1}%\n",
        report.window,
        report.window_share() * 100.0
    ));
    match report.last_miss {
        Some(cycle) => output.push_str(&format!("  Last miss: cycle {cycle}\n")),
        None => output.push_str("  Last miss: never\n"),
    }

    output
}

/// JSON-serializable path entry.
#[derive(Debug, Serialize)]
pub(super) struct JsonPath {
    /// Path id.
    id: usize,
    /// Symbols.
    symbols: Vec<u8>,
    /// Energy.
    energy: f32,
}

/// JSON-serializable state summary.
#[derive(Debug, Serialize)]
pub(super) struct JsonStateSummary {
    /// Size of the state buffer in bytes.
    bytes: usize,
    /// Embedded config.
    config: Config,
    /// Updates applied so far.
    update_count: u64,
    /// Generator position.
    rng_position: u64,
    /// Mean energy.
    mean_energy: f64,
    /// Strongest path id.
    strongest: Option<usize>,
    /// Weakest path id.
    weakest: Option<usize>,
    /// Every path, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    paths: Option<Vec<JsonPath>>,
}

impl JsonStateSummary {
    /// Create from a decoded state.
    pub(super) fn from_state(state: &EngineState, bytes: usize, with_paths: bool) -> Self {
        let population = state.population();
        let paths = with_paths.then(|| {
            population
                .symbols()
                .chunks(population.path_length())
                .zip(population.energies())
                .enumerate()
                .map(|(id, (symbols, &energy))| JsonPath {
                    id,
                    symbols: symbols.to_vec(),
                    energy,
                })
                .collect()
        });

        Self {
            bytes,
            config: *state.config(),
            update_count: population.update_count(),
            rng_position: state.rng_position(),
            mean_energy: mean_energy(population.energies()),
            strongest: population.strongest(),
            weakest: population.weakest(),
            paths,
        }
    }
}

fn mean_energy(energies: &[f32]) -> f64 {
    if energies.is_empty() {
        return 0.0;
    }
    energies.iter().map(|&e| f64::from(e)).sum::<f64>() / energies.len() as f64
}

/// Format a decoded state as human-readable text.
pub(super) fn format_state_text(state: &EngineState, bytes: usize, with_paths: bool) -> String {
    let config = state.config();
    let population = state.population();
    let mut output = String::new();

    output.push_str(&format!("SSN State ({bytes} bytes)\n"));
    output.push_str(&format!(
        "  Population: {} paths x {} symbols (arity {})\n",
        config.population_size, config.path_length, config.arity
    ));
    output.push_str(&format!(
        "  alpha: {}  beta: {}  gamma: {}  seed: {}\n",
        config.alpha, config.beta, config.gamma, config.seed
    ));
    output.push_str(&format!("  Updates: {}\n", population.update_count()));
    output.push_str(&format!(
        "  Mean energy: {:.4}\n",
        mean_energy(population.energies())
    ));
    if let (Some(best), Some(worst)) = (population.strongest(), population.weakest()) {
        let energies = population.energies();
        output.push_str(&format!(
            "  Strongest: #{best} ({:.4})  Weakest: #{worst} ({:.4})\n",
            energies[best], energies[worst]
        ));
    }

    if with_paths {
        output.push('\n');
        for (id, (symbols, energy)) in population
            .symbols()
            .chunks(population.path_length())
            .zip(population.energies())
            .enumerate()
        {
            output.push_str(&format!("  {id:>5}  {energy:>10.4}  {symbols:?}\n"));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssn::Engine;

    #[test]
    fn test_state_summary_paths() {
        let mut engine = Engine::new(Config {
            population_size: 4,
            path_length: 2,
            seed: 3,
            ..Config::default()
        })
        .unwrap();
        engine.update(1, 1.0).unwrap();

        let state = engine.state().unwrap();
        let summary = JsonStateSummary::from_state(state, 60, true);
        assert_eq!(summary.strongest, Some(1));
        assert_eq!(summary.paths.as_ref().map(Vec::len), Some(4));

        let text = format_state_text(state, 60, true);
        assert!(text.contains("4 paths x 2 symbols"));
        assert!(text.contains("Strongest: #1"));
    }

    #[test]
    fn test_sweep_csv_shape() {
        let csv = format_sweep_csv(&SweepStats::default(), 5);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0].split(',').count(),
            lines[1].split(',').count()
        );
    }
}
