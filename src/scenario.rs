//! Single-target learning scenario.
//!
//! Each cycle selects a path, rewards it `hit_reward` if its first symbol is
//! the target and `miss_reward` otherwise, and records whether it hit.
//! Useful as a smoke test for a set of hyperparameters.

// Window shares use intentional casts
#![allow(clippy::cast_precision_loss)]

use serde::Serialize;

use crate::config::Config;
use crate::engine::Engine;
use crate::error::SsnResult;

/// Scenario parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetScenario {
    /// Engine under test.
    pub engine: Config,
    /// Select/update cycles to run.
    pub cycles: u32,
    /// Trailing cycles the share is measured over.
    pub window: u32,
    /// Symbol that earns the hit reward.
    pub target: u8,
    /// Reward when the selected path starts with `target`.
    pub hit_reward: f32,
    /// Reward otherwise.
    pub miss_reward: f32,
}

impl Default for TargetScenario {
    fn default() -> Self {
        Self {
            engine: Config {
                population_size: 3,
                path_length: 1,
                alpha: 2.0,
                beta: 0.2,
                gamma: 0.1,
                seed: 42,
                ..Config::default()
            },
            cycles: 1000,
            window: 200,
            target: 0,
            hit_reward: 1.0,
            miss_reward: -0.5,
        }
    }
}

/// Outcome of a scenario run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioReport {
    /// Cycles run.
    pub cycles: u32,
    /// Window length actually measured.
    pub window: u32,
    /// Hits inside the window.
    pub window_hits: u32,
    /// Hits over the whole run.
    pub total_hits: u32,
    /// Cycle at which the last miss occurred, if any.
    pub last_miss: Option<u32>,
}

impl ScenarioReport {
    /// Fraction of window cycles that hit the target.
    #[must_use]
    pub fn window_share(&self) -> f64 {
        if self.window == 0 {
            return 0.0;
        }
        f64::from(self.window_hits) / f64::from(self.window)
    }
}

impl TargetScenario {
    /// Run the scenario on a fresh engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine config is invalid.
    pub fn run(&self) -> SsnResult<ScenarioReport> {
        let mut engine = Engine::new(self.engine)?;
        self.run_on(&mut engine)
    }

    /// Run the scenario on an existing engine.
    ///
    /// # Errors
    ///
    /// Propagates engine errors.
    pub fn run_on(&self, engine: &mut Engine) -> SsnResult<ScenarioReport> {
        let window = self.window.min(self.cycles);
        let window_start = self.cycles - window;
        let mut report = ScenarioReport {
            cycles: self.cycles,
            window,
            window_hits: 0,
            total_hits: 0,
            last_miss: None,
        };

        for cycle in 0..self.cycles {
            let id = engine.select()?;
            let hit = engine.get_path(id)?.first() == Some(&self.target);
            engine.update(id, if hit { self.hit_reward } else { self.miss_reward })?;

            if hit {
                report.total_hits += 1;
                if cycle >= window_start {
                    report.window_hits += 1;
                }
            } else {
                report.last_miss = Some(cycle + 1);
            }
        }

        Ok(report)
    }
}

/// Run [`TargetScenario::default`].
///
/// # Errors
///
/// Propagates engine errors.
pub fn run_target_scenario() -> SsnResult<ScenarioReport> {
    TargetScenario::default().run()
}
