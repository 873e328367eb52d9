//! Engine lifecycle: create, select, update, get-path, save, load, destroy.
//!
//! An [`Engine`] owns its [`EngineState`] outright. Operations take
//! `&mut self`, so sharing one engine across threads requires a caller-owned
//! lock; independent engines share nothing.

use tracing::{debug, warn};

use crate::codec;
use crate::config::Config;
use crate::error::{SsnError, SsnResult};
use crate::policy;
use crate::population::Population;
use crate::rng::RandomSource;

/// Complete reproducible state of one engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineState {
    pub(crate) config: Config,
    pub(crate) population: Population,
    pub(crate) rng: RandomSource,
}

impl EngineState {
    /// Build fresh state from a validated config.
    fn initialize(config: Config) -> Self {
        let mut rng = RandomSource::from_config_seed(config.seed);
        let population = Population::initialize(&config, &mut rng);
        Self {
            config,
            population,
            rng,
        }
    }

    /// Hyperparameters in effect.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Paths and energies.
    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Resumable generator position.
    #[must_use]
    pub fn rng_position(&self) -> u64 {
        self.rng.position()
    }
}

/// Structural selection engine.
#[derive(Debug, Clone)]
pub struct Engine {
    state: Option<EngineState>,
}

impl Engine {
    /// Create an engine.
    ///
    /// # Errors
    ///
    /// Returns [`SsnError::Config`] if `config` fails validation.
    pub fn new(config: Config) -> SsnResult<Self> {
        config.validate()?;
        debug!(
            population_size = config.population_size,
            path_length = config.path_length,
            seeded = config.seed != 0,
            "creating engine"
        );
        Ok(Self {
            state: Some(EngineState::initialize(config)),
        })
    }

    /// Create an engine directly from a saved state buffer.
    ///
    /// The buffer's own header supplies the population shape and
    /// hyperparameters; `arity` bounds the symbol check.
    ///
    /// # Errors
    ///
    /// Returns [`SsnError::CorruptState`] if the buffer does not decode.
    pub fn restore(bytes: &[u8], arity: u8) -> SsnResult<Self> {
        let header = Config {
            arity,
            ..codec::read_header(bytes)?
        };
        let state = codec::decode(bytes, &header)?;
        Ok(Self { state: Some(state) })
    }

    /// Sample a path id in `[0, population_size)`.
    ///
    /// # Errors
    ///
    /// Returns [`SsnError::InvalidHandle`] after [`Engine::destroy`].
    pub fn select(&mut self) -> SsnResult<u32> {
        let state = self.state_mut()?;
        Ok(policy::select(&state.population, state.config.alpha, &mut state.rng))
    }

    /// Feed back the reward earned by path `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SsnError::OutOfRange`], [`SsnError::InvalidReward`] or
    /// [`SsnError::InvalidHandle`]; state is unchanged on error.
    pub fn update(&mut self, id: u32, reward: f32) -> SsnResult<()> {
        let state = self.state_mut()?;
        let Config { beta, gamma, .. } = state.config;
        policy::apply_reward(&mut state.population, id, reward, beta, gamma, &mut state.rng)?;
        Ok(())
    }

    /// Symbols of path `id`; always `path_length` long.
    ///
    /// # Errors
    ///
    /// Returns [`SsnError::OutOfRange`] or [`SsnError::InvalidHandle`].
    pub fn get_path(&self, id: u32) -> SsnResult<&[u8]> {
        self.state()?.population.get(id)
    }

    /// Energy of path `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SsnError::OutOfRange`] or [`SsnError::InvalidHandle`].
    pub fn energy(&self, id: u32) -> SsnResult<f32> {
        self.state()?.population.energy_of(id)
    }

    /// Size in bytes of the buffer [`Engine::save`] produces.
    ///
    /// # Errors
    ///
    /// Returns [`SsnError::InvalidHandle`] after [`Engine::destroy`].
    pub fn state_size(&self) -> SsnResult<u32> {
        codec::state_size(&self.state()?.config)
    }

    /// Serialize the full state.
    ///
    /// # Errors
    ///
    /// Returns [`SsnError::InvalidHandle`] after [`Engine::destroy`].
    pub fn save(&self) -> SsnResult<Vec<u8>> {
        let state = self.state()?;
        let bytes = codec::encode(state);
        debug!(
            bytes = bytes.len(),
            update_count = state.population.update_count(),
            "saved engine state"
        );
        Ok(bytes)
    }

    /// Replace the full state with a saved buffer.
    ///
    /// The buffer is decoded completely before anything is swapped in, so a
    /// rejected buffer leaves the engine exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`SsnError::CorruptState`] or [`SsnError::InvalidHandle`].
    pub fn load(&mut self, bytes: &[u8]) -> SsnResult<()> {
        let expected = self.state()?.config;
        match codec::decode(bytes, &expected) {
            Ok(decoded) => {
                debug!(
                    bytes = bytes.len(),
                    update_count = decoded.population.update_count(),
                    "loaded engine state"
                );
                self.state = Some(decoded);
                Ok(())
            }
            Err(e) => {
                warn!(bytes = bytes.len(), error = %e, "rejected state buffer");
                Err(e)
            }
        }
    }

    /// Release all state. Idempotent; later operations fail with
    /// [`SsnError::InvalidHandle`].
    pub fn destroy(&mut self) {
        if self.state.take().is_some() {
            debug!("engine destroyed");
        }
    }

    /// True once [`Engine::destroy`] has been called.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.state.is_none()
    }

    /// Full state, for inspection.
    ///
    /// # Errors
    ///
    /// Returns [`SsnError::InvalidHandle`] after [`Engine::destroy`].
    pub fn state(&self) -> SsnResult<&EngineState> {
        self.state.as_ref().ok_or(SsnError::InvalidHandle)
    }

    /// Hyperparameters in effect.
    ///
    /// # Errors
    ///
    /// Returns [`SsnError::InvalidHandle`] after [`Engine::destroy`].
    pub fn config(&self) -> SsnResult<&Config> {
        Ok(&self.state()?.config)
    }

    /// Paths and energies.
    ///
    /// # Errors
    ///
    /// Returns [`SsnError::InvalidHandle`] after [`Engine::destroy`].
    pub fn population(&self) -> SsnResult<&Population> {
        Ok(&self.state()?.population)
    }

    fn state_mut(&mut self) -> SsnResult<&mut EngineState> {
        self.state.as_mut().ok_or(SsnError::InvalidHandle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigIssue;

    fn seeded(seed: u64) -> Config {
        Config {
            population_size: 8,
            path_length: 4,
            alpha: 2.0,
            beta: 0.2,
            gamma: 0.1,
            seed,
            ..Config::default()
        }
    }

    #[test]
    fn test_lifecycle() {
        let mut engine = Engine::new(Config::default()).unwrap();
        let id = engine.select().unwrap();
        assert!(id < 100);
        assert_eq!(engine.get_path(id).unwrap().len(), 10);
        engine.update(id, 1.0).unwrap();
        assert_eq!(engine.population().unwrap().update_count(), 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = Config {
            population_size: 0,
            ..Config::default()
        };
        assert!(matches!(Engine::new(config), Err(SsnError::Config(_))));
    }

    #[test]
    fn test_unsaveable_config_rejected_at_creation() {
        let config = Config {
            population_size: i32::MAX,
            path_length: i32::MAX,
            ..Config::default()
        };
        assert!(matches!(
            Engine::new(config),
            Err(SsnError::Config(ConfigIssue::StateTooLarge { .. }))
        ));
    }

    #[test]
    fn test_destroy_is_terminal_and_idempotent() {
        let mut engine = Engine::new(seeded(1)).unwrap();
        engine.destroy();
        engine.destroy();

        assert!(engine.is_destroyed());
        assert_eq!(engine.select(), Err(SsnError::InvalidHandle));
        assert_eq!(engine.update(0, 1.0), Err(SsnError::InvalidHandle));
        assert_eq!(engine.get_path(0), Err(SsnError::InvalidHandle));
        assert_eq!(engine.save(), Err(SsnError::InvalidHandle));
        assert_eq!(engine.load(&[0u8; 8]), Err(SsnError::InvalidHandle));
        assert_eq!(engine.state_size(), Err(SsnError::InvalidHandle));
    }

    #[test]
    fn test_failed_load_keeps_state() {
        let mut engine = Engine::new(seeded(5)).unwrap();
        for _ in 0..20 {
            let id = engine.select().unwrap();
            engine.update(id, 0.5).unwrap();
        }
        let before = engine.state().unwrap().clone();
        let mut bytes = engine.save().unwrap();
        bytes.pop();

        assert!(matches!(engine.load(&bytes), Err(SsnError::CorruptState(_))));
        assert_eq!(engine.state().unwrap(), &before);
    }

    #[test]
    fn test_restore_matches_original() {
        let mut engine = Engine::new(seeded(9)).unwrap();
        for i in 0..30 {
            let id = engine.select().unwrap();
            engine.update(id, if i % 2 == 0 { 1.0 } else { -0.5 }).unwrap();
        }
        let bytes = engine.save().unwrap();
        let mut restored = Engine::restore(&bytes, 3).unwrap();

        for _ in 0..50 {
            assert_eq!(engine.select().unwrap(), restored.select().unwrap());
        }
    }
}
