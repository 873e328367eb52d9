#![no_main]

//! Engine operation sequence fuzzer.
//!
//! Runs arbitrary select/update/get-path/save/load/destroy sequences and
//! checks that ids stay in range and energies stay finite while the decay
//! is in `[0, 1]`.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use ssn::{Config, Engine, SsnError};

/// A fuzzer-generated engine call.
#[derive(Arbitrary, Debug, Clone)]
enum Op {
    /// Select a path.
    Select,
    /// Reward a path id, possibly out of range.
    Update { id: u16, reward: f32 },
    /// Read a path.
    GetPath { id: u16 },
    /// Snapshot the state.
    Save,
    /// Restore the most recent snapshot.
    Load,
    /// Release the engine.
    Destroy,
}

/// Structured input for operation fuzzing.
#[derive(Arbitrary, Debug)]
struct OpsInput {
    population_size: u8,
    path_length: u8,
    alpha: i8,
    beta: u8,
    gamma: u8,
    seed: u64,
    ops: Vec<Op>,
}

fuzz_target!(|input: OpsInput| {
    let config = Config {
        population_size: i32::from(input.population_size % 32) + 1,
        path_length: i32::from(input.path_length % 16) + 1,
        alpha: f32::from(input.alpha) / 16.0,
        beta: f32::from(input.beta) / 255.0,
        gamma: f32::from(input.gamma) / 255.0,
        seed: input.seed,
        ..Config::default()
    };
    let Ok(mut engine) = Engine::new(config) else {
        return;
    };
    let size = config.population_size as u32;
    let mut snapshot: Option<Vec<u8>> = None;

    for op in input.ops.into_iter().take(500) {
        match op {
            Op::Select => match engine.select() {
                Ok(id) => assert!(id < size),
                Err(e) => assert_eq!(e, SsnError::InvalidHandle),
            },
            Op::Update { id, reward } => {
                let id = u32::from(id);
                let result = engine.update(id, reward.clamp(-1e6, 1e6));
                if engine.is_destroyed() {
                    assert_eq!(result, Err(SsnError::InvalidHandle));
                } else if id >= size {
                    assert!(matches!(result, Err(SsnError::OutOfRange { .. })));
                } else if reward.is_nan() {
                    assert!(matches!(result, Err(SsnError::InvalidReward(_))));
                } else {
                    assert!(result.is_ok());
                }
            }
            Op::GetPath { id } => {
                if let Ok(path) = engine.get_path(u32::from(id)) {
                    assert_eq!(path.len(), config.path_length as usize);
                    assert!(path.iter().all(|&s| s < config.arity));
                }
            }
            Op::Save => {
                if let Ok(bytes) = engine.save() {
                    snapshot = Some(bytes);
                }
            }
            Op::Load => {
                if let Some(bytes) = &snapshot {
                    if !engine.is_destroyed() {
                        assert!(engine.load(bytes).is_ok());
                    }
                }
            }
            Op::Destroy => engine.destroy(),
        }

        if let Ok(population) = engine.population() {
            assert!(population.energies().iter().all(|e| e.is_finite()));
        }
    }
});
