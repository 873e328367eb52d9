//! End-to-end engine lifecycle tests.
//!
//! These tests drive engines through create, select/update, save/load and
//! destroy, and check that learning moves selection toward rewarded paths.
//!
//! Run with: cargo test --release engine_lifecycle

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::cast_precision_loss)]

use ssn::codec::{read_header, STATE_VERSION};
use ssn::persistence::{load_state_file, restore_state_file, save_state_file};
use ssn::scenario::{run_target_scenario, TargetScenario};
use ssn::{state_size, Config, ConfigIssue, CorruptReason, Engine, SsnError};

fn seeded(population_size: i32, path_length: i32, seed: u64) -> Config {
    Config {
        population_size,
        path_length,
        alpha: 2.0,
        beta: 0.2,
        gamma: 0.1,
        seed,
        ..Config::default()
    }
}

/// Drive `cycles` rounds rewarding paths whose first symbol is `target`.
fn train(engine: &mut Engine, cycles: usize, target: u8) {
    for _ in 0..cycles {
        let id = engine.select().unwrap();
        let hit = engine.get_path(id).unwrap()[0] == target;
        engine.update(id, if hit { 1.0 } else { -0.5 }).unwrap();
    }
}

#[test]
fn test_state_size_layout() {
    let config = seeded(5, 3, 1);
    assert_eq!(state_size(&config).unwrap(), 87);

    let engine = Engine::new(config).unwrap();
    let bytes = engine.save().unwrap();
    assert_eq!(bytes.len(), 87);
    assert_eq!(u32::from_le_bytes(bytes[..4].try_into().unwrap()), STATE_VERSION);
    assert_eq!(i32::from_le_bytes(bytes[4..8].try_into().unwrap()), 5);
    assert_eq!(i32::from_le_bytes(bytes[8..12].try_into().unwrap()), 3);
    // header padding
    assert_eq!(&bytes[24..28], &[0, 0, 0, 0]);
}

#[test]
fn test_default_config_size() {
    assert_eq!(state_size(&Config::default()).unwrap(), 52 + 100 * 14);
}

#[test]
fn test_invalid_configs_rejected() {
    let bad = [
        Config {
            population_size: 0,
            ..Config::default()
        },
        Config {
            path_length: -1,
            ..Config::default()
        },
        Config {
            alpha: f32::NAN,
            ..Config::default()
        },
        Config {
            gamma: f32::INFINITY,
            ..Config::default()
        },
    ];
    for config in bad {
        assert!(matches!(Engine::new(config), Err(SsnError::Config(_))));
        assert!(matches!(state_size(&config), Err(SsnError::Config(_))));
    }

    assert_eq!(
        Engine::new(Config {
            beta: f32::NEG_INFINITY,
            ..Config::default()
        })
        .unwrap_err(),
        SsnError::Config(ConfigIssue::NonFiniteParameter {
            name: "beta",
            value: f32::NEG_INFINITY,
        })
    );
}

#[test]
fn test_round_trip_into_same_engine() {
    let mut engine = Engine::new(seeded(6, 4, 11)).unwrap();
    train(&mut engine, 40, 0);

    let saved = engine.save().unwrap();
    let expected: Vec<u32> = {
        let mut probe = engine.clone();
        (0..20).map(|_| probe.select().unwrap()).collect()
    };

    train(&mut engine, 25, 1);
    engine.load(&saved).unwrap();
    assert_eq!(engine.save().unwrap(), saved);

    let replay: Vec<u32> = (0..20).map(|_| engine.select().unwrap()).collect();
    assert_eq!(replay, expected);
}

#[test]
fn test_round_trip_into_fresh_engine() {
    let mut a = Engine::new(seeded(8, 3, 5)).unwrap();
    train(&mut a, 100, 2);
    let saved = a.save().unwrap();

    // Different hyperparameters and seed, same shape.
    let mut b = Engine::new(Config {
        alpha: 0.1,
        seed: 999,
        ..seeded(8, 3, 5)
    })
    .unwrap();
    b.load(&saved).unwrap();

    assert_eq!(b.config().unwrap(), a.config().unwrap());
    for _ in 0..50 {
        let id_a = a.select().unwrap();
        let id_b = b.select().unwrap();
        assert_eq!(id_a, id_b);
        a.update(id_a, 0.3).unwrap();
        b.update(id_b, 0.3).unwrap();
    }
    assert_eq!(a.save().unwrap(), b.save().unwrap());
}

#[test]
fn test_load_rejects_other_shape() {
    let saved = Engine::new(seeded(4, 2, 1)).unwrap().save().unwrap();
    let mut other = Engine::new(seeded(5, 2, 1)).unwrap();
    let before = other.save().unwrap();

    let err = other.load(&saved).unwrap_err();
    assert!(matches!(
        err,
        SsnError::CorruptState(CorruptReason::ShapeMismatch { .. })
    ));
    assert_eq!(other.save().unwrap(), before);
}

#[test]
fn test_load_rejects_bad_version_and_empty() {
    let mut engine = Engine::new(seeded(3, 2, 1)).unwrap();
    let mut bytes = engine.save().unwrap();
    bytes[0] = 2;
    assert_eq!(
        engine.load(&bytes).unwrap_err(),
        SsnError::CorruptState(CorruptReason::UnknownVersion(2))
    );
    assert!(matches!(
        engine.load(&[]).unwrap_err(),
        SsnError::CorruptState(CorruptReason::TruncatedHeader(0))
    ));
}

#[test]
fn test_learning_beats_control() {
    // Same seed: the only difference is the reward signal.
    let config = seeded(10, 1, 77);
    let mut trained = Engine::new(config).unwrap();
    let mut control = Engine::new(config).unwrap();

    train(&mut trained, 600, 0);
    for _ in 0..600 {
        let id = control.select().unwrap();
        control.update(id, 0.0).unwrap();
    }

    let share = |engine: &mut Engine| {
        let hits = (0..400)
            .filter(|_| {
                let id = engine.select().unwrap();
                engine.get_path(id).unwrap()[0] == 0
            })
            .count();
        hits as f64 / 400.0
    };
    let trained_share = share(&mut trained);
    let control_share = share(&mut control);
    assert!(
        trained_share > control_share,
        "trained {trained_share} vs control {control_share}"
    );
    assert!(trained_share > 0.6, "trained {trained_share}");
}

#[test]
fn test_destroyed_engine_is_terminal() {
    let mut engine = Engine::new(seeded(3, 3, 2)).unwrap();
    let saved = engine.save().unwrap();
    engine.destroy();
    engine.destroy();

    assert!(engine.is_destroyed());
    assert_eq!(engine.select(), Err(SsnError::InvalidHandle));
    assert_eq!(engine.update(0, 1.0), Err(SsnError::InvalidHandle));
    assert_eq!(engine.get_path(0), Err(SsnError::InvalidHandle));
    assert_eq!(engine.save(), Err(SsnError::InvalidHandle));
    assert_eq!(engine.state_size(), Err(SsnError::InvalidHandle));
    assert_eq!(engine.load(&saved), Err(SsnError::InvalidHandle));
}

#[test]
fn test_out_of_range_and_bad_reward_leave_state() {
    let mut engine = Engine::new(seeded(4, 2, 8)).unwrap();
    let before = engine.save().unwrap();

    assert_eq!(
        engine.update(4, 1.0),
        Err(SsnError::OutOfRange {
            id: 4,
            population_size: 4
        })
    );
    assert!(matches!(engine.update(0, f32::NAN), Err(SsnError::InvalidReward(_))));
    assert!(matches!(engine.get_path(u32::MAX), Err(SsnError::OutOfRange { .. })));
    assert_eq!(engine.save().unwrap(), before);
}

#[test]
fn test_target_scenario_share() {
    let report = run_target_scenario().unwrap();
    assert!(report.window_share() > 0.6, "share {}", report.window_share());
    assert!(report.total_hits >= report.window_hits);
}

#[test]
fn test_scenario_resumes_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenario.ssn");

    let scenario = TargetScenario::default();
    let mut engine = Engine::new(scenario.engine).unwrap();
    let first_half = TargetScenario {
        cycles: 500,
        window: 0,
        ..scenario
    };
    first_half.run_on(&mut engine).unwrap();
    save_state_file(&engine, &path).unwrap();

    let header = read_header(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(header.seed, 42);

    let mut resumed = restore_state_file(&path, 3).unwrap();
    let mut reloaded = Engine::new(scenario.engine).unwrap();
    load_state_file(&mut reloaded, &path).unwrap();

    let second_half = TargetScenario {
        cycles: 500,
        window: 200,
        ..scenario
    };
    let a = second_half.run_on(&mut engine).unwrap();
    let b = second_half.run_on(&mut resumed).unwrap();
    let c = second_half.run_on(&mut reloaded).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, c);
}
