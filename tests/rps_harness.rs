//! Integration tests for the rock-paper-scissors harness.
//!
//! Run with: cargo test --release rps_harness

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use ssn::persistence::{context_state_path, load_state_file, save_state_file};
use ssn::rps::{
    play_match, run_match, run_sweep, write_csv, BiasedOpponent, ContextualPlayer, MatchConfig,
    Move, OpponentKind, UniformOpponent, CONTEXTS,
};
use ssn::Config;

fn match_config(seed: u64, steps: u32) -> MatchConfig {
    MatchConfig {
        steps,
        engine: Config {
            population_size: 30,
            path_length: 1,
            alpha: 2.0,
            beta: 0.2,
            gamma: 0.1,
            seed,
            ..Config::default()
        },
        opponent: OpponentKind::Biased,
        opponent_seed: seed.wrapping_mul(31).max(1),
    }
}

#[test]
fn test_biased_opponent_is_exploited() {
    let stats = run_sweep(&match_config(500, 1000), 12, 500, |_| {});
    assert_eq!(stats.matches, 12);
    // Random play wins a third of the time.
    assert!(stats.mean_win_rate() > 0.45, "{}", stats.mean_win_rate());
}

#[test]
fn test_uniform_opponent_is_not_exploitable() {
    let config = MatchConfig {
        opponent: OpponentKind::Uniform,
        ..match_config(900, 1000)
    };
    let stats = run_sweep(&config, 12, 900, |_| {});
    let mean = stats.mean_win_rate();
    assert!((0.25..0.42).contains(&mean), "{mean}");
}

#[test]
fn test_player_recovers_after_bias_switch() {
    let mut player = ContextualPlayer::new(match_config(41, 0).engine).unwrap();
    let mut opponent = BiasedOpponent::new(41);
    let report = run_match(&mut player, &mut opponent, 600).unwrap();

    // Rounds 301..=600 face a Paper bias; the tail should favour Scissors.
    let tail = &report.records[500..];
    let scissors = tail.iter().filter(|r| r.my_move == Move::Scissors).count();
    assert!(scissors > tail.len() / 2, "scissors {scissors}/{}", tail.len());
}

#[test]
fn test_only_active_context_learns() {
    let mut player = ContextualPlayer::new(match_config(3, 0).engine).unwrap();
    let mut opponent = UniformOpponent::new(3);
    let report = run_match(&mut player, &mut opponent, 200).unwrap();

    let mut per_context = [0u64; CONTEXTS];
    for record in &report.records {
        per_context[record.context.index()] += 1;
    }
    for (engine, expected) in player.engines().iter().zip(per_context) {
        assert_eq!(engine.population().unwrap().update_count(), expected);
    }
}

#[test]
fn test_match_csv_log() {
    let report = play_match(&match_config(12, 25)).unwrap();
    let mut buf = Vec::new();
    write_csv(&report, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();

    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("Step,Context,OpponentMove,MyMove,Reward,WinRate")
    );
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 25);
    for (i, row) in rows.iter().enumerate() {
        let fields: Vec<&str> = row.split(',').collect();
        assert_eq!(fields.len(), 6);
        assert_eq!(fields[0], (i + 1).to_string());
        assert!(["1.0", "0.0", "-0.5"].contains(&fields[4]), "{row}");
        assert_eq!(fields[5].split('.').nth(1).map(str::len), Some(3));
    }
}

#[test]
fn test_context_engines_persist() {
    let dir = tempfile::tempdir().unwrap();
    let config = match_config(17, 0);

    let mut player = ContextualPlayer::new(config.engine).unwrap();
    let mut opponent = BiasedOpponent::new(17);
    run_match(&mut player, &mut opponent, 150).unwrap();
    for (i, engine) in player.engines().iter().enumerate() {
        save_state_file(engine, &context_state_path(dir.path(), i)).unwrap();
    }

    let mut resumed = ContextualPlayer::new(config.engine).unwrap();
    for (i, engine) in resumed.engines_mut().iter_mut().enumerate() {
        load_state_file(engine, &context_state_path(dir.path(), i)).unwrap();
    }
    for (a, b) in player.engines().iter().zip(resumed.engines()) {
        assert_eq!(a.save().unwrap(), b.save().unwrap());
    }
}
