#![no_main]

//! State buffer decoder fuzzer.
//!
//! Feeds arbitrary bytes to `load` and `restore`. A rejected buffer must
//! leave the live engine untouched; an accepted one must re-encode to the
//! same bytes apart from the header padding, which is always written as zero.

use libfuzzer_sys::fuzz_target;
use ssn::{Config, Engine};

/// Header padding range: version tag plus the five leading config fields.
const PADDING: std::ops::Range<usize> = 24..28;

fn same_ignoring_padding(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a[..PADDING.start] == b[..PADDING.start] && a[PADDING.end..] == b[PADDING.end..]
}

fuzz_target!(|data: &[u8]| {
    let config = Config {
        population_size: 4,
        path_length: 3,
        seed: 1,
        ..Config::default()
    };
    let Ok(mut engine) = Engine::new(config) else {
        return;
    };
    let Ok(before) = engine.save() else {
        return;
    };

    match engine.load(data) {
        Ok(()) => {
            assert!(engine.save().is_ok_and(|saved| same_ignoring_padding(&saved, data)));
            assert!(engine.select().is_ok_and(|id| id < 4));
        }
        Err(_) => assert_eq!(engine.save().ok(), Some(before)),
    }

    if let Ok(mut restored) = Engine::restore(data, 3) {
        assert!(restored.save().is_ok_and(|saved| same_ignoring_padding(&saved, data)));
        let size = restored.config().map(|c| c.population_size).unwrap_or(0);
        assert!(restored.select().is_ok_and(|id| (id as i64) < i64::from(size)));
    }
});
