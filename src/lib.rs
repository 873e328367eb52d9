// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! SSN: a structural selection network.
//!
//! An engine keeps a population of fixed-length symbol paths, each with an
//! energy. Callers repeatedly:
//! - `select` a path (softmax over energies scaled by `alpha`)
//! - act on it and report a scalar reward through `update`
//!
//! Energies follow an exponential moving average, and every
//! `population_size` updates the weakest path is overwritten by a mutated
//! copy of the strongest. The full state serializes to a flat
//! little-endian buffer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Experiment harness (rps, CLI)     │
//! ├─────────────────────────────────────┤
//! │   Engine (lifecycle, save/load)     │
//! ├──────────────────┬──────────────────┤
//! │  Policy          │  Codec           │
//! │  select/update   │  state buffer    │
//! ├──────────────────┴──────────────────┤
//! │   Population + RandomSource         │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use ssn::{Config, Engine};
//!
//! let mut engine = Engine::new(Config {
//!     population_size: 8,
//!     path_length: 4,
//!     seed: 7,
//!     ..Config::default()
//! })?;
//!
//! let id = engine.select()?;
//! engine.update(id, 1.0)?;
//!
//! let saved = engine.save()?;
//! assert_eq!(saved.len(), engine.state_size()? as usize);
//! # Ok::<(), ssn::SsnError>(())
//! ```

pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod persistence;
pub mod policy;
pub mod population;
pub mod rng;
pub mod rps;
pub mod scenario;

pub use codec::state_size;
pub use config::Config;
pub use engine::{Engine, EngineState};
pub use error::{ConfigIssue, CorruptReason, SsnError, SsnResult};
pub use population::{Mutation, Population};
pub use rng::RandomSource;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
