//! State files on disk.
//!
//! A state file is exactly the buffer [`Engine::save`] returns; no extra
//! framing, so files written here load through any reader of the raw codec
//! layout.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::engine::Engine;
use crate::error::SsnError;

/// Errors from reading or writing state files.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Filesystem failure.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// The engine rejected the operation or the file contents.
    #[error(transparent)]
    Engine(#[from] SsnError),
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> PersistenceError + '_ {
    move |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Save `engine` to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns an error if the engine is destroyed or the write fails.
pub fn save_state_file(engine: &Engine, path: &Path) -> Result<(), PersistenceError> {
    let bytes = engine.save()?;
    fs::write(path, bytes).map_err(io_error(path))
}

/// Load `path` into `engine`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not decode for this
/// engine; the engine is unchanged in either case.
pub fn load_state_file(engine: &mut Engine, path: &Path) -> Result<(), PersistenceError> {
    let bytes = fs::read(path).map_err(io_error(path))?;
    engine.load(&bytes)?;
    Ok(())
}

/// Build a new engine from a state file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not decode.
pub fn restore_state_file(path: &Path, arity: u8) -> Result<Engine, PersistenceError> {
    let bytes = fs::read(path).map_err(io_error(path))?;
    Ok(Engine::restore(&bytes, arity)?)
}

/// Path of the state file for context `index` inside `dir`.
#[must_use]
pub fn context_state_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("context_{index}.ssn"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::tempdir;

    fn engine() -> Engine {
        let config = Config {
            population_size: 6,
            path_length: 2,
            seed: 31,
            ..Config::default()
        };
        let mut engine = Engine::new(config).unwrap();
        for _ in 0..10 {
            let id = engine.select().unwrap();
            engine.update(id, 1.0).unwrap();
        }
        engine
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.ssn");

        let mut original = engine();
        save_state_file(&original, &path).unwrap();

        let mut fresh = Engine::new(*original.config().unwrap()).unwrap();
        load_state_file(&mut fresh, &path).unwrap();
        assert_eq!(fresh.state().unwrap(), original.state().unwrap());
        assert_eq!(fresh.select().unwrap(), original.select().unwrap());
    }

    #[test]
    fn test_restore_from_file() {
        let dir = tempdir().unwrap();
        let path = context_state_path(dir.path(), 2);
        let original = engine();
        save_state_file(&original, &path).unwrap();

        let restored = restore_state_file(&path, 3).unwrap();
        assert_eq!(restored.state().unwrap(), original.state().unwrap());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let mut target = engine();
        let result = load_state_file(&mut target, &dir.path().join("missing.ssn"));
        assert!(matches!(result, Err(PersistenceError::Io { .. })));
    }

    #[test]
    fn test_garbage_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.ssn");
        fs::write(&path, b"BAAD").unwrap();

        let mut target = engine();
        let before = target.state().unwrap().clone();
        let result = load_state_file(&mut target, &path);
        assert!(matches!(
            result,
            Err(PersistenceError::Engine(SsnError::CorruptState(_)))
        ));
        assert_eq!(target.state().unwrap(), &before);
    }
}
