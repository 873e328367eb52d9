//! Path population: symbol sequences and their energies.
//!
//! Paths are stored flattened (`population_size * path_length` bytes) so the
//! codec can write them as one block.

use rand::Rng;

use crate::config::Config;
use crate::error::{SsnError, SsnResult};

/// Record of one structural mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mutation {
    /// Index of the lowest-energy path, now overwritten.
    pub replaced: usize,
    /// Index of the highest-energy path it was copied from.
    pub source: usize,
    /// Position that was resampled in the copy.
    pub position: usize,
}

/// Fixed-size set of paths with one energy per path.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    path_length: usize,
    arity: u8,
    symbols: Vec<u8>,
    energies: Vec<f32>,
    update_count: u64,
}

impl Population {
    /// Allocate random paths with neutral (zero) energy.
    ///
    /// `config` must already be validated.
    pub fn initialize<R: Rng + ?Sized>(config: &Config, rng: &mut R) -> Self {
        let count = config.population_len();
        let path_length = config.path_len();
        let arity = config.arity.max(1);
        let symbols = (0..count * path_length)
            .map(|_| rng.random_range(0..arity))
            .collect();

        Self {
            path_length,
            arity,
            symbols,
            energies: vec![0.0; count],
            update_count: 0,
        }
    }

    /// Reassemble a population from decoded parts.
    pub(crate) fn from_parts(
        path_length: usize,
        arity: u8,
        symbols: Vec<u8>,
        energies: Vec<f32>,
        update_count: u64,
    ) -> Self {
        debug_assert_eq!(symbols.len(), energies.len() * path_length);
        Self {
            path_length,
            arity,
            symbols,
            energies,
            update_count,
        }
    }

    /// Number of paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.energies.len()
    }

    /// True when the population holds no paths.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }

    /// Symbols per path.
    #[must_use]
    pub fn path_length(&self) -> usize {
        self.path_length
    }

    /// Alphabet size.
    #[must_use]
    pub fn arity(&self) -> u8 {
        self.arity
    }

    /// Symbols of path `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SsnError::OutOfRange`] if `id` is not a valid index.
    pub fn get(&self, id: u32) -> SsnResult<&[u8]> {
        let idx = self.index(id)?;
        Ok(self.path(idx))
    }

    /// Energy of path `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SsnError::OutOfRange`] if `id` is not a valid index.
    pub fn energy_of(&self, id: u32) -> SsnResult<f32> {
        let idx = self.index(id)?;
        Ok(self.energies[idx])
    }

    /// Overwrite the energy of path `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SsnError::OutOfRange`] if `id` is not a valid index.
    pub fn set_energy(&mut self, id: u32, value: f32) -> SsnResult<()> {
        let idx = self.index(id)?;
        self.energies[idx] = value;
        Ok(())
    }

    /// All energies, indexed by path id.
    #[must_use]
    pub fn energies(&self) -> &[f32] {
        &self.energies
    }

    /// All symbols, flattened path by path.
    #[must_use]
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// Number of updates applied since creation.
    #[must_use]
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Advance the update counter, returning the new value.
    pub(crate) fn record_update(&mut self) -> u64 {
        self.update_count = self.update_count.wrapping_add(1);
        self.update_count
    }

    /// Index of the lowest-energy path (ties go to the lowest index).
    #[must_use]
    pub fn weakest(&self) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, &e) in self.energies.iter().enumerate() {
            match best {
                Some((_, b)) if e >= b => {}
                _ => best = Some((i, e)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Index of the highest-energy path (ties go to the lowest index).
    #[must_use]
    pub fn strongest(&self) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, &e) in self.energies.iter().enumerate() {
            match best {
                Some((_, b)) if e <= b => {}
                _ => best = Some((i, e)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Replace the weakest path with a point-mutated copy of the strongest.
    ///
    /// The copy gets exactly one position redrawn from the alphabet and its
    /// energy reset to zero. No-op when weakest and strongest coincide.
    pub fn mutate_weakest<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Mutation> {
        let replaced = self.weakest()?;
        let source = self.strongest()?;
        if replaced == source {
            return None;
        }

        let len = self.path_length;
        self.symbols
            .copy_within(source * len..(source + 1) * len, replaced * len);

        let position = rng.random_range(0..len);
        self.symbols[replaced * len + position] = rng.random_range(0..self.arity);
        self.energies[replaced] = 0.0;

        Some(Mutation {
            replaced,
            source,
            position,
        })
    }

    fn path(&self, idx: usize) -> &[u8] {
        &self.symbols[idx * self.path_length..(idx + 1) * self.path_length]
    }

    fn index(&self, id: u32) -> SsnResult<usize> {
        let idx = id as usize;
        if idx < self.len() {
            Ok(idx)
        } else {
            Err(SsnError::OutOfRange {
                id,
                population_size: self.len(),
            })
        }
    }
}
