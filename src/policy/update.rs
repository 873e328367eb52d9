//! Reward folding and periodic structural mutation.

use rand::Rng;
use tracing::trace;

use crate::error::{SsnError, SsnResult};
use crate::population::{Mutation, Population};

/// Fold `reward` into the energy of path `id`.
///
/// `energy <- energy * (1 - gamma) + beta * reward`, then the update counter
/// advances. Every `population.len()` updates the weakest path is replaced
/// by a mutated copy of the strongest; the mutation, if any, is returned.
///
/// # Errors
///
/// Returns [`SsnError::OutOfRange`] for a bad `id` and
/// [`SsnError::InvalidReward`] for a non-finite reward. Neither touches the
/// population or `rng`.
pub fn apply_reward<R: Rng + ?Sized>(
    population: &mut Population,
    id: u32,
    reward: f32,
    beta: f32,
    gamma: f32,
    rng: &mut R,
) -> SsnResult<Option<Mutation>> {
    let energy = population.energy_of(id)?;
    if !reward.is_finite() {
        return Err(SsnError::InvalidReward(reward));
    }

    population.set_energy(id, energy * (1.0 - gamma) + beta * reward)?;

    let count = population.record_update();
    let period = population.len() as u64;
    if count % period != 0 {
        return Ok(None);
    }

    let mutation = population.mutate_weakest(rng);
    if let Some(m) = mutation {
        trace!(
            replaced = m.replaced,
            source = m.source,
            position = m.position,
            update_count = count,
            "structural mutation"
        );
    }
    Ok(mutation)
}
