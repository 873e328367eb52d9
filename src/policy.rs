//! Selection and update policies.
//!
//! Selection turns energies into a softmax distribution and samples a path;
//! update folds a reward into one energy and periodically restructures the
//! population.
//!
//! ```text
//! select:  energies ──softmax(alpha)──> distribution ──rng──> id
//! update:  id, reward ──EMA(beta, gamma)──> energy
//!                     └─every population_size updates──> mutate_weakest
//! ```

mod selection;
mod update;

pub use selection::{distribution, select};
pub use update::apply_reward;
