//! Softmax selection over path energies.
//!
//! Weights are `exp(alpha * energy)`, shifted by the largest logit before
//! exponentiating so large energies cannot overflow.

// Path ids fit in u32 because population size is a positive i32
#![allow(clippy::cast_possible_truncation)]

use rand::Rng;

use crate::population::Population;

/// Selection probabilities for every path, summing to 1.
///
/// Falls back to a uniform distribution when the weights degenerate
/// (for example after energies diverged to infinity).
#[must_use]
pub fn distribution(population: &Population, alpha: f32) -> Vec<f64> {
    let n = population.len();
    if n == 0 {
        return Vec::new();
    }

    let peak = peak_logit(population.energies(), alpha);
    let weights: Vec<f64> = population
        .energies()
        .iter()
        .map(|&e| weight(e, alpha, peak))
        .collect();
    let total: f64 = weights.iter().sum();

    if total > 0.0 && total.is_finite() {
        weights.into_iter().map(|w| w / total).collect()
    } else {
        #[allow(clippy::cast_precision_loss)]
        let uniform = 1.0 / n as f64;
        vec![uniform; n]
    }
}

/// Sample one path id.
///
/// A single-path population always yields 0 without touching `rng`;
/// otherwise exactly one `f64` is drawn.
pub fn select<R: Rng + ?Sized>(population: &Population, alpha: f32, rng: &mut R) -> u32 {
    let n = population.len();
    if n <= 1 {
        return 0;
    }

    let energies = population.energies();
    let peak = peak_logit(energies, alpha);
    let total: f64 = energies.iter().map(|&e| weight(e, alpha, peak)).sum();
    let draw: f64 = rng.random();

    if !(total > 0.0 && total.is_finite()) {
        #[allow(clippy::cast_precision_loss, clippy::cast_sign_loss)]
        let idx = ((draw * n as f64) as usize).min(n - 1);
        return idx as u32;
    }

    let mut threshold = draw * total;
    let mut last_positive = 0;
    for (i, &e) in energies.iter().enumerate() {
        let w = weight(e, alpha, peak);
        if w <= 0.0 {
            continue;
        }
        if threshold < w {
            return i as u32;
        }
        threshold -= w;
        last_positive = i;
    }

    // Rounding left a sliver past the last bucket
    last_positive as u32
}

fn peak_logit(energies: &[f32], alpha: f32) -> f64 {
    let alpha = f64::from(alpha);
    energies
        .iter()
        .map(|&e| alpha * f64::from(e))
        .fold(f64::NEG_INFINITY, f64::max)
}

fn weight(energy: f32, alpha: f32, peak: f64) -> f64 {
    let w = (f64::from(alpha) * f64::from(energy) - peak).exp();
    if w.is_finite() { w } else { 0.0 }
}
