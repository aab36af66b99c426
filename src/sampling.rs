//! Temperature-controlled categorical sampling.
//!
//! `temperature → 0` collapses the distribution onto its arg-max outcome,
//! `temperature = 1` leaves it unchanged, and `temperature → ∞` flattens it
//! toward uniform. Zero and negative temperatures are rejected before any
//! arithmetic (the reweighting divides by the temperature).

use rand::Rng;

use crate::{Error, Result};

/// Draw one index from `probabilities` after temperature reweighting.
///
/// Reweights `ln(p) / temperature`, renormalizes with a numerically stable
/// softmax, then walks the CDF with a uniform draw. Entries with zero
/// probability stay at zero for every temperature.
pub fn sample_with_temperature<R: Rng + ?Sized>(
    probabilities: &[f32],
    temperature: f32,
    rng: &mut R,
) -> Result<usize> {
    if !(temperature > 0.0) {
        return Err(Error::Config(format!(
            "temperature must be > 0, got {temperature}"
        )));
    }
    if probabilities.is_empty() {
        return Err(Error::Model("empty probability distribution".into()));
    }

    let scaled: Vec<f64> = probabilities
        .iter()
        .map(|&p| (p as f64).ln() / temperature as f64)
        .collect();
    let max = scaled.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return Err(Error::Model("all-zero probability distribution".into()));
    }

    let weights: Vec<f64> = scaled.iter().map(|&x| (x - max).exp()).collect();
    let total: f64 = weights.iter().sum();

    // Weighted selection via CDF walk.
    let draw: f64 = rng.random::<f64>() * total;
    let mut cumulative = 0.0f64;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if draw < cumulative {
            return Ok(i);
        }
    }
    // Floating-point rounding can leave the draw past the last bucket.
    Ok(probabilities.len() - 1)
}
