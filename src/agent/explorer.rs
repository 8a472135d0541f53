//! Action-selection policies over a vector of action-values.
use ndarray::ArrayView1;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Index of the largest value. Ties go to the first index holding it.
pub fn argmax(values: ArrayView1<f32>) -> usize {
    let mut best = 0;
    for (i, &value) in values.iter().enumerate().skip(1) {
        if value > values[best] {
            best = i;
        }
    }
    best
}

/// Largest value, `-inf` for an empty vector.
pub fn max_value(values: ArrayView1<f32>) -> f32 {
    values.iter().fold(f32::NEG_INFINITY, |max, &v| max.max(v))
}

/// With probability `exploration_rate` a uniformly random action, otherwise
/// the greedy one.
pub fn epsilon_greedy<R: Rng + ?Sized>(q_values: ArrayView1<f32>, exploration_rate: f32, rng: &mut R) -> usize {
    if rng.gen::<f32>() < exploration_rate {
        rng.gen_range(0..q_values.len())
    } else {
        argmax(q_values)
    }
}

/// Samples an action with probability proportional to `(q + shift)^bias`,
/// where `shift` makes every value strictly positive. Larger `bias` moves
/// the distribution towards the greedy action.
///
/// Weights are normalized in log space so the heaviest one is exactly 1.0
/// and no weight can overflow, whatever the bias.
pub fn power_law<R: Rng + ?Sized>(q_values: ArrayView1<f32>, bias: f32, rng: &mut R) -> usize {
    let min = q_values.iter().fold(f64::INFINITY, |min, &v| min.min(v as f64));
    let shift = (-min).max(0.0) + 1e-6;
    let log_weights = q_values
        .iter()
        .map(|&v| bias as f64 * (v as f64 + shift).ln())
        .collect::<Vec<_>>();
    let top = log_weights.iter().fold(f64::NEG_INFINITY, |max, &w| max.max(w));
    let weights = log_weights.iter().map(|&w| (w - top).exp()).collect::<Vec<_>>();
    match WeightedIndex::new(&weights) {
        Ok(distribution) => distribution.sample(rng),
        // Non-finite action-values
        Err(_) => argmax(q_values),
    }
}
