//! Probability helpers shared by the stochastic phases
//!
//! Mortality and conception formulas are not bounded to [0, 1]. Every draw
//! goes through [`clamp_probability`], so a value at or above 1 is a certain
//! event and a value at or below 0 never happens.

use rand::Rng;

pub fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// Single Bernoulli trial with a clamped success probability
pub fn bernoulli<R: Rng>(rng: &mut R, p: f64) -> bool {
    rng.gen::<f64>() < clamp_probability(p)
}
