// src/engine/probability.rs

//! Completion probability under the normal approximation.
//!
//! The project duration is modelled as `N(mean, variance)` where mean and
//! variance are summed along a critical path. Probabilities come from the
//! standard normal CDF in `statrs`, which is built on `erfc` and is accurate
//! for arbitrary Z rather than a tabulated range.

use anyhow::anyhow;
use statrs::distribution::{ContinuousCDF, Normal};

use crate::errors::{PertError, Result};

/// Normal approximation of a path's total duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectDistribution {
    pub mean: f64,
    pub variance: f64,
}

impl ProjectDistribution {
    pub fn new(mean: f64, variance: f64) -> Self {
        Self { mean, variance }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }

    pub fn z_score(&self, target: f64) -> Result<f64> {
        z_score(target, self.mean, self.variance)
    }

    /// `P(T <= target)`.
    pub fn probability_by(&self, target: f64) -> Result<f64> {
        probability_of_completion_by(target, self.mean, self.variance)
    }

    /// `P(low < T < high)`.
    pub fn probability_between(&self, low: f64, high: f64) -> Result<f64> {
        probability_between(low, high, self.mean, self.variance)
    }

    /// Duration met with probability `p`.
    pub fn duration_at_confidence(&self, p: f64) -> Result<f64> {
        duration_at_confidence(p, self.mean, self.variance)
    }
}

fn std_dev_of(variance: f64) -> Result<f64> {
    if !variance.is_finite() || variance <= 0.0 {
        return Err(PertError::DegenerateVariance(variance));
    }
    Ok(variance.sqrt())
}

fn standard_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0).map_err(|e| PertError::Other(anyhow!("standard normal: {e}")))
}

/// `Z = (target - mean) / sqrt(variance)`.
pub fn z_score(target: f64, mean: f64, variance: f64) -> Result<f64> {
    if target.is_nan() {
        return Err(PertError::InvalidTarget(target));
    }
    let sd = std_dev_of(variance)?;
    Ok((target - mean) / sd)
}

/// Probability that the project finishes within `target`.
pub fn probability_of_completion_by(target: f64, mean: f64, variance: f64) -> Result<f64> {
    let z = z_score(target, mean, variance)?;
    Ok(standard_normal()?.cdf(z))
}

/// Probability that the project finishes strictly between `low` and `high`.
pub fn probability_between(low: f64, high: f64, mean: f64, variance: f64) -> Result<f64> {
    if low.is_nan() || high.is_nan() || high <= low {
        return Err(PertError::InvalidRange { low, high });
    }
    let upper = probability_of_completion_by(high, mean, variance)?;
    let lower = probability_of_completion_by(low, mean, variance)?;
    Ok((upper - lower).max(0.0))
}

/// Smallest duration `t` with `P(T <= t) = p`.
pub fn duration_at_confidence(p: f64, mean: f64, variance: f64) -> Result<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(PertError::InvalidConfidence(p));
    }
    let sd = std_dev_of(variance)?;
    Ok(mean + standard_normal()?.inverse_cdf(p) * sd)
}
