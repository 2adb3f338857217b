//! Convergence policy

use super::error::CentroidError;
use serde::Deserialize;

pub const DEFAULT_TOLERANCE_HZ: f64 = 0.2;
pub const DEFAULT_MAX_ITERATIONS: usize = 30;
pub const DEFAULT_STEP_GAIN: f64 = 1.0;

/// Gain of the damped policy variant
pub const DAMPED_STEP_GAIN: f64 = 0.2;

/// Control parameters of the centroid search
///
/// Deserializes with per-field defaults, so a job file may override any subset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConvergenceConfig {
    /// Largest accepted |target - measured| in Hz
    pub tolerance_hz: f64,

    /// Maximum number of filtering passes
    pub max_iterations: usize,

    /// Proportional correction gain in (0, 1]
    pub step_gain: f64,
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            tolerance_hz: DEFAULT_TOLERANCE_HZ,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            step_gain: DEFAULT_STEP_GAIN,
        }
    }
}

impl ConvergenceConfig {
    /// Default policy with the damped step gain
    pub fn damped() -> Self {
        Self {
            step_gain: DAMPED_STEP_GAIN,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), CentroidError> {
        if !(self.tolerance_hz.is_finite() && self.tolerance_hz >= 0.0) {
            return Err(CentroidError::InvalidTolerance(self.tolerance_hz));
        }
        if !(self.step_gain > 0.0 && self.step_gain <= 1.0) {
            return Err(CentroidError::InvalidStepGain(self.step_gain));
        }
        if self.max_iterations == 0 {
            return Err(CentroidError::ZeroIterationBudget);
        }
        Ok(())
    }
}
