//! Engine error taxonomy

use std::fmt;
use thiserror::Error;

/// Which signal produced an undefined centroid
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeasurementStage {
    /// The unfiltered input, measured before any filtering
    Input,
    /// Output of a filtering iteration
    Filtered { iteration: usize, center_hz: f64 },
}

impl fmt::Display for MeasurementStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementStage::Input => write!(f, "input signal"),
            MeasurementStage::Filtered {
                iteration,
                center_hz,
            } => write!(
                f,
                "signal filtered at {:.3} Hz (iteration {})",
                center_hz, iteration
            ),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CentroidError {
    #[error("spectral centroid of the {stage} is undefined (empty, silent or non-finite samples)")]
    DegenerateSignal { stage: MeasurementStage },

    /// `iteration` is the iteration that would have used the candidate;
    /// 0 refers to the initial guess.
    #[error(
        "center frequency diverged below zero before iteration {iteration}: \
         candidate {candidate_hz:.3} Hz \
         (last center {last_center_hz:.3} Hz, last error {last_error_hz:.3} Hz)"
    )]
    DivergedBelowZero {
        iteration: usize,
        candidate_hz: f64,
        last_center_hz: f64,
        last_error_hz: f64,
    },

    #[error(
        "center frequency diverged above Nyquist ({nyquist_hz} Hz) before iteration {iteration}: \
         candidate {candidate_hz:.3} Hz \
         (last center {last_center_hz:.3} Hz, last error {last_error_hz:.3} Hz)"
    )]
    DivergedAboveNyquist {
        iteration: usize,
        candidate_hz: f64,
        nyquist_hz: f64,
        last_center_hz: f64,
        last_error_hz: f64,
    },

    #[error("bandwidth must be a positive, finite frequency (got {0} Hz)")]
    InvalidBandwidth(f64),

    #[error("sample rate must be positive")]
    InvalidSampleRate,

    #[error("tolerance must be a non-negative, finite frequency (got {0} Hz)")]
    InvalidTolerance(f64),

    #[error("step gain must lie in (0, 1] (got {0})")]
    InvalidStepGain(f64),

    #[error("iteration budget must allow at least one filtering pass")]
    ZeroIterationBudget,
}

impl CentroidError {
    /// Search left the valid frequency range
    pub fn is_divergence(&self) -> bool {
        matches!(
            self,
            CentroidError::DivergedBelowZero { .. } | CentroidError::DivergedAboveNyquist { .. }
        )
    }
}
