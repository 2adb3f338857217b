//! Python bindings for the convergence engine

use crate::engine::{BandpassOutcome, CentroidBandpass, ConvergenceConfig};
use crate::filters::FilterKind;
use crate::spectrum::StftCentroid;
use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Filter family exposed to Python
#[pyclass(name = "FilterKind")]
#[derive(Clone)]
pub enum PyFilterKind {
    Biquad,
    Fir,
}

impl From<PyFilterKind> for FilterKind {
    fn from(kind: PyFilterKind) -> Self {
        match kind {
            PyFilterKind::Biquad => FilterKind::Biquad,
            PyFilterKind::Fir => FilterKind::Fir,
        }
    }
}

/// Result of a centroid-preserving bandpass
#[pyclass(name = "BandpassResult")]
pub struct PyBandpassResult {
    outcome: BandpassOutcome,
}

#[pymethods]
impl PyBandpassResult {
    /// Filtered signal as numpy array
    #[getter]
    fn audio<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_slice(py, &self.outcome.signal)
    }

    /// True when the centroid matched within tolerance
    #[getter]
    fn converged(&self) -> bool {
        self.outcome.is_converged()
    }

    #[getter]
    fn iterations(&self) -> usize {
        self.outcome.iterations
    }

    /// Center frequency that produced the signal (Hz)
    #[getter]
    fn center(&self) -> f64 {
        self.outcome.center_hz
    }

    #[getter]
    fn target_centroid(&self) -> f64 {
        self.outcome.target_centroid_hz
    }

    #[getter]
    fn measured_centroid(&self) -> f64 {
        self.outcome.measured_centroid_hz
    }

    fn __repr__(&self) -> String {
        format!(
            "BandpassResult(converged={}, iterations={}, center={:.3}, error={:.4})",
            self.outcome.is_converged(),
            self.outcome.iterations,
            self.outcome.center_hz,
            self.outcome.error_hz()
        )
    }
}

/// Bandpass a signal so that its spectral centroid is preserved
///
/// Args:
///     audio: Mono signal as float64 numpy array
///     bandwidth: Bandwidth in Hz
///     sample_rate: Sample rate in Hz
///     tolerance: Accepted centroid error in Hz
///     max_iterations: Maximum number of filtering passes
///     step_gain: Correction gain in (0, 1]
///     filter_kind: Filter family
///
/// Raises:
///     ValueError: invalid arguments, silent input or a diverging search
#[pyfunction]
#[pyo3(signature = (
    audio,
    bandwidth,
    sample_rate,
    tolerance=0.2,
    max_iterations=30,
    step_gain=1.0,
    filter_kind=PyFilterKind::Biquad
))]
#[allow(clippy::too_many_arguments)]
pub fn apply_bandpass(
    py: Python<'_>,
    audio: PyReadonlyArray1<f64>,
    bandwidth: f64,
    sample_rate: u32,
    tolerance: f64,
    max_iterations: usize,
    step_gain: f64,
    filter_kind: PyFilterKind,
) -> PyResult<PyBandpassResult> {
    let samples = audio
        .as_slice()
        .map_err(|e| PyValueError::new_err(e.to_string()))?;

    let engine = CentroidBandpass::with_components(
        StftCentroid::default(),
        FilterKind::from(filter_kind),
        ConvergenceConfig {
            tolerance_hz: tolerance,
            max_iterations,
            step_gain,
        },
    );

    let outcome = py
        .allow_threads(|| engine.apply(samples, bandwidth, sample_rate))
        .map_err(|e| PyValueError::new_err(e.to_string()))?;

    Ok(PyBandpassResult { outcome })
}
