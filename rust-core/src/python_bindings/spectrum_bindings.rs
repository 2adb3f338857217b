//! Python bindings for centroid measurement

use crate::spectrum;
use numpy::PyReadonlyArray1;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Mean spectral centroid of a mono signal in Hz
///
/// Args:
///     audio: Mono signal as float64 numpy array
///     sample_rate: Sample rate in Hz
///
/// Returns:
///     Centroid in Hz, NaN for silent or empty input
#[pyfunction]
pub fn spectral_centroid(
    py: Python<'_>,
    audio: PyReadonlyArray1<f64>,
    sample_rate: u32,
) -> PyResult<f64> {
    if sample_rate == 0 {
        return Err(PyValueError::new_err("sample_rate must be positive"));
    }
    let samples = audio
        .as_slice()
        .map_err(|e| PyValueError::new_err(e.to_string()))?;

    Ok(py.allow_threads(|| spectrum::spectral_centroid(samples, sample_rate)))
}
