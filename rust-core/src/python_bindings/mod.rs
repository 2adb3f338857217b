//! PyO3 bindings for Python integration

use pyo3::prelude::*;

mod engine_bindings;
mod spectrum_bindings;

/// Python module definition
#[pymodule]
fn centroid_bandpass(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<engine_bindings::PyBandpassResult>()?;
    m.add_class::<engine_bindings::PyFilterKind>()?;
    m.add_function(wrap_pyfunction!(engine_bindings::apply_bandpass, m)?)?;
    m.add_function(wrap_pyfunction!(spectrum_bindings::spectral_centroid, m)?)?;

    Ok(())
}
