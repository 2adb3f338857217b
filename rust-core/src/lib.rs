//! Centroid-preserving bandpass
//!
//! Bandpass filtering that searches the center frequency so the filtered
//! signal keeps the spectral centroid of the input, with batch processing of
//! WAV folders and optional Python bindings.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![cfg_attr(feature = "python", allow(non_local_definitions))]

pub mod batch;
pub mod engine;
pub mod filters;
pub mod spectrum;

#[cfg(feature = "python")]
mod python_bindings;

pub use engine::{
    apply_bandpass, BandpassOutcome, CentroidBandpass, CentroidError, ConvergenceConfig,
    ConvergenceStatus,
};
pub use filters::{BandpassFilter, BiquadBandpass, FilterKind, FirBandpass};
pub use spectrum::{spectral_centroid, CentroidEstimator, StftCentroid, StftConfig};
