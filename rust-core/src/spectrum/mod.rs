//! Spectral analysis: FFT, framing and the centroid estimator

pub mod centroid;
pub mod fft;
pub mod windowing;

pub use centroid::{spectral_centroid, CentroidEstimator, StftCentroid, StftConfig};
pub use fft::FftEngine;
