//! Centroid-preserving bandpass engine

pub mod config;
pub mod convergence;
pub mod error;

pub use config::ConvergenceConfig;
pub use convergence::{
    apply_bandpass, BandpassOutcome, CentroidBandpass, ConvergenceStatus, IterationRecord,
};
pub use error::{CentroidError, MeasurementStage};
