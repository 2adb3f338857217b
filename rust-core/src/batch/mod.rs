//! Batch orchestration: job files, WAV I/O, resampling and the runner

pub mod io;
pub mod job;
pub mod resample;
pub mod runner;

pub use io::{load_wav, save_wav, AudioBuffer};
pub use job::JobDescription;
pub use resample::{resample, Resampler};
pub use runner::{BatchReport, BatchRunner, ItemOutcome, ItemReport};

use crate::engine::CentroidError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("WAV error on {}: {source}", path.display())]
    Wav {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("failed to parse job description: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid job description: {0}")]
    InvalidJob(String),

    #[error("failed to create resampler: {0}")]
    ResamplerConstruction(#[from] rubato::ResamplerConstructionError),

    #[error("resampling failed: {0}")]
    Resample(#[from] rubato::ResampleError),

    #[error(transparent)]
    Engine(#[from] CentroidError),

    #[error("worker for {bandwidth_hz} Hz panicked")]
    WorkerPanicked { bandwidth_hz: f64 },
}

impl BatchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BatchError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn wav(path: impl Into<PathBuf>, source: hound::Error) -> Self {
        BatchError::Wav {
            path: path.into(),
            source,
        }
    }
}
