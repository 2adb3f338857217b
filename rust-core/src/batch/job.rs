//! Batch job description

use super::BatchError;
use crate::engine::ConvergenceConfig;
use crate::filters::FilterKind;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// One batch run, usually read from a YAML file:
///
/// ```yaml
/// input_folder: ./sounds/
/// output_folder: ./sounds/outs/
/// sample_rate: 44100
/// bandwidths: [200, 500, 1000]
/// ```
///
/// `convergence` and `filter` are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct JobDescription {
    pub input_folder: PathBuf,
    pub output_folder: PathBuf,
    /// Every input is resampled to this rate before filtering
    pub sample_rate: u32,
    /// Bandwidths in Hz, one output file each
    pub bandwidths: Vec<f64>,
    #[serde(default)]
    pub convergence: ConvergenceConfig,
    #[serde(default)]
    pub filter: FilterKind,
}

impl JobDescription {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, BatchError> {
        let job: JobDescription = serde_yaml::from_str(yaml)?;
        job.validate()?;
        Ok(job)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, BatchError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| BatchError::io(path, e))?;
        Self::from_yaml_str(&yaml)
    }

    pub fn validate(&self) -> Result<(), BatchError> {
        if self.sample_rate == 0 {
            return Err(BatchError::InvalidJob("sample_rate must be positive".into()));
        }
        if self.bandwidths.is_empty() {
            return Err(BatchError::InvalidJob("bandwidths must not be empty".into()));
        }
        if let Some(bw) = self
            .bandwidths
            .iter()
            .find(|bw| !(bw.is_finite() && **bw > 0.0))
        {
            return Err(BatchError::InvalidJob(format!(
                "bandwidth {} Hz is not a positive frequency",
                bw
            )));
        }
        // Each bandwidth names one output file and runs on its own thread
        for (i, bw) in self.bandwidths.iter().enumerate() {
            if self.bandwidths[..i].contains(bw) {
                return Err(BatchError::InvalidJob(format!(
                    "bandwidth {} Hz is listed more than once",
                    bw
                )));
            }
        }
        self.convergence.validate()?;
        Ok(())
    }
}
