//! Batch runner
//!
//! Per input file: load, resample to the job rate, write `<stem>_full.wav`,
//! then filter every bandwidth in parallel and write `<stem>_<bw>.wav`.
//! Failures are recorded per item and never abort the rest of the run.

use super::{save_wav, AudioBuffer, BatchError, JobDescription, Resampler};
use crate::engine::{CentroidBandpass, ConvergenceStatus};
use crate::filters::FilterKind;
use crate::spectrum::StftCentroid;
use std::path::{Path, PathBuf};
use std::thread;
use tracing::{debug, info, warn};

type Engine = CentroidBandpass<StftCentroid, FilterKind>;

#[derive(Debug)]
pub enum ItemOutcome {
    /// Resampled, unfiltered copy written
    Reference { output: PathBuf },
    Filtered {
        bandwidth_hz: f64,
        output: PathBuf,
        status: ConvergenceStatus,
        iterations: usize,
        center_hz: f64,
    },
    /// `bandwidth_hz` is `None` when the file itself could not be prepared
    Failed {
        bandwidth_hz: Option<f64>,
        error: BatchError,
    },
}

#[derive(Debug)]
pub struct ItemReport {
    pub input: PathBuf,
    pub outcome: ItemOutcome,
}

impl ItemReport {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, ItemOutcome::Failed { .. })
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub items: Vec<ItemReport>,
}

impl BatchReport {
    pub fn failures(&self) -> impl Iterator<Item = &ItemReport> {
        self.items.iter().filter(|item| item.is_failure())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }

    /// Filtered items that ran out of iterations
    pub fn exhausted_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| {
                matches!(
                    item.outcome,
                    ItemOutcome::Filtered {
                        status: ConvergenceStatus::Exhausted,
                        ..
                    }
                )
            })
            .count()
    }
}

pub struct BatchRunner {
    job: JobDescription,
    engine: Engine,
    resampler: Resampler,
}

impl BatchRunner {
    pub fn new(job: JobDescription) -> Result<Self, BatchError> {
        job.validate()?;
        let engine = CentroidBandpass::with_components(
            StftCentroid::default(),
            job.filter,
            job.convergence.clone(),
        );

        Ok(Self {
            job,
            engine,
            resampler: Resampler::default(),
        })
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, BatchError> {
        Self::new(JobDescription::from_yaml_file(path)?)
    }

    pub fn job(&self) -> &JobDescription {
        &self.job
    }

    /// WAV files of the input folder, sorted by name
    pub fn input_files(&self) -> Result<Vec<PathBuf>, BatchError> {
        let folder = &self.job.input_folder;
        let entries = std::fs::read_dir(folder).map_err(|e| BatchError::io(folder, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| BatchError::io(folder, e))?.path();
            let is_wav = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));
            if path.is_file() && is_wav {
                files.push(path);
            }
        }
        files.sort();

        Ok(files)
    }

    /// Process every input file
    ///
    /// Only folder-level problems are returned as `Err`; everything else ends
    /// up in the report.
    pub fn run(&self) -> Result<BatchReport, BatchError> {
        let files = self.input_files()?;
        let output_folder = &self.job.output_folder;
        std::fs::create_dir_all(output_folder).map_err(|e| BatchError::io(output_folder, e))?;

        info!(
            files = files.len(),
            bandwidths = self.job.bandwidths.len(),
            sample_rate = self.job.sample_rate,
            "starting batch"
        );

        let mut report = BatchReport::default();
        for path in files {
            self.process_file(&path, &mut report);
        }

        info!(
            items = report.items.len(),
            failures = report.failure_count(),
            exhausted = report.exhausted_count(),
            "batch finished"
        );
        Ok(report)
    }

    fn process_file(&self, path: &Path, report: &mut BatchReport) {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let samples = match self.prepare(path, &stem) {
            Ok((samples, output)) => {
                report.items.push(ItemReport {
                    input: path.to_path_buf(),
                    outcome: ItemOutcome::Reference { output },
                });
                samples
            }
            Err(error) => {
                warn!(input = %path.display(), %error, "skipping file");
                report.items.push(ItemReport {
                    input: path.to_path_buf(),
                    outcome: ItemOutcome::Failed {
                        bandwidth_hz: None,
                        error,
                    },
                });
                return;
            }
        };

        let outcomes: Vec<ItemOutcome> = thread::scope(|scope| {
            let handles: Vec<_> = self
                .job
                .bandwidths
                .iter()
                .map(|&bandwidth_hz| {
                    let samples = &samples;
                    let stem = &stem;
                    (
                        bandwidth_hz,
                        scope.spawn(move || self.filter_one(samples, stem, bandwidth_hz)),
                    )
                })
                .collect();

            handles
                .into_iter()
                .map(|(bandwidth_hz, handle)| {
                    handle
                        .join()
                        .unwrap_or(Err(BatchError::WorkerPanicked { bandwidth_hz }))
                        .unwrap_or_else(|error| ItemOutcome::Failed {
                            bandwidth_hz: Some(bandwidth_hz),
                            error,
                        })
                })
                .collect()
        });

        for outcome in outcomes {
            if let ItemOutcome::Failed {
                bandwidth_hz: Some(bandwidth_hz),
                error,
            } = &outcome
            {
                warn!(input = %path.display(), bandwidth_hz, %error, "bandwidth failed");
            }
            report.items.push(ItemReport {
                input: path.to_path_buf(),
                outcome,
            });
        }
    }

    /// Load, resample and write the reference copy
    fn prepare(&self, path: &Path, stem: &str) -> Result<(Vec<f64>, PathBuf), BatchError> {
        let audio = AudioBuffer::load(path)?;
        debug!(
            file = %path.display(),
            sample_rate = audio.sample_rate,
            duration_s = audio.duration(),
            "Loaded input"
        );
        let audio = self.resampler.resample(&audio, self.job.sample_rate)?;

        let output = self.job.output_folder.join(format!("{}_full.wav", stem));
        audio.save(&output)?;

        Ok((audio.samples, output))
    }

    fn filter_one(
        &self,
        samples: &[f64],
        stem: &str,
        bandwidth_hz: f64,
    ) -> Result<ItemOutcome, BatchError> {
        let outcome = self
            .engine
            .apply(samples, bandwidth_hz, self.job.sample_rate)?;

        let output = self
            .job
            .output_folder
            .join(format!("{}_{}.wav", stem, bandwidth_hz));
        save_wav(&output, &outcome.signal, self.job.sample_rate)?;

        Ok(ItemOutcome::Filtered {
            bandwidth_hz,
            output,
            status: outcome.status,
            iterations: outcome.iterations,
            center_hz: outcome.center_hz,
        })
    }
}
