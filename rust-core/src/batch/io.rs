//! WAV reading and writing

use super::BatchError;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;

/// Mono waveform with its sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Mono samples, nominally in [-1.0, 1.0]
    pub samples: Vec<f64>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioBuffer {
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, BatchError> {
        load_wav(path)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), BatchError> {
        save_wav(path, &self.samples, self.sample_rate)
    }
}

/// Load a WAV file, averaging channels down to mono
///
/// Integer PCM is scaled to [-1.0, 1.0).
pub fn load_wav<P: AsRef<Path>>(path: P) -> Result<AudioBuffer, BatchError> {
    let path = path.as_ref();
    let reader = WavReader::open(path).map_err(|e| BatchError::wav(path, e))?;

    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let samples: Vec<f64> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<Vec<f64>, _>>(),
        SampleFormat::Int => {
            let full_scale = (1i64 << (spec.bits_per_sample.max(1) - 1)) as f64;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f64 / full_scale))
                .collect::<Result<Vec<f64>, _>>()
        }
    }
    .map_err(|e| BatchError::wav(path, e))?;

    let mono = if channels > 1 {
        samples
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f64>() / channels as f64)
            .collect()
    } else {
        samples
    };

    Ok(AudioBuffer::new(mono, spec.sample_rate))
}

/// Write mono samples as a 32-bit float WAV
pub fn save_wav<P: AsRef<Path>>(
    path: P,
    samples: &[f64],
    sample_rate: u32,
) -> Result<(), BatchError> {
    let path = path.as_ref();
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec).map_err(|e| BatchError::wav(path, e))?;
    for &sample in samples {
        writer
            .write_sample(sample as f32)
            .map_err(|e| BatchError::wav(path, e))?;
    }
    writer.finalize().map_err(|e| BatchError::wav(path, e))
}
