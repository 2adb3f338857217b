//! Sample-rate conversion using rubato

use super::{AudioBuffer, BatchError};
use rubato::{
    Resampler as RubatoResampler, SincFixedIn, SincInterpolationParameters,
    SincInterpolationType, WindowFunction,
};
use tracing::debug;

/// Band-limited sinc resampler
///
/// `SincFixedIn` output starts aligned with its input, so the first
/// `round(len * ratio)` output frames are kept as they are.
#[derive(Debug, Clone)]
pub struct Resampler {
    /// Input frames per processing call
    pub chunk_size: usize,
    /// Sinc kernel length in input samples
    pub sinc_len: usize,
}

impl Default for Resampler {
    fn default() -> Self {
        Self {
            chunk_size: 1024,
            sinc_len: 128,
        }
    }
}

impl Resampler {
    pub fn resample(
        &self,
        audio: &AudioBuffer,
        target_rate: u32,
    ) -> Result<AudioBuffer, BatchError> {
        if target_rate == 0 {
            return Err(BatchError::InvalidJob(
                "target sample rate must be positive".into(),
            ));
        }
        if audio.sample_rate == target_rate || audio.is_empty() {
            return Ok(AudioBuffer::new(audio.samples.clone(), target_rate));
        }

        let ratio = target_rate as f64 / audio.sample_rate as f64;
        let params = SincInterpolationParameters {
            sinc_len: self.sinc_len,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: 128,
            window: WindowFunction::BlackmanHarris2,
        };
        let mut resampler = SincFixedIn::<f64>::new(ratio, 1.0, params, self.chunk_size, 1)?;

        let target_len = (audio.len() as f64 * ratio).round() as usize;
        debug!(
            from = audio.sample_rate,
            to = target_rate,
            target_len,
            "resampling"
        );

        let mut output = self.process_chunks(&mut resampler, &audio.samples, target_len)?;
        output.truncate(target_len);

        Ok(AudioBuffer::new(output, target_rate))
    }

    /// Feed zero-padded chunks until `needed` output frames exist
    fn process_chunks<R: RubatoResampler<f64>>(
        &self,
        resampler: &mut R,
        samples: &[f64],
        needed: usize,
    ) -> Result<Vec<f64>, BatchError> {
        let mut output = Vec::with_capacity(needed + self.chunk_size);
        let mut pos = 0;

        while output.len() < needed {
            let mut chunk = vec![0.0; self.chunk_size];
            if pos < samples.len() {
                let end = (pos + self.chunk_size).min(samples.len());
                chunk[..end - pos].copy_from_slice(&samples[pos..end]);
            }

            let result = resampler.process(&vec![chunk], None)?;
            if let Some(channel) = result.first() {
                output.extend_from_slice(channel);
            }

            pos += self.chunk_size;
        }

        Ok(output)
    }
}

/// Resample with the default settings
pub fn resample(audio: &AudioBuffer, target_rate: u32) -> Result<AudioBuffer, BatchError> {
    Resampler::default().resample(audio, target_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::spectral_centroid;
    use std::f64::consts::PI;

    fn sine(freq: f64, sample_rate: u32, len: usize) -> Vec<f64> {
        (0..len)
            .map(|n| (2.0 * PI * freq * n as f64 / sample_rate as f64).sin())
            .collect()
    }

    #[test]
    fn test_same_rate_is_identity() {
        let audio = AudioBuffer::new(vec![0.1, 0.2, 0.3], 44100);
        let result = resample(&audio, 44100).unwrap();
        assert_eq!(result, audio);
    }

    #[test]
    fn test_output_length() {
        let down = resample(&AudioBuffer::new(vec![0.0; 4410], 44100), 22050).unwrap();
        assert_eq!(down.sample_rate, 22050);
        assert_eq!(down.len(), 2205);

        let up = resample(&AudioBuffer::new(vec![0.0; 1600], 16000), 44100).unwrap();
        assert_eq!(up.len(), 4410);
    }

    /// Index of the largest sample after resampling a smooth click
    /// centered on input sample 4800
    fn click_peak(from: u32, to: u32) -> usize {
        let mut samples = vec![0.0; 9600];
        for i in 0..=64 {
            samples[4768 + i] = 0.5 - 0.5 * (2.0 * PI * i as f64 / 64.0).cos();
        }

        let result = resample(&AudioBuffer::new(samples, from), to).unwrap();
        result
            .samples
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .map(|(i, _)| i)
            .unwrap()
    }

    #[test]
    fn test_downsampled_click_stays_in_place() {
        let peak = click_peak(48000, 24000);
        assert!((peak as i64 - 2400).abs() <= 2, "peak at {}", peak);
    }

    #[test]
    fn test_upsampled_click_stays_in_place() {
        // 4800 * 44100 / 16000
        let peak = click_peak(16000, 44100);
        assert!((peak as i64 - 13230).abs() <= 3, "peak at {}", peak);
    }

    #[test]
    fn test_tone_survives_resampling() {
        let audio = AudioBuffer::new(sine(1000.0, 48000, 48000), 48000);
        let result = resample(&audio, 44100).unwrap();

        let centroid = spectral_centroid(&result.samples, 44100);
        assert!((centroid - 1000.0).abs() < 20.0, "centroid {}", centroid);
    }

    #[test]
    fn test_rejects_zero_rate() {
        assert!(resample(&AudioBuffer::new(vec![0.0; 10], 44100), 0).is_err());
    }
}
