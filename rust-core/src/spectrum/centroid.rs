//! Spectral centroid estimation
//!
//! Short-time analysis: the signal is cut into windowed frames, each frame's
//! magnitude spectrum yields one amplitude-weighted mean frequency, and the
//! centroid of the signal is the mean over all frames that carry energy.

use super::fft::FftEngine;
use super::windowing::{extract_windowed_frame, frame_count, pad_both_sides};
use crate::filters::windows::{generate_periodic_window, WindowType};

/// Frames whose magnitude sum is at or below this are treated as silence
pub const SILENCE_FLOOR: f64 = 1e-10;

/// Spectral centroid estimator
///
/// Must be a pure function of its inputs. Degenerate input (empty, silent or
/// non-finite) yields NaN.
pub trait CentroidEstimator {
    /// Centroid of `signal` in Hz
    fn centroid(&self, signal: &[f64], sample_rate: u32) -> f64;
}

impl<T: CentroidEstimator + ?Sized> CentroidEstimator for &T {
    fn centroid(&self, signal: &[f64], sample_rate: u32) -> f64 {
        (**self).centroid(signal, sample_rate)
    }
}

/// Short-time analysis configuration
#[derive(Debug, Clone)]
pub struct StftConfig {
    /// Frame length and FFT size in samples
    pub fft_size: usize,

    /// Distance between frame starts in samples
    pub hop_size: usize,

    /// Analysis window (periodic)
    pub window_type: WindowType,

    /// Pad fft_size/2 zeros on both sides so frames are centered on hops
    pub center: bool,
}

impl Default for StftConfig {
    fn default() -> Self {
        Self {
            fft_size: 2048,
            hop_size: 512,
            window_type: WindowType::Hann,
            center: false,
        }
    }
}

/// Mean per-frame spectral centroid
#[derive(Debug, Clone)]
pub struct StftCentroid {
    config: StftConfig,
    window: Vec<f64>,
}

impl Default for StftCentroid {
    fn default() -> Self {
        Self::new(StftConfig::default())
    }
}

impl StftCentroid {
    /// Create estimator; zero sizes are raised to 1
    pub fn new(mut config: StftConfig) -> Self {
        config.fft_size = config.fft_size.max(1);
        config.hop_size = config.hop_size.max(1);
        let window = generate_periodic_window(config.window_type, config.fft_size);

        Self { config, window }
    }

    pub fn config(&self) -> &StftConfig {
        &self.config
    }

    /// Centroid of every non-silent frame, in frame order
    pub fn frame_centroids(&self, signal: &[f64], sample_rate: u32) -> Vec<f64> {
        let padded;
        let signal = if self.config.center && !signal.is_empty() {
            padded = pad_both_sides(signal, self.config.fft_size / 2);
            &padded[..]
        } else {
            signal
        };

        let mut fft = FftEngine::new(self.config.fft_size, sample_rate);
        let freqs = fft.frequencies_hz().to_vec();
        let frames = frame_count(signal.len(), self.config.fft_size, self.config.hop_size);

        (0..frames)
            .filter_map(|index| {
                let frame =
                    extract_windowed_frame(signal, index * self.config.hop_size, &self.window);
                magnitude_centroid(fft.magnitudes(&frame), &freqs)
            })
            .collect()
    }
}

impl CentroidEstimator for StftCentroid {
    fn centroid(&self, signal: &[f64], sample_rate: u32) -> f64 {
        if signal.iter().any(|x| !x.is_finite()) {
            return f64::NAN;
        }

        let centroids = self.frame_centroids(signal, sample_rate);
        if centroids.is_empty() {
            return f64::NAN;
        }

        centroids.iter().sum::<f64>() / centroids.len() as f64
    }
}

/// Amplitude-weighted mean frequency of one magnitude spectrum
///
/// `None` for a silent spectrum.
pub fn magnitude_centroid(magnitudes: &[f64], freqs_hz: &[f64]) -> Option<f64> {
    let magnitude_sum: f64 = magnitudes.iter().sum();
    if !(magnitude_sum > SILENCE_FLOOR) {
        return None;
    }

    let weighted: f64 = magnitudes
        .iter()
        .zip(freqs_hz.iter())
        .map(|(&m, &f)| m * f)
        .sum();

    Some(weighted / magnitude_sum)
}

/// Centroid with the default analysis settings
pub fn spectral_centroid(signal: &[f64], sample_rate: u32) -> f64 {
    StftCentroid::default().centroid(signal, sample_rate)
}
