//! Real-input magnitude spectra via realfft

use num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// Magnitude spectrum of fixed-size real frames
///
/// Owns the FFT plan, its scratch buffers and the bin frequencies for one
/// sample rate, so repeated frames allocate nothing.
pub struct FftEngine {
    r2c: Arc<dyn RealToComplex<f64>>,
    input: Vec<f64>,
    spectrum: Vec<Complex<f64>>,
    magnitudes: Vec<f64>,
    frequencies_hz: Vec<f64>,
}

impl FftEngine {
    pub fn new(fft_size: usize, sample_rate: u32) -> Self {
        let r2c = RealFftPlanner::<f64>::new().plan_fft_forward(fft_size);
        let input = r2c.make_input_vec();
        let spectrum = r2c.make_output_vec();

        let bin_width = sample_rate as f64 / fft_size as f64;
        let frequencies_hz = (0..spectrum.len()).map(|k| k as f64 * bin_width).collect();

        Self {
            magnitudes: vec![0.0; spectrum.len()],
            r2c,
            input,
            spectrum,
            frequencies_hz,
        }
    }

    /// |X[k]| for k = 0..=fft_size/2
    ///
    /// Short frames are zero-padded, long ones truncated.
    pub fn magnitudes(&mut self, frame: &[f64]) -> &[f64] {
        let n = frame.len().min(self.input.len());
        self.input[..n].copy_from_slice(&frame[..n]);
        self.input[n..].fill(0.0);

        // Buffers come from the plan itself, so lengths always match
        self.r2c
            .process(&mut self.input, &mut self.spectrum)
            .expect("FFT processing failed");

        for (mag, bin) in self.magnitudes.iter_mut().zip(&self.spectrum) {
            *mag = bin.norm();
        }
        &self.magnitudes
    }

    /// Center frequency of every bin in Hz
    pub fn frequencies_hz(&self) -> &[f64] {
        &self.frequencies_hz
    }

    pub fn fft_size(&self) -> usize {
        self.input.len()
    }

    pub fn num_bins(&self) -> usize {
        self.spectrum.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_bin_frequencies() {
        let engine = FftEngine::new(2048, 44100);
        let freqs = engine.frequencies_hz();

        assert_eq!(engine.num_bins(), 1025);
        assert_eq!(freqs[0], 0.0);
        assert!((freqs[1] - 44100.0 / 2048.0).abs() < 1e-9);
        assert!((freqs[1024] - 22050.0).abs() < 1e-9);
    }

    #[test]
    fn test_tone_lands_in_its_bin() {
        let mut engine = FftEngine::new(1024, 8000);
        // 1000 Hz is exactly bin 128
        let frame: Vec<f64> = (0..1024)
            .map(|n| (2.0 * PI * 1000.0 * n as f64 / 8000.0).cos())
            .collect();

        let mags = engine.magnitudes(&frame);
        let peak = mags
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .map(|(k, _)| k)
            .unwrap();

        assert_eq!(peak, 128);
        assert!((mags[128] - 512.0).abs() < 1e-6);
    }

    #[test]
    fn test_stale_samples_are_cleared() {
        let mut engine = FftEngine::new(64, 64);
        engine.magnitudes(&[1.0; 64]);

        // A lone impulse has a flat spectrum
        let mags = engine.magnitudes(&[1.0]);
        assert!(mags.iter().all(|&m| (m - 1.0).abs() < 1e-12));
    }
}
