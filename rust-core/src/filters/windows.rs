//! Window functions for FIR bandpass design and short-time spectral analysis
//!
//! Symmetric windows shape FIR kernels, periodic windows frame the STFT
//! used by the centroid estimator.

use std::f64::consts::PI;

/// Longest kernel [`WindowType::calculate_filter_length`] returns (odd)
pub const MAX_FILTER_LENGTH: usize = (1 << 18) - 1;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowType {
    /// Hann window: w[n] = 0.5 - 0.5*cos(2πn/(M-1))
    /// Mainlobe width: 8π/M, Sidelobe attenuation: ~44 dB
    Hann,

    /// Hamming window: w[n] = 0.54 - 0.46*cos(2πn/(M-1))
    /// Mainlobe width: 8π/M, Sidelobe attenuation: ~53 dB
    #[default]
    Hamming,

    /// Blackman window: w[n] = 0.42 - 0.5*cos(2πn/(M-1)) + 0.08*cos(4πn/(M-1))
    /// Mainlobe width: 12π/M, Sidelobe attenuation: ~74 dB
    Blackman,

    /// Rectangular window (no windowing)
    Rectangular,
}

impl WindowType {
    /// Calculate required filter length M for given transition width
    /// Based on Table 7.1 from Oppenheim & Schafer
    ///
    /// # Arguments
    /// * `delta_omega` - Transition width in radians
    ///
    /// # Returns
    /// Filter length M (odd number for Type I linear phase), at most
    /// [`MAX_FILTER_LENGTH`]. Zero, negative or NaN widths get the maximum.
    pub fn calculate_filter_length(&self, delta_omega: f64) -> usize {
        if !(delta_omega > 0.0) {
            return MAX_FILTER_LENGTH;
        }
        let m = (self.mainlobe_width_factor() * PI / delta_omega)
            .ceil()
            .min(MAX_FILTER_LENGTH as f64) as usize;

        // Type I FIR: odd length keeps an integer group delay
        if m % 2 == 0 {
            m + 1
        } else {
            m
        }
    }

    /// Get mainlobe width factor (mainlobe width = factor * π / M)
    pub fn mainlobe_width_factor(&self) -> f64 {
        match self {
            WindowType::Hann => 8.0,
            WindowType::Hamming => 8.0,
            WindowType::Blackman => 12.0,
            WindowType::Rectangular => 4.0,
        }
    }
}

/// Evaluate the window shape at `n` for a cosine-sum period of `denom` samples
fn window_value(window_type: WindowType, n: usize, denom: f64) -> f64 {
    let angle = 2.0 * PI * n as f64 / denom;
    match window_type {
        WindowType::Hann => 0.5 - 0.5 * angle.cos(),
        WindowType::Hamming => 0.54 - 0.46 * angle.cos(),
        WindowType::Blackman => 0.42 - 0.5 * angle.cos() + 0.08 * (2.0 * angle).cos(),
        WindowType::Rectangular => 1.0,
    }
}

/// Generate symmetric window coefficients (filter design)
///
/// # Arguments
/// * `window_type` - Type of window function
/// * `length` - Number of samples (M)
///
/// # Returns
/// Vector of window coefficients w[n] for n = 0..M-1
pub fn generate_window(window_type: WindowType, length: usize) -> Vec<f64> {
    if length == 1 {
        return vec![1.0];
    }

    let denom = (length - 1) as f64;
    (0..length)
        .map(|n| window_value(window_type, n, denom))
        .collect()
}

/// Generate periodic window coefficients (spectral analysis)
///
/// Same shape as [`generate_window`] of length M+1 with the last sample
/// dropped, so consecutive frames overlap-add without a seam.
pub fn generate_periodic_window(window_type: WindowType, length: usize) -> Vec<f64> {
    let denom = length as f64;
    (0..length)
        .map(|n| window_value(window_type, n, denom))
        .collect()
}
