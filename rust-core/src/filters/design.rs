//! FIR filter design using the windowing method
//!
//! Band edges are given in normalized frequency (units of π rad/sample).
//! A bandpass whose edges fall outside [0, 1] collapses to the matching
//! lowpass, highpass or pass-through design.

use super::windows::{generate_window, WindowType};
use std::f64::consts::PI;

/// Shape actually realised by a [`FilterSpec`] after clamping its edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandShape {
    Bandpass,
    Lowpass,
    Highpass,
    Passthrough,
}

/// Filter specifications for windowed-sinc FIR design
#[derive(Debug, Clone)]
pub struct FilterSpec {
    /// Lower cutoff (normalized frequency, units of π rad/sample)
    pub omega_c1: f64,

    /// Upper cutoff (normalized frequency, units of π rad/sample)
    pub omega_c2: f64,

    /// Transition width (radians)
    pub delta_omega: f64,

    /// Window type
    pub window_type: WindowType,
}

impl FilterSpec {
    /// Create bandpass spec from normalized cutoffs, clamped to [0, 1]
    pub fn bandpass(
        omega_c1: f64,
        omega_c2: f64,
        delta_omega: f64,
        window_type: WindowType,
    ) -> Self {
        Self {
            omega_c1: omega_c1.clamp(0.0, 1.0),
            omega_c2: omega_c2.clamp(0.0, 1.0),
            delta_omega,
            window_type,
        }
    }

    /// Create bandpass spec from a center frequency and bandwidth in Hz
    ///
    /// # Arguments
    /// * `center_hz` - Band center
    /// * `bandwidth_hz` - Distance between the two cutoffs
    /// * `transition_hz` - Width of each transition band
    /// * `sample_rate` - Sample rate in Hz
    /// * `window_type` - Design window
    pub fn from_hz(
        center_hz: f64,
        bandwidth_hz: f64,
        transition_hz: f64,
        sample_rate: f64,
        window_type: WindowType,
    ) -> Self {
        let nyquist = sample_rate / 2.0;
        let half_band = bandwidth_hz / 2.0;

        Self::bandpass(
            (center_hz - half_band) / nyquist,
            (center_hz + half_band) / nyquist,
            PI * transition_hz / nyquist,
            window_type,
        )
    }

    /// Shape realised by the clamped cutoffs
    pub fn shape(&self) -> BandShape {
        match (self.omega_c1 <= 0.0, self.omega_c2 >= 1.0) {
            (true, true) => BandShape::Passthrough,
            (true, false) => BandShape::Lowpass,
            (false, true) => BandShape::Highpass,
            (false, false) => BandShape::Bandpass,
        }
    }

    /// Cutoff frequencies (normalized, units of π)
    pub fn cutoff_frequencies(&self) -> (f64, f64) {
        (self.omega_c1, self.omega_c2)
    }
}

/// Design the FIR kernel for the shape the clamped cutoffs realise
pub fn design_fir(spec: &FilterSpec) -> Vec<f64> {
    match spec.shape() {
        BandShape::Bandpass => design_bandpass_fir(spec),
        BandShape::Lowpass => design_lowpass_fir(spec.omega_c2, spec.delta_omega, spec.window_type),
        BandShape::Highpass => {
            design_highpass_fir(spec.omega_c1, spec.delta_omega, spec.window_type)
        }
        BandShape::Passthrough => vec![1.0],
    }
}

/// Design a bandpass FIR filter using the windowing method
///
/// # Algorithm
/// 1. Calculate ideal impulse response using sinc functions
/// 2. Generate window of appropriate length
/// 3. Multiply ideal response by window to get filter coefficients
///
/// # Returns
/// Vector of filter coefficients h[n] for n = 0..M-1
pub fn design_bandpass_fir(spec: &FilterSpec) -> Vec<f64> {
    let m = spec.window_type.calculate_filter_length(spec.delta_omega);

    let (wc1, wc2) = spec.cutoff_frequencies();
    let wc1_rad = wc1 * PI;
    let wc2_rad = wc2 * PI;

    let window = generate_window(spec.window_type, m);

    // h_ideal[n] = (sin(wc2*n) - sin(wc1*n)) / (π*n)
    // Center tap (n = 0): (wc2 - wc1) / π
    let center = (m - 1) as f64 / 2.0;

    window
        .iter()
        .enumerate()
        .map(|(n, &w)| {
            let n_shifted = n as f64 - center;

            let h_ideal = if n_shifted.abs() < 1e-10 {
                (wc2_rad - wc1_rad) / PI
            } else {
                ((wc2_rad * n_shifted).sin() - (wc1_rad * n_shifted).sin()) / (PI * n_shifted)
            };

            h_ideal * w
        })
        .collect()
}

/// Design a lowpass FIR filter
pub fn design_lowpass_fir(cutoff: f64, delta_omega: f64, window_type: WindowType) -> Vec<f64> {
    let m = window_type.calculate_filter_length(delta_omega);
    let window = generate_window(window_type, m);
    let wc_rad = cutoff * PI;

    let center = (m - 1) as f64 / 2.0;

    window
        .iter()
        .enumerate()
        .map(|(n, &w)| {
            let n_shifted = n as f64 - center;

            let h_ideal = if n_shifted.abs() < 1e-10 {
                wc_rad / PI
            } else {
                (wc_rad * n_shifted).sin() / (PI * n_shifted)
            };

            h_ideal * w
        })
        .collect()
}

/// Design a highpass FIR filter
pub fn design_highpass_fir(cutoff: f64, delta_omega: f64, window_type: WindowType) -> Vec<f64> {
    let m = window_type.calculate_filter_length(delta_omega);
    let window = generate_window(window_type, m);
    let wc_rad = cutoff * PI;

    let center = (m - 1) as f64 / 2.0;

    window
        .iter()
        .enumerate()
        .map(|(n, &w)| {
            let n_shifted = n as f64 - center;

            // Highpass = impulse - lowpass
            let h_ideal = if n_shifted.abs() < 1e-10 {
                1.0 - wc_rad / PI
            } else {
                -((wc_rad * n_shifted).sin() / (PI * n_shifted))
            };

            h_ideal * w
        })
        .collect()
}
