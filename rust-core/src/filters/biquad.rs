//! Second-order IIR bandpass
//!
//! Allpass-based design: H(z) = (1 - A(z)) / 2 with a second-order allpass
//! A(z) whose phase crosses -π at the center frequency. Peak gain is exactly
//! 0 dB at the center; the -3 dB points sit `bandwidth` Hz apart.

use super::BlockFilter;
use std::f64::consts::PI;

/// Normalized biquad coefficients (a0 = 1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    /// Feedback coefficient a1 (negated in the difference equation)
    pub a1: f64,
    /// Feedback coefficient a2 (negated in the difference equation)
    pub a2: f64,
}

impl BiquadCoeffs {
    /// Pass-through coefficients
    pub const fn unity() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
        }
    }

    /// Design a bandpass section
    ///
    /// # Arguments
    /// * `center_hz` - Center frequency (0 < fc < fs/2)
    /// * `bandwidth_hz` - -3 dB bandwidth; at or above Nyquist the section is unity
    /// * `sample_rate` - Sample rate in Hz
    pub fn bandpass(center_hz: f64, bandwidth_hz: f64, sample_rate: f64) -> Self {
        if bandwidth_hz >= sample_rate / 2.0 {
            return Self::unity();
        }

        let t = (PI * bandwidth_hz / sample_rate).tan();
        let c = (t - 1.0) / (t + 1.0);
        let d = -(2.0 * PI * center_hz / sample_rate).cos();
        let gain = (1.0 + c) / 2.0;

        Self {
            b0: gain,
            b1: 0.0,
            b2: -gain,
            a1: d * (1.0 - c),
            a2: -c,
        }
    }
}

/// Biquad filter state (Direct Form II Transposed)
#[derive(Debug, Clone)]
pub struct Biquad {
    coeffs: BiquadCoeffs,
    z1: f64,
    z2: f64,
}

impl Biquad {
    pub fn new(coeffs: BiquadCoeffs) -> Self {
        Self {
            coeffs,
            z1: 0.0,
            z2: 0.0,
        }
    }

    /// Create a bandpass section
    pub fn bandpass(center_hz: f64, bandwidth_hz: f64, sample_rate: f64) -> Self {
        Self::new(BiquadCoeffs::bandpass(center_hz, bandwidth_hz, sample_rate))
    }

    /// Process a single sample
    #[inline]
    pub fn process_sample(&mut self, input: f64) -> f64 {
        let c = &self.coeffs;
        let output = c.b0 * input + self.z1;
        self.z1 = c.b1 * input - c.a1 * output + self.z2;
        self.z2 = c.b2 * input - c.a2 * output;
        output
    }

    pub fn coeffs(&self) -> &BiquadCoeffs {
        &self.coeffs
    }
}

impl BlockFilter for Biquad {
    fn process_block_inplace(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }
}
