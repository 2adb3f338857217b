//! Direct-form FIR convolution for short kernels
//!
//! Ring-buffer delay line, one multiply-accumulate per tap per sample.

use super::BlockFilter;

/// Direct convolution FIR filter
pub struct FirFilter {
    /// Filter coefficients h[n]
    coefficients: Vec<f64>,

    /// Delay line holding the last M input samples
    state_buffer: Vec<f64>,

    /// Current write position in the delay line
    cursor: usize,
}

impl FirFilter {
    /// Create a new FIR filter with given coefficients
    ///
    /// # Arguments
    /// * `coefficients` - Filter coefficients h[n] for n = 0..M-1 (non-empty)
    pub fn new(coefficients: Vec<f64>) -> Self {
        let state_buffer = vec![0.0; coefficients.len().max(1)];

        Self {
            coefficients,
            state_buffer,
            cursor: 0,
        }
    }

    /// Process single sample
    #[inline]
    pub fn process_sample(&mut self, input: f64) -> f64 {
        let length = self.state_buffer.len();
        self.state_buffer[self.cursor] = input;

        // y[n] = Σ h[k] * x[n-k]
        let output: f64 = self
            .coefficients
            .iter()
            .enumerate()
            .map(|(k, &coeff)| coeff * self.state_buffer[(self.cursor + length - k) % length])
            .sum();

        self.cursor = (self.cursor + 1) % length;

        output
    }

    /// Get filter coefficients
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Get filter length
    pub fn length(&self) -> usize {
        self.coefficients.len()
    }

    /// Get group delay (for linear phase Type I FIR)
    pub fn group_delay_samples(&self) -> usize {
        self.length().saturating_sub(1) / 2
    }
}

impl BlockFilter for FirFilter {
    fn process_block_inplace(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    fn reset(&mut self) {
        self.state_buffer.fill(0.0);
        self.cursor = 0;
    }

    fn latency(&self) -> usize {
        self.group_delay_samples()
    }
}
