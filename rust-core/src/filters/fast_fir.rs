//! FFT-based fast convolution for long FIR filters
//!
//! Overlap-add with frequency-domain multiplication:
//! O(N log N) per block instead of O(N*M) for direct convolution.

use super::BlockFilter;
use num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// FFT-based FIR filter for long impulse responses
pub struct FastFirFilter {
    /// Filter coefficients in frequency domain
    h_fft: Vec<Complex<f64>>,

    /// FFT size (power of 2, >= block_size + filter_length - 1)
    fft_size: usize,

    /// Maximum input block size
    block_size: usize,

    /// Filter length
    filter_length: usize,

    /// Convolution tail carried into the next block
    overlap: Vec<f64>,

    fft: Arc<dyn Fft<f64>>,
    ifft: Arc<dyn Fft<f64>>,

    /// Reusable frequency-domain buffer
    work_buffer: Vec<Complex<f64>>,
}

impl FastFirFilter {
    /// Create new FFT-based filter
    ///
    /// # Arguments
    /// * `coefficients` - Filter coefficients h[n] (non-empty)
    /// * `block_size` - Input block size (e.g., 2048)
    pub fn new(coefficients: Vec<f64>, block_size: usize) -> Self {
        let filter_length = coefficients.len().max(1);
        let block_size = block_size.max(1);
        let fft_size = (block_size + filter_length - 1).next_power_of_two();

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        let ifft = planner.plan_fft_inverse(fft_size);

        let mut h_fft = vec![Complex::new(0.0, 0.0); fft_size];
        for (slot, &coeff) in h_fft.iter_mut().zip(coefficients.iter()) {
            *slot = Complex::new(coeff, 0.0);
        }
        fft.process(&mut h_fft);

        Self {
            h_fft,
            fft_size,
            block_size,
            filter_length,
            overlap: vec![0.0; filter_length - 1],
            fft,
            ifft,
            work_buffer: vec![Complex::new(0.0, 0.0); fft_size],
        }
    }

    /// Convolve one chunk (len <= block_size) in place
    fn process_chunk(&mut self, chunk: &mut [f64]) {
        let n = chunk.len();

        for (slot, &x) in self.work_buffer.iter_mut().zip(chunk.iter()) {
            *slot = Complex::new(x, 0.0);
        }
        self.work_buffer[n..].fill(Complex::new(0.0, 0.0));

        self.fft.process(&mut self.work_buffer);
        for (x, h) in self.work_buffer.iter_mut().zip(self.h_fft.iter()) {
            *x *= h;
        }
        self.ifft.process(&mut self.work_buffer);

        let scale = 1.0 / self.fft_size as f64;
        let tail_len = self.filter_length - 1;

        for (i, sample) in chunk.iter_mut().enumerate() {
            let carried = self.overlap.get(i).copied().unwrap_or(0.0);
            *sample = self.work_buffer[i].re * scale + carried;
        }

        // New tail: this chunk's spill plus whatever of the old tail the chunk did not consume
        let next_overlap: Vec<f64> = (0..tail_len)
            .map(|i| {
                let spill = self.work_buffer[n + i].re * scale;
                let leftover = self.overlap.get(n + i).copied().unwrap_or(0.0);
                spill + leftover
            })
            .collect();
        self.overlap = next_overlap;
    }

    /// Get filter length
    pub fn filter_length(&self) -> usize {
        self.filter_length
    }

    /// Get block size
    pub fn block_size(&self) -> usize {
        self.block_size
    }
}

impl BlockFilter for FastFirFilter {
    fn process_block_inplace(&mut self, buffer: &mut [f64]) {
        let block_size = self.block_size;
        for chunk in buffer.chunks_mut(block_size) {
            self.process_chunk(chunk);
        }
    }

    fn reset(&mut self) {
        self.overlap.fill(0.0);
    }

    fn latency(&self) -> usize {
        (self.filter_length - 1) / 2
    }
}
