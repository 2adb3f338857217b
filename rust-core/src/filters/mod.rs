//! Bandpass filter primitives consumed by the convergence engine

pub mod bandpass;
pub mod biquad;
pub mod design;
pub mod fast_fir;
pub mod fir;
pub mod windows;

pub use bandpass::{BandpassFilter, BiquadBandpass, FilterKind, FirBandpass};
pub use biquad::{Biquad, BiquadCoeffs};
pub use design::{design_bandpass_fir, design_fir, BandShape, FilterSpec};
pub use fast_fir::FastFirFilter;
pub use fir::FirFilter;
pub use windows::{generate_periodic_window, generate_window, WindowType};

/// Stateful block filter with in-place processing
pub trait BlockFilter {
    /// Process block in-place
    fn process_block_inplace(&mut self, buffer: &mut [f64]);

    /// Clear internal state
    fn reset(&mut self);

    /// Delay (in samples) between input and output
    fn latency(&self) -> usize {
        0
    }
}

/// Filter a finite signal from a clean state, compensating the filter latency
///
/// The input is extended with `latency()` zeros so the returned signal has
/// exactly the input length and is time-aligned with it.
pub fn filter_aligned<F: BlockFilter + ?Sized>(filter: &mut F, input: &[f64]) -> Vec<f64> {
    let delay = filter.latency();

    let mut buffer = Vec::with_capacity(input.len() + delay);
    buffer.extend_from_slice(input);
    buffer.resize(input.len() + delay, 0.0);

    filter.reset();
    filter.process_block_inplace(&mut buffer);
    buffer.drain(..delay);

    buffer
}
