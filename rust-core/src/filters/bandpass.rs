//! Offline bandpass primitives
//!
//! A [`BandpassFilter`] maps (signal, bandwidth, center, sample rate) to a
//! new signal of the same length. Implementations are pure: every call
//! starts from a clean filter state.

use super::biquad::Biquad;
use super::design::{design_fir, FilterSpec};
use super::fast_fir::FastFirFilter;
use super::fir::FirFilter;
use super::windows::WindowType;
use super::{filter_aligned, BlockFilter};
use serde::Deserialize;

/// Kernels longer than this use FFT convolution
pub const FAST_FIR_THRESHOLD: usize = 128;

/// Bandpass filter primitive
pub trait BandpassFilter {
    /// Filter `signal` with a band of `bandwidth_hz` centered on `center_hz`
    ///
    /// The output has the same length as the input.
    fn filter(&self, signal: &[f64], bandwidth_hz: f64, center_hz: f64, sample_rate: u32)
        -> Vec<f64>;
}

impl<T: BandpassFilter + ?Sized> BandpassFilter for &T {
    fn filter(
        &self,
        signal: &[f64],
        bandwidth_hz: f64,
        center_hz: f64,
        sample_rate: u32,
    ) -> Vec<f64> {
        (**self).filter(signal, bandwidth_hz, center_hz, sample_rate)
    }
}

/// Second-order IIR bandpass with unity gain at the center
#[derive(Debug, Clone, Copy, Default)]
pub struct BiquadBandpass;

impl BandpassFilter for BiquadBandpass {
    fn filter(
        &self,
        signal: &[f64],
        bandwidth_hz: f64,
        center_hz: f64,
        sample_rate: u32,
    ) -> Vec<f64> {
        let mut biquad = Biquad::bandpass(center_hz, bandwidth_hz, sample_rate as f64);
        filter_aligned(&mut biquad, signal)
    }
}

/// Linear-phase windowed-sinc bandpass
#[derive(Debug, Clone)]
pub struct FirBandpass {
    /// Design window
    pub window_type: WindowType,

    /// Width of each transition band in Hz (sets the kernel length)
    pub transition_hz: f64,

    /// Input block size for FFT convolution
    pub block_size: usize,
}

impl Default for FirBandpass {
    fn default() -> Self {
        Self {
            window_type: WindowType::Hamming,
            transition_hz: 100.0,
            block_size: 2048,
        }
    }
}

impl FirBandpass {
    /// Design the kernel for one band
    pub fn design(&self, bandwidth_hz: f64, center_hz: f64, sample_rate: u32) -> Vec<f64> {
        let spec = FilterSpec::from_hz(
            center_hz,
            bandwidth_hz,
            self.transition_hz,
            sample_rate as f64,
            self.window_type,
        );
        design_fir(&spec)
    }
}

impl BandpassFilter for FirBandpass {
    fn filter(
        &self,
        signal: &[f64],
        bandwidth_hz: f64,
        center_hz: f64,
        sample_rate: u32,
    ) -> Vec<f64> {
        let coeffs = self.design(bandwidth_hz, center_hz, sample_rate);

        // Choose implementation based on filter length
        let mut kernel: Box<dyn BlockFilter> = if coeffs.len() > FAST_FIR_THRESHOLD {
            Box::new(FastFirFilter::new(coeffs, self.block_size))
        } else {
            Box::new(FirFilter::new(coeffs))
        };

        filter_aligned(kernel.as_mut(), signal)
    }
}

/// Filter family selectable from job files and the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Second-order IIR ([`BiquadBandpass`])
    #[default]
    Biquad,
    /// Windowed-sinc FIR with default design parameters ([`FirBandpass`])
    Fir,
}

impl BandpassFilter for FilterKind {
    fn filter(
        &self,
        signal: &[f64],
        bandwidth_hz: f64,
        center_hz: f64,
        sample_rate: u32,
    ) -> Vec<f64> {
        match self {
            FilterKind::Biquad => {
                BiquadBandpass.filter(signal, bandwidth_hz, center_hz, sample_rate)
            }
            FilterKind::Fir => {
                FirBandpass::default().filter(signal, bandwidth_hz, center_hz, sample_rate)
            }
        }
    }
}
