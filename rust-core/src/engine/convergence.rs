//! Centroid-preserving bandpass search
//!
//! The engine measures the centroid of the input, then repeatedly filters the
//! input (never the previous output) with the candidate center frequency and
//! moves the candidate by `step_gain * (target - measured)` until the filtered
//! centroid matches the target within tolerance or the iteration budget runs
//! out.

use super::config::ConvergenceConfig;
use super::error::{CentroidError, MeasurementStage};
use crate::filters::{BandpassFilter, BiquadBandpass};
use crate::spectrum::{CentroidEstimator, StftCentroid};
use tracing::{debug, info, warn};

/// How a successful search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceStatus {
    /// |error| fell within tolerance
    Converged,
    /// Budget exhausted; the result is the best effort of the last iteration
    Exhausted,
}

/// One filtering pass of the search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationRecord {
    /// 1-based iteration index
    pub iteration: usize,
    pub center_hz: f64,
    pub measured_centroid_hz: f64,
    /// target - measured
    pub error_hz: f64,
}

/// Result of a search that stayed within the valid frequency range
#[derive(Debug, Clone)]
pub struct BandpassOutcome {
    /// Filtered signal of the last iteration, same length as the input
    pub signal: Vec<f64>,
    pub status: ConvergenceStatus,
    /// Number of filtering passes performed
    pub iterations: usize,
    /// Center frequency that produced `signal`
    pub center_hz: f64,
    pub target_centroid_hz: f64,
    pub measured_centroid_hz: f64,
    pub history: Vec<IterationRecord>,
}

impl BandpassOutcome {
    /// Final target - measured
    pub fn error_hz(&self) -> f64 {
        self.target_centroid_hz - self.measured_centroid_hz
    }

    pub fn is_converged(&self) -> bool {
        self.status == ConvergenceStatus::Converged
    }

    pub fn into_signal(self) -> Vec<f64> {
        self.signal
    }
}

/// Mutable search state, one per `apply` call
struct SearchState {
    target_centroid_hz: f64,
    candidate_center_hz: f64,
    iteration: usize,
    history: Vec<IterationRecord>,
}

impl SearchState {
    fn new(target_centroid_hz: f64) -> Self {
        Self {
            target_centroid_hz,
            // The input centroid is the first guess
            candidate_center_hz: target_centroid_hz,
            iteration: 0,
            history: Vec::new(),
        }
    }

    fn finish(self, signal: Vec<f64>, status: ConvergenceStatus) -> BandpassOutcome {
        let measured_centroid_hz = self
            .history
            .last()
            .map_or(f64::NAN, |record| record.measured_centroid_hz);

        BandpassOutcome {
            signal,
            status,
            iterations: self.iteration,
            center_hz: self.candidate_center_hz,
            target_centroid_hz: self.target_centroid_hz,
            measured_centroid_hz,
            history: self.history,
        }
    }
}

/// Bandpass filter whose center frequency is searched so that the output
/// keeps the spectral centroid of the input
///
/// Generic over the centroid estimator and the filter primitive; the default
/// pairing is the STFT centroid with the biquad bandpass. An engine holds no
/// per-call state, so one instance may serve many signals concurrently.
#[derive(Debug, Clone)]
pub struct CentroidBandpass<E = StftCentroid, F = BiquadBandpass> {
    estimator: E,
    filter: F,
    config: ConvergenceConfig,
}

impl Default for CentroidBandpass {
    fn default() -> Self {
        Self::new(ConvergenceConfig::default())
    }
}

impl CentroidBandpass {
    pub fn new(config: ConvergenceConfig) -> Self {
        Self::with_components(StftCentroid::default(), BiquadBandpass, config)
    }
}

impl<E: CentroidEstimator, F: BandpassFilter> CentroidBandpass<E, F> {
    pub fn with_components(estimator: E, filter: F, config: ConvergenceConfig) -> Self {
        Self {
            estimator,
            filter,
            config,
        }
    }

    pub fn config(&self) -> &ConvergenceConfig {
        &self.config
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }

    /// Centroid of an unfiltered signal
    pub fn measure_centroid(&self, signal: &[f64], sample_rate: u32) -> Result<f64, CentroidError> {
        if sample_rate == 0 {
            return Err(CentroidError::InvalidSampleRate);
        }

        let centroid = self.estimator.centroid(signal, sample_rate);
        if centroid.is_finite() {
            Ok(centroid)
        } else {
            Err(CentroidError::DegenerateSignal {
                stage: MeasurementStage::Input,
            })
        }
    }

    /// Bandpass `signal` with `bandwidth_hz`, searching the center frequency
    /// that preserves its spectral centroid
    ///
    /// # Errors
    /// * invalid bandwidth, sample rate or policy
    /// * [`CentroidError::DegenerateSignal`] when a centroid is undefined
    /// * [`CentroidError::DivergedBelowZero`] / [`CentroidError::DivergedAboveNyquist`]
    ///   when the next candidate leaves (0, Nyquist); such a candidate is never
    ///   handed to the filter
    pub fn apply(
        &self,
        signal: &[f64],
        bandwidth_hz: f64,
        sample_rate: u32,
    ) -> Result<BandpassOutcome, CentroidError> {
        self.config.validate()?;
        if !(bandwidth_hz.is_finite() && bandwidth_hz > 0.0) {
            return Err(CentroidError::InvalidBandwidth(bandwidth_hz));
        }

        let target = self.measure_centroid(signal, sample_rate)?;
        let nyquist_hz = sample_rate as f64 / 2.0;
        let mut state = SearchState::new(target);

        debug!(
            target_centroid_hz = target,
            bandwidth_hz,
            sample_rate,
            "starting centroid search"
        );

        check_candidate(target, 0, target, 0.0, nyquist_hz)?;

        loop {
            state.iteration += 1;
            let center_hz = state.candidate_center_hz;

            let filtered = self.filter.filter(signal, bandwidth_hz, center_hz, sample_rate);
            let measured = self.estimator.centroid(&filtered, sample_rate);
            if !measured.is_finite() {
                return Err(CentroidError::DegenerateSignal {
                    stage: MeasurementStage::Filtered {
                        iteration: state.iteration,
                        center_hz,
                    },
                });
            }

            let error_hz = target - measured;
            state.history.push(IterationRecord {
                iteration: state.iteration,
                center_hz,
                measured_centroid_hz: measured,
                error_hz,
            });

            debug!(
                iteration = state.iteration,
                center_hz,
                measured_centroid_hz = measured,
                error_hz,
                "intermediate centroid"
            );

            if error_hz.abs() <= self.config.tolerance_hz {
                info!(
                    iterations = state.iteration,
                    center_hz,
                    target_centroid_hz = target,
                    error_hz,
                    "centroid converged"
                );
                return Ok(state.finish(filtered, ConvergenceStatus::Converged));
            }

            if state.iteration >= self.config.max_iterations {
                warn!(
                    iterations = state.iteration,
                    center_hz,
                    target_centroid_hz = target,
                    error_hz,
                    "iteration budget exhausted, keeping last result"
                );
                return Ok(state.finish(filtered, ConvergenceStatus::Exhausted));
            }

            let next = center_hz + self.config.step_gain * error_hz;
            check_candidate(next, state.iteration + 1, center_hz, error_hz, nyquist_hz)?;
            state.candidate_center_hz = next;
        }
    }
}

/// Reject candidates outside (0, Nyquist)
fn check_candidate(
    candidate_hz: f64,
    iteration: usize,
    last_center_hz: f64,
    last_error_hz: f64,
    nyquist_hz: f64,
) -> Result<(), CentroidError> {
    if !(candidate_hz > 0.0) {
        return Err(CentroidError::DivergedBelowZero {
            iteration,
            candidate_hz,
            last_center_hz,
            last_error_hz,
        });
    }
    if candidate_hz >= nyquist_hz {
        return Err(CentroidError::DivergedAboveNyquist {
            iteration,
            candidate_hz,
            nyquist_hz,
            last_center_hz,
            last_error_hz,
        });
    }
    Ok(())
}

/// Bandpass with the default engine (STFT centroid, biquad, default policy)
pub fn apply_bandpass(
    signal: &[f64],
    bandwidth_hz: f64,
    sample_rate: u32,
) -> Result<BandpassOutcome, CentroidError> {
    CentroidBandpass::default().apply(signal, bandwidth_hz, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    const SR: u32 = 44100;
    const TARGET: f64 = 1000.0;

    /// Input is all ones; the mock filter writes the center into every sample,
    /// so the mock estimator can model the filtered centroid as a function of
    /// the center it was filtered with.
    struct ModelEstimator<M: Fn(f64) -> f64> {
        model: M,
    }

    impl<M: Fn(f64) -> f64> CentroidEstimator for ModelEstimator<M> {
        fn centroid(&self, signal: &[f64], _sample_rate: u32) -> f64 {
            match signal.first() {
                None => f64::NAN,
                Some(&x) if x == 1.0 => TARGET,
                Some(&center) => (self.model)(center),
            }
        }
    }

    #[derive(Default)]
    struct RecordingFilter {
        centers: RefCell<Vec<f64>>,
    }

    impl BandpassFilter for RecordingFilter {
        fn filter(&self, signal: &[f64], _bw: f64, center_hz: f64, _sr: u32) -> Vec<f64> {
            self.centers.borrow_mut().push(center_hz);
            vec![center_hz; signal.len()]
        }
    }

    fn engine<M: Fn(f64) -> f64>(
        model: M,
        config: ConvergenceConfig,
    ) -> CentroidBandpass<ModelEstimator<M>, RecordingFilter> {
        CentroidBandpass::with_components(
            ModelEstimator { model },
            RecordingFilter::default(),
            config,
        )
    }

    fn input() -> Vec<f64> {
        vec![1.0; 16]
    }

    #[test]
    fn test_converges_on_offset_model() {
        // Filtering pulls the centroid up by 50 Hz
        let engine = engine(|center| center + 50.0, ConvergenceConfig::default());
        let outcome = engine.apply(&input(), 200.0, SR).unwrap();

        assert!(outcome.is_converged());
        assert_eq!(outcome.iterations, 2);
        assert_eq!(outcome.center_hz, 950.0);
        assert_eq!(outcome.error_hz(), 0.0);
        assert_eq!(outcome.signal.len(), 16);
        assert_eq!(*engine.filter().centers.borrow(), vec![1000.0, 950.0]);
    }

    #[test]
    fn test_first_guess_is_input_centroid() {
        let engine = engine(|center| center, ConvergenceConfig::default());
        let outcome = engine.apply(&input(), 200.0, SR).unwrap();

        assert_eq!(outcome.iterations, 1);
        assert_eq!(outcome.center_hz, TARGET);
        assert_eq!(outcome.history[0].center_hz, TARGET);
    }

    #[test]
    fn test_budget_exhausted_returns_best_effort() {
        // Error halves every pass: 100, 50, 25, ...
        let config = ConvergenceConfig {
            max_iterations: 5,
            ..ConvergenceConfig::default()
        };
        let engine = engine(|center| 0.5 * center + 600.0, config);
        let outcome = engine.apply(&input(), 200.0, SR).unwrap();

        assert_eq!(outcome.status, ConvergenceStatus::Exhausted);
        assert!(!outcome.is_converged());
        assert_eq!(outcome.iterations, 5);
        assert_eq!(outcome.history.len(), 5);
        assert_eq!(outcome.error_hz(), -6.25);
        // Signal of the last iteration, not of any earlier one
        assert_eq!(outcome.signal[0], outcome.center_hz);
        assert_eq!(outcome.center_hz, outcome.history[4].center_hz);
    }

    #[test]
    fn test_same_model_converges_with_default_budget() {
        let engine = engine(|center| 0.5 * center + 600.0, ConvergenceConfig::default());
        let outcome = engine.apply(&input(), 200.0, SR).unwrap();

        assert!(outcome.is_converged());
        assert_eq!(outcome.iterations, 10);
        assert!(outcome.error_hz().abs() <= 0.2);
    }

    #[test]
    fn test_unbounded_budget_converges() {
        let config = ConvergenceConfig {
            max_iterations: usize::MAX,
            ..ConvergenceConfig::default()
        };
        let engine = engine(|center| center + 50.0, config);
        let outcome = engine.apply(&input(), 200.0, SR).unwrap();

        assert!(outcome.is_converged());
        assert_eq!(outcome.iterations, 2);
    }

    #[test]
    fn test_iterations_never_exceed_budget() {
        for max_iterations in 1..8 {
            let config = ConvergenceConfig {
                max_iterations,
                ..ConvergenceConfig::default()
            };
            let engine = engine(|center| 0.5 * center + 600.0, config);
            let outcome = engine.apply(&input(), 200.0, SR).unwrap();

            assert!(outcome.iterations <= max_iterations);
            assert_eq!(engine.filter().centers.borrow().len(), outcome.iterations);
        }
    }

    #[test]
    fn test_divergence_below_zero_never_reaches_filter() {
        // 1000 -> measured 2500 -> next candidate -500
        let engine = engine(|center| 2.0 * center + 500.0, ConvergenceConfig::default());
        let err = engine.apply(&input(), 200.0, SR).unwrap_err();

        assert_eq!(
            err,
            CentroidError::DivergedBelowZero {
                iteration: 2,
                candidate_hz: -500.0,
                last_center_hz: 1000.0,
                last_error_hz: -1500.0,
            }
        );
        assert!(err.is_divergence());
        assert!(engine.filter().centers.borrow().iter().all(|&c| c > 0.0));
    }

    #[test]
    fn test_divergence_above_nyquist() {
        let engine = engine(|center| center - 30000.0, ConvergenceConfig::default());
        let err = engine.apply(&input(), 200.0, SR).unwrap_err();

        assert!(matches!(
            err,
            CentroidError::DivergedAboveNyquist {
                iteration: 2,
                nyquist_hz,
                ..
            } if nyquist_hz == 22050.0
        ));
        assert_eq!(engine.filter().centers.borrow().len(), 1);
    }

    #[test]
    fn test_degenerate_input_skips_filtering() {
        let filter = RecordingFilter::default();
        let engine = CentroidBandpass::with_components(
            StftCentroid::default(),
            &filter,
            ConvergenceConfig::default(),
        );

        let err = engine.apply(&vec![0.0; 4096], 200.0, SR).unwrap_err();
        assert_eq!(
            err,
            CentroidError::DegenerateSignal {
                stage: MeasurementStage::Input
            }
        );
        assert!(filter.centers.borrow().is_empty());
    }

    #[test]
    fn test_degenerate_filtered_output() {
        let engine = engine(|_| f64::NAN, ConvergenceConfig::default());
        let err = engine.apply(&input(), 200.0, SR).unwrap_err();

        assert_eq!(
            err,
            CentroidError::DegenerateSignal {
                stage: MeasurementStage::Filtered {
                    iteration: 1,
                    center_hz: TARGET
                }
            }
        );
    }

    #[test]
    fn test_rejects_invalid_arguments() {
        let engine = engine(|center| center, ConvergenceConfig::default());

        for bandwidth in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                engine.apply(&input(), bandwidth, SR),
                Err(CentroidError::InvalidBandwidth(_))
            ));
        }
        assert_eq!(
            engine.apply(&input(), 200.0, 0).unwrap_err(),
            CentroidError::InvalidSampleRate
        );

        let no_gain = ConvergenceConfig {
            step_gain: 0.0,
            ..ConvergenceConfig::default()
        };
        let stalled = CentroidBandpass::with_components(
            ModelEstimator {
                model: |center: f64| center,
            },
            RecordingFilter::default(),
            no_gain,
        );
        assert!(matches!(
            stalled.apply(&input(), 200.0, SR),
            Err(CentroidError::InvalidStepGain(_))
        ));
        assert!(engine.filter().centers.borrow().is_empty());
        assert!(stalled.filter().centers.borrow().is_empty());
    }

    #[test]
    fn test_step_gain_damps_correction() {
        let engine = engine(|center| center + 50.0, ConvergenceConfig::damped());
        let outcome = engine.apply(&input(), 200.0, SR).unwrap();

        let centers = engine.filter().centers.borrow();
        assert_eq!(centers[1], 990.0);
        assert!(outcome.is_converged());
        assert!(outcome.iterations > 2);
    }

    #[test]
    fn test_engine_is_reusable() {
        let engine = engine(|center| center + 50.0, ConvergenceConfig::default());
        let first = engine.apply(&input(), 200.0, SR).unwrap();
        let second = engine.apply(&input(), 200.0, SR).unwrap();

        assert_eq!(first.center_hz, second.center_hz);
        assert_eq!(first.iterations, second.iterations);
    }
}
