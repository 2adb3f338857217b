//! Framing and windowing for short-time spectral analysis

/// Number of analysis frames for a signal of `signal_len` samples
///
/// Frames lie entirely inside the signal; a non-empty signal shorter than
/// one frame still yields a single (zero-padded) frame.
pub fn frame_count(signal_len: usize, frame_len: usize, hop: usize) -> usize {
    if signal_len == 0 {
        0
    } else if signal_len <= frame_len {
        1
    } else {
        1 + (signal_len - frame_len) / hop
    }
}

/// Extract a windowed frame starting at `start`
///
/// # Arguments
/// * `signal` - Long signal
/// * `start` - Index of the first sample of the frame
/// * `window` - Window coefficients; their length is the frame length
///
/// # Returns
/// Windowed frame, zero-padded where it runs past the end of the signal
pub fn extract_windowed_frame(signal: &[f64], start: usize, window: &[f64]) -> Vec<f64> {
    let start = start.min(signal.len());
    let end = (start + window.len()).min(signal.len());

    let mut frame = vec![0.0; window.len()];
    frame[..end - start].copy_from_slice(&signal[start..end]);

    for (s, w) in frame.iter_mut().zip(window.iter()) {
        *s *= w;
    }

    frame
}

/// Zero-pad `pad` samples on both sides (centered framing)
pub fn pad_both_sides(signal: &[f64], pad: usize) -> Vec<f64> {
    let mut padded = vec![0.0; signal.len() + 2 * pad];
    padded[pad..pad + signal.len()].copy_from_slice(signal);
    padded
}
