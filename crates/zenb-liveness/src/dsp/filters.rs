//! Band restriction for pulse signals.
//!
//! Detrend, then a centered local-mean subtraction (high-pass at the lower
//! heart-rate bound) followed by a short centered moving average (low-pass
//! near the upper bound). Both windows are zero-phase, so beat timing is not
//! shifted, and both are truncated at the buffer edges.

use ndarray::Array1;

/// Configuration for the heart-rate band filter
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    pub sample_rate: f32,
    pub min_freq: f32, // Hz (0.67 Hz = 40 BPM)
    pub max_freq: f32, // Hz (2.33 Hz = 140 BPM)
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            sample_rate: 30.0,
            min_freq: 40.0 / 60.0,
            max_freq: 140.0 / 60.0,
        }
    }
}

/// Detrend + band-restricting filter.
#[derive(Debug, Clone)]
pub struct SignalConditioner {
    /// Half-width of the local-mean (high-pass) window
    trend_half: usize,
    /// Half-width of the smoothing (low-pass) window, 0 disables smoothing
    smooth_half: usize,
}

impl SignalConditioner {
    pub fn new(config: &FilterConfig) -> Self {
        let trend_window = (config.sample_rate / config.min_freq.max(1e-3)).round() as usize;
        let smooth_window = (config.sample_rate / (2.0 * config.max_freq.max(1e-3))).round() as usize;
        Self {
            trend_half: trend_window / 2,
            smooth_half: if smooth_window > 1 { smooth_window / 2 } else { 0 },
        }
    }

    /// Effective (odd) local-mean window length in samples.
    pub fn trend_window(&self) -> usize {
        2 * self.trend_half + 1
    }

    /// Effective smoothing window length in samples (1 = disabled).
    pub fn smooth_window(&self) -> usize {
        2 * self.smooth_half + 1
    }

    /// Condition a pulse buffer. Output has the same length as the input.
    pub fn condition(&self, signal: &Array1<f32>) -> Array1<f32> {
        if signal.len() < 2 {
            return detrend(signal);
        }

        let detrended = detrend(signal);
        let local_mean = centered_moving_average(&detrended, self.trend_half);
        let high_passed = &detrended - &local_mean;

        if self.smooth_half == 0 {
            high_passed
        } else {
            centered_moving_average(&high_passed, self.smooth_half)
        }
    }
}

impl Default for SignalConditioner {
    fn default() -> Self {
        Self::new(&FilterConfig::default())
    }
}

/// Detrend signal (remove mean)
pub fn detrend(signal: &Array1<f32>) -> Array1<f32> {
    let mean = signal.mean().unwrap_or(0.0);
    signal.mapv(|x| x - mean)
}

/// Centered moving average over `[i - half, i + half]`, truncated at the edges.
///
/// Uses a prefix sum, O(n) regardless of window size.
pub fn centered_moving_average(signal: &Array1<f32>, half: usize) -> Array1<f32> {
    let n = signal.len();
    if n == 0 || half == 0 {
        return signal.clone();
    }

    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0f64);
    let mut acc = 0.0f64;
    for &x in signal.iter() {
        acc += x as f64;
        prefix.push(acc);
    }

    let mut out = Array1::zeros(n);
    for i in 0..n {
        let start = i.saturating_sub(half);
        let end = (i + half + 1).min(n);
        out[i] = ((prefix[end] - prefix[start]) / (end - start) as f64) as f32;
    }
    out
}
