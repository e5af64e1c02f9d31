//! Descriptive statistics over signal windows.
//!
//! All functions return 0.0 for empty input instead of NaN.

use ndarray::Array1;

#[inline]
pub fn mean(signal: &Array1<f32>) -> f32 {
    signal.mean().unwrap_or(0.0)
}

/// Population variance
pub fn variance(signal: &Array1<f32>) -> f32 {
    let mean = mean(signal);
    signal.mapv(|x| (x - mean).powi(2)).mean().unwrap_or(0.0)
}

/// Population standard deviation
pub fn std_dev(signal: &Array1<f32>) -> f32 {
    variance(signal).sqrt()
}

/// Population standard deviation of any finite sequence (used on ring-buffer histories).
pub fn std_dev_of<'a, I>(values: I) -> f32
where
    I: IntoIterator<Item = &'a f32>,
    I::IntoIter: Clone,
{
    let iter = values.into_iter();
    let mut n = 0usize;
    let mut sum = 0.0f32;
    for v in iter.clone() {
        sum += v;
        n += 1;
    }
    if n == 0 {
        return 0.0;
    }
    let mean = sum / n as f32;
    let var = iter.map(|v| (v - mean).powi(2)).sum::<f32>() / n as f32;
    var.sqrt()
}

/// Mean absolute deviation about the mean.
pub fn mean_abs_deviation(signal: &Array1<f32>) -> f32 {
    let mean = mean(signal);
    signal.mapv(|x| (x - mean).abs()).mean().unwrap_or(0.0)
}

/// Mean of |x[i] - x[i-1]|.
pub fn mean_abs_successive_diff(signal: &Array1<f32>) -> f32 {
    let n = signal.len();
    if n < 2 {
        return 0.0;
    }
    let total: f32 = signal
        .iter()
        .zip(signal.iter().skip(1))
        .map(|(a, b)| (b - a).abs())
        .sum();
    total / (n - 1) as f32
}
