//! Beat detection on conditioned pulse windows.

use ndarray::Array1;

use super::stats;

/// Local maxima strictly above both neighbours and above `mean + k * std`.
///
/// Peaks closer than `min_distance` samples are merged, keeping the taller one.
pub fn find_peaks(signal: &Array1<f32>, k_std: f32, min_distance: usize) -> Vec<usize> {
    let n = signal.len();
    if n < 3 {
        return Vec::new();
    }

    let threshold = stats::mean(signal) + k_std * stats::std_dev(signal);
    let mut peaks: Vec<usize> = Vec::new();

    for i in 1..n - 1 {
        let v = signal[i];
        if v > threshold && v > signal[i - 1] && v > signal[i + 1] {
            if let Some(last) = peaks.last_mut() {
                if i - *last < min_distance {
                    if v > signal[*last] {
                        *last = i;
                    }
                    continue;
                }
            }
            peaks.push(i);
        }
    }

    peaks
}

/// Frame distances between consecutive peaks.
pub fn peak_intervals(peaks: &[usize]) -> Vec<f32> {
    peaks.windows(2).map(|w| (w[1] - w[0]) as f32).collect()
}
