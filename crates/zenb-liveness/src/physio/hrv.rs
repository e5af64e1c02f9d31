//! Heart-rate variability from beat intervals.

/// RMSSD-based HRV of one analysis window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HrvMetrics {
    pub mean_ibi_ms: f32,
    /// Root mean square of successive interval differences
    pub rmssd_ms: f32,
    /// RMSSD / mean interval, clipped to [0, 1]
    pub normalized: f32,
}

/// Compute HRV from beat-to-beat intervals given in frames.
///
/// Returns `None` with fewer than two intervals (no successive difference exists).
pub fn hrv_from_intervals(intervals_frames: &[f32], sample_rate: f32) -> Option<HrvMetrics> {
    if intervals_frames.len() < 2 || sample_rate <= 0.0 {
        return None;
    }

    let ibi_ms: Vec<f32> = intervals_frames
        .iter()
        .map(|f| f / sample_rate * 1000.0)
        .collect();
    let mean_ibi = ibi_ms.iter().sum::<f32>() / ibi_ms.len() as f32;

    let mut diffsq_sum = 0.0f32;
    let mut cnt = 0usize;
    for w in ibi_ms.windows(2) {
        let d = w[1] - w[0];
        diffsq_sum += d * d;
        cnt += 1;
    }
    let rmssd = (diffsq_sum / cnt as f32).sqrt();

    let normalized = if mean_ibi > 0.0 {
        (rmssd / mean_ibi).clamp(0.0, 1.0)
    } else {
        0.0
    };

    Some(HrvMetrics {
        mean_ibi_ms: mean_ibi,
        rmssd_ms: rmssd,
        normalized,
    })
}
