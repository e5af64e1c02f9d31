//! Temporal Normalization
//!
//! Divides each raw colour sample by a per-channel exponential moving average,
//! turning absolute intensities into lighting-invariant ratios around 1.0.
//! Slow illumination drift is absorbed by the average; pulse-scale variation
//! survives in the ratio.
//!
//! # Cold start
//!
//! The first sample seeds the average directly. Starting from zero would make
//! the first ratios divide by (nearly) zero.

/// Per-channel EMA normalizer. Holds the running-average state of one session.
#[derive(Debug, Clone)]
pub struct TemporalNormalizer {
    alpha: f32,
    average: Option<[f32; 3]>,
}

impl TemporalNormalizer {
    /// # Arguments
    /// * `alpha` - EMA smoothing factor in (0, 1], e.g. 0.1
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha,
            average: None,
        }
    }

    /// Fold one raw sample into the running average and return its normalized ratios.
    ///
    /// A channel whose average is exactly zero yields 0 instead of a division by zero.
    pub fn update(&mut self, rgb: [f32; 3]) -> [f32; 3] {
        let avg = match self.average {
            None => rgb,
            Some(prev) => {
                let mut next = prev;
                for c in 0..3 {
                    next[c] = self.alpha * rgb[c] + (1.0 - self.alpha) * prev[c];
                }
                next
            }
        };
        self.average = Some(avg);

        let mut out = [0.0f32; 3];
        for c in 0..3 {
            out[c] = if avg[c] == 0.0 { 0.0 } else { rgb[c] / avg[c] };
        }
        out
    }

    /// Current running average, `None` before the first sample.
    pub fn running_average(&self) -> Option<[f32; 3]> {
        self.average
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn reset(&mut self) {
        self.average = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_sample_seeds_average() {
        let mut norm = TemporalNormalizer::new(0.1);
        assert!(norm.running_average().is_none());

        let out = norm.update([100.0, 150.0, 50.0]);
        assert_eq!(norm.running_average(), Some([100.0, 150.0, 50.0]));
        for v in out {
            assert_relative_eq!(v, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_ema_update() {
        let mut norm = TemporalNormalizer::new(0.1);
        norm.update([100.0, 100.0, 100.0]);
        let out = norm.update([110.0, 100.0, 90.0]);

        let avg = norm.running_average().unwrap();
        assert_relative_eq!(avg[0], 101.0, epsilon = 1e-4);
        assert_relative_eq!(avg[2], 99.0, epsilon = 1e-4);
        assert_relative_eq!(out[0], 110.0 / 101.0, epsilon = 1e-5);
        assert_relative_eq!(out[1], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_first_sample_stays_finite() {
        let mut norm = TemporalNormalizer::new(0.1);
        let first = norm.update([0.0, 0.0, 0.0]);
        assert_eq!(first, [0.0, 0.0, 0.0]);

        for i in 0..200 {
            let out = norm.update([120.0, 128.0 + (i as f32 * 0.2).sin(), 100.0]);
            assert!(out.iter().all(|v| v.is_finite()), "non-finite at {}", i);
        }
    }

    #[test]
    fn test_single_zero_channel() {
        let mut norm = TemporalNormalizer::new(0.1);
        let out = norm.update([0.0, 128.0, 100.0]);
        assert_eq!(out[0], 0.0);
        let out = norm.update([0.0, 128.0, 100.0]);
        assert_eq!(out[0], 0.0);
        assert_relative_eq!(out[1], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_reset_clears_average() {
        let mut norm = TemporalNormalizer::new(0.1);
        norm.update([10.0, 20.0, 30.0]);
        norm.reset();
        assert!(norm.running_average().is_none());
        let out = norm.update([50.0, 50.0, 50.0]);
        assert_relative_eq!(out[0], 1.0, epsilon = 1e-6);
    }
}
