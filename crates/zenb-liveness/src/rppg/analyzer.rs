//! Heart-rate frequency estimation
//!
//! Two strategies over the same conditioned window:
//! - **Peak interval**: mean frame distance between detected beats
//! - **Spectral**: dominant DFT bin inside the heart-rate band
//!
//! SNR always comes from the spectrum, whichever strategy supplies the BPM.
//! When neither strategy yields a rate, the strongest component of the whole
//! spectrum is reported so a slow or fast oscillation can still be named.

use ndarray::Array1;

use crate::config::{AnalyzerStrategy, LivenessConfig};
use crate::dsp::{find_peaks, peak_intervals, SpectrumAnalyzer};

/// Output of one frequency analysis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequencyEstimate {
    /// `None` when fewer than two beats (or band bins) were detectable
    pub bpm: Option<f32>,
    pub snr: f32,
    /// Indices of detected beats in the analysed window
    pub peaks: Vec<usize>,
    /// Beat-to-beat distances in frames
    pub intervals: Vec<f32>,
    /// In-band power spectrum (diagnostics)
    pub band_power: Vec<f32>,
    /// Strongest component anywhere below Nyquist; only set when `bpm` is `None`
    pub dominant: Option<DominantComponent>,
}

/// Strongest spectral component of a window, in or out of the heart-rate band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DominantComponent {
    pub frequency_hz: f32,
    /// Peak bin power over the mean of every other non-DC bin
    pub concentration: f32,
}

impl DominantComponent {
    pub fn bpm(&self) -> f32 {
        self.frequency_hz * 60.0
    }
}

#[derive(Clone)]
pub struct FrequencyAnalyzer {
    strategy: AnalyzerStrategy,
    sample_rate: f32,
    min_freq: f32,
    max_freq: f32,
    peak_k_std: f32,
    min_peak_distance: usize,
    spectrum: SpectrumAnalyzer,
}

impl FrequencyAnalyzer {
    pub fn new(config: &LivenessConfig) -> Self {
        let sample_rate = config.sampling.sample_rate_hz;
        let max_freq = config.max_freq_hz();
        Self {
            strategy: config.analyzer.strategy,
            sample_rate,
            min_freq: config.min_freq_hz(),
            max_freq,
            peak_k_std: config.analyzer.peak_k_std,
            // Two beats cannot be closer than one period of the fastest valid rate
            min_peak_distance: ((sample_rate / max_freq).floor() as usize).max(1),
            spectrum: SpectrumAnalyzer::new(sample_rate, config.buffer_capacity()),
        }
    }

    pub fn strategy(&self) -> AnalyzerStrategy {
        self.strategy
    }

    pub fn min_peak_distance(&self) -> usize {
        self.min_peak_distance
    }

    /// Estimate heart rate and SNR from a conditioned window.
    pub fn analyze(&self, conditioned: &Array1<f32>) -> FrequencyEstimate {
        let peaks = find_peaks(conditioned, self.peak_k_std, self.min_peak_distance);
        let intervals = peak_intervals(&peaks);
        let n = conditioned.len();
        let power = self.spectrum.power_spectrum(conditioned);
        let spectral = self
            .spectrum
            .peak_in(&power, n, self.min_freq, self.max_freq);

        let bpm = match self.strategy {
            AnalyzerStrategy::PeakInterval => self.interval_bpm(&intervals),
            AnalyzerStrategy::Spectral => spectral.as_ref().map(|p| p.frequency_hz * 60.0),
        };

        let dominant = if bpm.is_none() {
            self.spectrum
                .peak_in(&power, n, 0.0, self.sample_rate / 2.0)
                .map(|p| DominantComponent {
                    frequency_hz: p.frequency_hz,
                    concentration: p.snr,
                })
        } else {
            None
        };

        let (snr, band_power) = match spectral {
            Some(peak) => (peak.snr, peak.band_power),
            None => (0.0, Vec::new()),
        };

        FrequencyEstimate {
            bpm,
            snr,
            peaks,
            intervals,
            band_power,
            dominant,
        }
    }

    fn interval_bpm(&self, intervals: &[f32]) -> Option<f32> {
        if intervals.is_empty() {
            return None;
        }
        let mean_interval = intervals.iter().sum::<f32>() / intervals.len() as f32;
        if mean_interval <= 0.0 {
            return None;
        }
        Some(self.sample_rate / mean_interval * 60.0)
    }
}
