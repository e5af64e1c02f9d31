//! Spectral analysis of conditioned pulse windows.
//!
//! Hamming-windowed FFT power spectrum, dominant-bin search restricted to the
//! heart-rate band, and a linear SNR of that bin against the rest of the band.

use ndarray::Array1;
use num_complex::Complex32;
use rustfft::{Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

/// Dominant in-band spectral component.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralPeak {
    /// Peak frequency after parabolic sub-bin refinement (Hz)
    pub frequency_hz: f32,
    pub bin: usize,
    /// Peak bin power / mean power of the other in-band bins (0 if undefined)
    pub snr: f32,
    /// Power of each bin in `[first_bin, last_bin]`
    pub band_power: Vec<f32>,
    pub first_bin: usize,
}

/// Spectrum analyzer planned for a fixed window length.
///
/// The FFT plan is built once; windows of any other length are planned on demand.
#[derive(Clone)]
pub struct SpectrumAnalyzer {
    sample_rate: f32,
    len: usize,
    fft: Arc<dyn Fft<f32>>,
    window: Array1<f32>,
}

impl SpectrumAnalyzer {
    pub fn new(sample_rate: f32, len: usize) -> Self {
        let len = len.max(1);
        let mut planner = FftPlanner::new();
        Self {
            sample_rate,
            len,
            fft: planner.plan_fft_forward(len),
            window: hamming_window(len),
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Power spectrum of the positive-frequency half (`n / 2` bins).
    pub fn power_spectrum(&self, signal: &Array1<f32>) -> Vec<f32> {
        let n = signal.len();
        if n < 2 {
            return Vec::new();
        }

        let adhoc;
        let (fft, window) = if n == self.len {
            (&self.fft, &self.window)
        } else {
            let mut planner = FftPlanner::new();
            adhoc = (planner.plan_fft_forward(n), hamming_window(n));
            (&adhoc.0, &adhoc.1)
        };

        let mut buffer: Vec<Complex32> = signal
            .iter()
            .zip(window.iter())
            .map(|(s, w)| Complex32::new(s * w, 0.0))
            .collect();
        fft.process(&mut buffer);

        buffer.iter().take(n / 2).map(|c| c.norm_sqr()).collect()
    }

    /// Find the dominant bin within `[min_freq, max_freq]`.
    ///
    /// Returns `None` when fewer than two bins fall inside the band or the band
    /// carries no power.
    pub fn band_peak(&self, signal: &Array1<f32>, min_freq: f32, max_freq: f32) -> Option<SpectralPeak> {
        if signal.len() < 4 {
            return None;
        }
        self.peak_in(&self.power_spectrum(signal), signal.len(), min_freq, max_freq)
    }

    /// [`Self::band_peak`] over an already computed power spectrum of an `n`-sample window.
    pub fn peak_in(&self, power: &[f32], n: usize, min_freq: f32, max_freq: f32) -> Option<SpectralPeak> {
        if n < 4 || self.sample_rate <= 0.0 {
            return None;
        }

        let half_n = power.len();
        let bin_res = self.sample_rate / n as f32;

        let first_bin = (min_freq / bin_res).ceil().max(1.0) as usize;
        let last_bin = ((max_freq / bin_res).floor() as usize).min(half_n.saturating_sub(1));
        if last_bin <= first_bin {
            return None;
        }

        let band = &power[first_bin..=last_bin];
        let (offset, &peak_power) = band
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))?;
        if peak_power <= 0.0 {
            return None;
        }
        let peak_bin = first_bin + offset;

        let others = band.len() - 1;
        let noise_mean = (band.iter().sum::<f32>() - peak_power) / others as f32;
        let snr = if noise_mean > 0.0 { peak_power / noise_mean } else { 0.0 };

        let refined = refine_peak(power, peak_bin);

        Some(SpectralPeak {
            frequency_hz: refined * bin_res,
            bin: peak_bin,
            snr,
            band_power: band.to_vec(),
            first_bin,
        })
    }
}

/// Create Hamming window for FFT
pub fn hamming_window(size: usize) -> Array1<f32> {
    if size < 2 {
        return Array1::ones(size);
    }
    let mut window = Array1::zeros(size);
    for i in 0..size {
        window[i] = 0.54 - 0.46 * ((2.0 * PI * i as f32) / ((size - 1) as f32)).cos();
    }
    window
}

/// Parabolic interpolation for sub-bin accuracy.
fn refine_peak(power: &[f32], peak_bin: usize) -> f32 {
    if peak_bin == 0 || peak_bin + 1 >= power.len() {
        return peak_bin as f32;
    }
    let y_m1 = power[peak_bin - 1];
    let y_0 = power[peak_bin];
    let y_p1 = power[peak_bin + 1];
    let denom = y_m1 - 2.0 * y_0 + y_p1;
    if denom.abs() > 1e-12 {
        let delta = 0.5 * (y_m1 - y_p1) / denom;
        if delta.is_finite() && delta.abs() <= 1.0 {
            return peak_bin as f32 + delta;
        }
    }
    peak_bin as f32
}
