//! DSP (Digital Signal Processing) module
//!
//! Signal processing stages of the liveness pipeline:
//! - `TemporalNormalizer` - EMA lighting normalization (per session)
//! - `SignalConditioner` - detrend + heart-rate band restriction
//! - `SpectrumAnalyzer` - windowed FFT, dominant in-band bin, SNR
//! - `find_peaks` / `peak_intervals` - beat detection
//! - `stats` - mean / variance helpers shared by the gate

mod filters;
mod peaks;
mod spectrum;
pub mod stats;
mod temporal_norm;

pub use filters::{centered_moving_average, detrend, FilterConfig, SignalConditioner};
pub use peaks::{find_peaks, peak_intervals};
pub use spectrum::{hamming_window, SpectralPeak, SpectrumAnalyzer};
pub use temporal_norm::TemporalNormalizer;
