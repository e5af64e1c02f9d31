//! Liveness engine configuration.
//!
//! Every threshold the gate uses is empirical and uncalibrated; all of them are
//! exposed here so a deployment can tune them against labeled live/spoof captures.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::dsp::FilterConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LivenessConfig {
    pub sampling: SamplingConfig,
    pub normalizer: NormalizerConfig,
    pub band: BandConfig,
    pub analyzer: AnalyzerConfig,
    pub gate: GateConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Frame rate of the colour samples (Hz)
    pub sample_rate_hz: f32,
    /// Analysis window length (seconds)
    pub window_sec: f32,
    /// Longest recording a buffered session keeps (seconds)
    pub max_recording_sec: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// EMA smoothing factor for the per-channel running average
    pub ema_alpha: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandConfig {
    pub min_bpm: f32,
    pub max_bpm: f32,
}

/// Frequency estimation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyzerStrategy {
    /// Mean distance between detected beats
    PeakInterval,
    /// Dominant in-band DFT bin
    Spectral,
}

impl Default for AnalyzerStrategy {
    fn default() -> Self {
        Self::PeakInterval
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub strategy: AnalyzerStrategy,
    /// Peak amplitude threshold = mean + k * std
    pub peak_k_std: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Pulse-buffer variance below this is a static (photo) signal
    pub static_variance_threshold: f32,
    /// Mean |Δx| / mean |x - mean| above this is an erratic (noise) signal
    pub erratic_ratio_threshold: f32,
    /// Normalized RMSSD floor; 0 disables the "too regular" check
    pub hrv_min: f32,
    /// Normalized RMSSD ceiling
    pub hrv_max: f32,
    /// Resting rate that scores full BPM confidence
    pub typical_bpm: f32,
    /// SNR (linear) that scores full SNR confidence
    pub snr_reference: f32,
    pub weight_bpm: f32,
    pub weight_snr: f32,
    pub weight_hrv: f32,
    /// Whole-spectrum concentration above which a window with too few beats
    /// is reported at its dominant rate
    pub periodic_concentration_min: f32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 30.0,
            window_sec: 5.0,
            max_recording_sec: 60.0,
        }
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self { ema_alpha: 0.1 }
    }
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            min_bpm: 40.0,
            max_bpm: 140.0,
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            strategy: AnalyzerStrategy::PeakInterval,
            peak_k_std: 1.0,
        }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            static_variance_threshold: 1e-6,
            erratic_ratio_threshold: 0.95,
            hrv_min: 0.0,
            hrv_max: 0.3,
            typical_bpm: 72.0,
            snr_reference: 10.0,
            weight_bpm: 0.3,
            weight_snr: 0.4,
            weight_hrv: 0.3,
            periodic_concentration_min: 60.0,
        }
    }
}

impl LivenessConfig {
    /// Parse and validate a TOML document. Missing sections fall back to defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: LivenessConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration with environment variable overrides
    /// Environment variables are prefixed with ZENB_LIVENESS_
    /// Example: ZENB_LIVENESS_HRV_MAX=0.25
    pub fn from_file_with_env<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        env_override("ZENB_LIVENESS_SAMPLE_RATE_HZ", &mut self.sampling.sample_rate_hz)?;
        env_override("ZENB_LIVENESS_WINDOW_SEC", &mut self.sampling.window_sec)?;
        env_override(
            "ZENB_LIVENESS_MAX_RECORDING_SEC",
            &mut self.sampling.max_recording_sec,
        )?;
        env_override("ZENB_LIVENESS_EMA_ALPHA", &mut self.normalizer.ema_alpha)?;
        env_override("ZENB_LIVENESS_MIN_BPM", &mut self.band.min_bpm)?;
        env_override("ZENB_LIVENESS_MAX_BPM", &mut self.band.max_bpm)?;
        env_override(
            "ZENB_LIVENESS_STATIC_VARIANCE_THRESHOLD",
            &mut self.gate.static_variance_threshold,
        )?;
        env_override(
            "ZENB_LIVENESS_ERRATIC_RATIO_THRESHOLD",
            &mut self.gate.erratic_ratio_threshold,
        )?;
        env_override("ZENB_LIVENESS_HRV_MIN", &mut self.gate.hrv_min)?;
        env_override("ZENB_LIVENESS_HRV_MAX", &mut self.gate.hrv_max)?;
        env_override(
            "ZENB_LIVENESS_PERIODIC_CONCENTRATION_MIN",
            &mut self.gate.periodic_concentration_min,
        )?;

        if let Ok(val) = std::env::var("ZENB_LIVENESS_STRATEGY") {
            self.analyzer.strategy = match val.to_ascii_lowercase().as_str() {
                "peak_interval" => AnalyzerStrategy::PeakInterval,
                "spectral" => AnalyzerStrategy::Spectral,
                _ => {
                    return Err(ConfigError::Validation(
                        "Invalid ZENB_LIVENESS_STRATEGY".to_string(),
                    ))
                }
            };
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // NaN passes every ordered comparison below
        if let Some(name) = self.non_finite_field() {
            return Err(ConfigError::Validation(format!("{} must be finite", name)));
        }

        let s = &self.sampling;
        if !(s.sample_rate_hz > 0.0) {
            return Err(ConfigError::Validation(
                "sampling.sample_rate_hz must be positive".to_string(),
            ));
        }
        if !(s.window_sec > 0.0) {
            return Err(ConfigError::Validation(
                "sampling.window_sec must be positive".to_string(),
            ));
        }
        if self.buffer_capacity() < 3 {
            return Err(ConfigError::Validation(
                "sampling window must hold at least 3 samples".to_string(),
            ));
        }
        if s.max_recording_sec < s.window_sec {
            return Err(ConfigError::Validation(
                "sampling.max_recording_sec must be at least window_sec".to_string(),
            ));
        }

        let alpha = self.normalizer.ema_alpha;
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(ConfigError::Validation(
                "normalizer.ema_alpha must be in (0, 1]".to_string(),
            ));
        }

        let band = &self.band;
        if !(band.min_bpm > 0.0) || band.min_bpm >= band.max_bpm {
            return Err(ConfigError::Validation(
                "band.min_bpm must be in (0, max_bpm)".to_string(),
            ));
        }
        if band.max_bpm / 60.0 >= s.sample_rate_hz / 2.0 {
            return Err(ConfigError::Validation(
                "band.max_bpm must be below the Nyquist rate".to_string(),
            ));
        }

        if self.analyzer.peak_k_std < 0.0 {
            return Err(ConfigError::Validation(
                "analyzer.peak_k_std must be non-negative".to_string(),
            ));
        }

        let g = &self.gate;
        if g.static_variance_threshold < 0.0 || g.erratic_ratio_threshold <= 0.0 {
            return Err(ConfigError::Validation(
                "gate signal thresholds must be positive".to_string(),
            ));
        }
        if g.hrv_min < 0.0 || g.hrv_max > 1.0 || g.hrv_min > g.hrv_max {
            return Err(ConfigError::Validation(
                "gate.hrv_min/hrv_max must satisfy 0 <= hrv_min <= hrv_max <= 1".to_string(),
            ));
        }
        if !(g.typical_bpm > 0.0) || !(g.snr_reference > 0.0) {
            return Err(ConfigError::Validation(
                "gate.typical_bpm and gate.snr_reference must be positive".to_string(),
            ));
        }
        if !(g.periodic_concentration_min > 0.0) {
            return Err(ConfigError::Validation(
                "gate.periodic_concentration_min must be positive".to_string(),
            ));
        }
        let weights = [g.weight_bpm, g.weight_snr, g.weight_hrv];
        if weights.iter().any(|w| *w < 0.0) || weights.iter().sum::<f32>() <= 0.0 {
            return Err(ConfigError::Validation(
                "gate confidence weights must be non-negative with a positive sum".to_string(),
            ));
        }

        Ok(())
    }

    fn non_finite_field(&self) -> Option<&'static str> {
        let (s, g) = (&self.sampling, &self.gate);
        [
            ("sampling.sample_rate_hz", s.sample_rate_hz),
            ("sampling.window_sec", s.window_sec),
            ("sampling.max_recording_sec", s.max_recording_sec),
            ("normalizer.ema_alpha", self.normalizer.ema_alpha),
            ("band.min_bpm", self.band.min_bpm),
            ("band.max_bpm", self.band.max_bpm),
            ("analyzer.peak_k_std", self.analyzer.peak_k_std),
            ("gate.static_variance_threshold", g.static_variance_threshold),
            ("gate.erratic_ratio_threshold", g.erratic_ratio_threshold),
            ("gate.hrv_min", g.hrv_min),
            ("gate.hrv_max", g.hrv_max),
            ("gate.typical_bpm", g.typical_bpm),
            ("gate.snr_reference", g.snr_reference),
            ("gate.weight_bpm", g.weight_bpm),
            ("gate.weight_snr", g.weight_snr),
            ("gate.weight_hrv", g.weight_hrv),
            ("gate.periodic_concentration_min", g.periodic_concentration_min),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite())
        .map(|(name, _)| name)
    }

    /// Signal buffer capacity: sample rate x analysis window.
    pub fn buffer_capacity(&self) -> usize {
        (self.sampling.sample_rate_hz * self.sampling.window_sec).round().max(0.0) as usize
    }

    /// Samples a buffered session records before it stops accepting more.
    pub fn max_recorded_samples(&self) -> usize {
        (self.sampling.sample_rate_hz * self.sampling.max_recording_sec)
            .round()
            .max(0.0) as usize
    }

    pub fn min_freq_hz(&self) -> f32 {
        self.band.min_bpm / 60.0
    }

    pub fn max_freq_hz(&self) -> f32 {
        self.band.max_bpm / 60.0
    }

    pub fn filter_config(&self) -> FilterConfig {
        FilterConfig {
            sample_rate: self.sampling.sample_rate_hz,
            min_freq: self.min_freq_hz(),
            max_freq: self.max_freq_hz(),
        }
    }
}

fn env_override(name: &str, target: &mut f32) -> Result<(), ConfigError> {
    if let Ok(val) = std::env::var(name) {
        let parsed: f32 = val
            .parse()
            .map_err(|_| ConfigError::Validation(format!("Invalid {}", name)))?;
        if !parsed.is_finite() {
            return Err(ConfigError::Validation(format!("{} must be finite", name)));
        }
        *target = parsed;
    }
    Ok(())
}
