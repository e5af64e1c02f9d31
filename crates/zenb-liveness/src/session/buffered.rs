//! Buffered execution mode: accumulate a recording, analyse once.

use crate::config::{ConfigError, LivenessConfig};
use crate::liveness::{LivenessGate, SignalTrace};
use crate::physio::HrvMetrics;
use crate::rppg::DominantComponent;
use crate::types::{ColorSample, ScanResult, SessionId, SessionState};

use super::extractor::PulseExtractor;

/// Intermediate series and metrics of a buffered analysis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanDiagnostics {
    /// Normalized RGB ratios, one per accepted sample
    pub normalized: Vec<[f32; 3]>,
    /// Projected pulse, one per accepted sample
    pub pulse: Vec<f32>,
    /// Final analysis window (newest `capacity` pulse values)
    pub window: Vec<f32>,
    pub conditioned: Vec<f32>,
    pub peaks: Vec<usize>,
    pub intervals: Vec<f32>,
    pub hrv: Option<HrvMetrics>,
    pub variance: f32,
    pub erratic_ratio: f32,
    pub band_power: Vec<f32>,
    /// Whole-spectrum component, present when too few beats were found
    pub dominant: Option<DominantComponent>,
    /// Projector balance ratio after the last sample
    pub alpha_balance: f32,
}

/// Classification plus everything computed on the way to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport {
    pub result: ScanResult,
    pub diagnostics: ScanDiagnostics,
}

/// Accumulate-then-analyze liveness session.
///
/// Samples are stored raw; `analyze` replays them through the same front end
/// and gate a [`super::StreamingSession`] uses, so both modes classify a given
/// sequence identically.
///
/// A recording holds at most `sampling.max_recording_sec` worth of samples
/// ([`LivenessConfig::max_recorded_samples`]); later samples are refused.
#[derive(Clone)]
pub struct BufferedSession {
    id: SessionId,
    config: LivenessConfig,
    gate: LivenessGate,
    samples: Vec<ColorSample>,
    max_samples: usize,
}

impl BufferedSession {
    pub fn new() -> Self {
        Self::build(LivenessConfig::default())
    }

    pub fn with_config(config: LivenessConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: LivenessConfig) -> Self {
        let id = SessionId::new();
        log::info!("Buffered liveness session {} started", id);
        Self {
            id,
            gate: LivenessGate::new(&config),
            samples: Vec::with_capacity(config.buffer_capacity()),
            max_samples: config.max_recorded_samples(),
            config,
        }
    }

    /// Store one sample and report whether it was kept.
    ///
    /// Non-finite samples are dropped, as is everything past the recording
    /// cap. The stored prefix is left untouched so the analysis still matches
    /// a streaming session fed the same accepted samples.
    pub fn add_sample(&mut self, sample: ColorSample) -> bool {
        if !sample.is_finite() {
            log::warn!(
                "Session {}: dropping non-finite sample at {} us",
                self.id,
                sample.timestamp_us
            );
            return false;
        }
        if self.samples.len() >= self.max_samples {
            log::warn!(
                "Session {}: recording full ({} samples), dropping sample at {} us",
                self.id,
                self.max_samples,
                sample.timestamp_us
            );
            return false;
        }
        self.samples.push(sample);
        true
    }

    /// Run the full pipeline over the stored samples.
    pub fn analyze(&self) -> ScanReport {
        let mut extractor = PulseExtractor::new(&self.config);
        let mut diagnostics = ScanDiagnostics {
            normalized: Vec::with_capacity(self.samples.len()),
            pulse: Vec::with_capacity(self.samples.len()),
            alpha_balance: 1.0,
            ..Default::default()
        };

        for sample in &self.samples {
            let step = extractor.push(sample);
            diagnostics.normalized.push(step.normalized);
            diagnostics.pulse.push(step.pulse);
            diagnostics.alpha_balance = step.alpha_balance;
        }

        let buffer = extractor.buffer();
        diagnostics.window = buffer.iter().copied().collect();
        let timestamp_us = extractor.last_timestamp_us().unwrap_or(0);

        if !buffer.is_full() {
            log::debug!(
                "Session {}: {} of {} samples, insufficient for analysis",
                self.id,
                buffer.len(),
                buffer.capacity()
            );
            return ScanReport {
                result: ScanResult::pending(SessionState::InsufficientData, self.id, timestamp_us),
                diagnostics,
            };
        }

        let (decision, trace) = self.gate.evaluate_traced(buffer);
        let result = decision.to_result(self.id, timestamp_us);
        log::debug!(
            "Session {}: {} over {} samples (bpm {:?}, confidence {:.1})",
            self.id,
            result.status,
            self.samples.len(),
            result.bpm,
            result.confidence
        );

        let SignalTrace {
            variance,
            erratic_ratio,
            conditioned,
            peaks,
            intervals,
            band_power,
            hrv,
            dominant,
        } = trace;
        diagnostics.variance = variance;
        diagnostics.erratic_ratio = erratic_ratio;
        diagnostics.conditioned = conditioned;
        diagnostics.peaks = peaks;
        diagnostics.intervals = intervals;
        diagnostics.band_power = band_power;
        diagnostics.hrv = hrv;
        diagnostics.dominant = dominant;

        ScanReport {
            result,
            diagnostics,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        log::info!("Buffered liveness session {} cleared", self.id);
    }
}

impl Default for BufferedSession {
    fn default() -> Self {
        Self::new()
    }
}
