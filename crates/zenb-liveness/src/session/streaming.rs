//! Streaming execution mode: one classification per pushed sample.

use crate::config::{ConfigError, LivenessConfig};
use crate::liveness::LivenessGate;
use crate::types::{ColorSample, ScanResult, SessionId, SessionState};

use super::extractor::PulseExtractor;

/// Push-per-frame liveness session.
///
/// Holds all state of one verification attempt. While the buffer fills every
/// push returns `COLLECTING`; afterwards each push re-runs the full analysis
/// over the newest window.
///
/// # Example
///
/// ```ignore
/// let mut session = StreamingSession::new();
/// for frame in camera {
///     let result = session.push(ColorSample::new(frame.r, frame.g, frame.b, frame.ts_us));
///     if result.status.is_verdict() {
///         break;
///     }
/// }
/// ```
#[derive(Clone)]
pub struct StreamingSession {
    id: SessionId,
    extractor: PulseExtractor,
    gate: LivenessGate,
    last_result: ScanResult,
}

impl StreamingSession {
    /// Session with the default configuration.
    pub fn new() -> Self {
        Self::build(SessionId::new(), &LivenessConfig::default())
    }

    pub fn with_config(config: LivenessConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(SessionId::new(), &config))
    }

    /// Caller must have validated `config`.
    pub(crate) fn build(id: SessionId, config: &LivenessConfig) -> Self {
        log::info!(
            "Liveness session {} started (window {} samples @ {} Hz)",
            id,
            config.buffer_capacity(),
            config.sampling.sample_rate_hz
        );
        Self {
            id,
            extractor: PulseExtractor::new(config),
            gate: LivenessGate::new(config),
            last_result: ScanResult::pending(SessionState::Collecting, id, 0),
        }
    }

    /// Consume one sample and return the current classification.
    ///
    /// A sample with a non-finite channel is dropped and the previous result
    /// is returned unchanged.
    pub fn push(&mut self, sample: ColorSample) -> ScanResult {
        if !sample.is_finite() {
            log::warn!(
                "Session {}: dropping non-finite sample at {} us",
                self.id,
                sample.timestamp_us
            );
            return self.last_result;
        }

        self.extractor.push(&sample);
        let buffer = self.extractor.buffer();

        let result = if buffer.is_full() {
            self.gate
                .evaluate(buffer)
                .to_result(self.id, sample.timestamp_us)
        } else {
            ScanResult::pending(SessionState::Collecting, self.id, sample.timestamp_us)
        };

        if result.status != self.last_result.status {
            log::debug!(
                "Session {}: {} -> {} (bpm {:?}, confidence {:.1})",
                self.id,
                self.last_result.status,
                result.status,
                result.bpm,
                result.confidence
            );
        }

        self.last_result = result;
        result
    }

    /// Clear all per-session state. The session keeps its id.
    pub fn reset(&mut self) {
        self.extractor.reset();
        self.last_result = ScanResult::pending(SessionState::Collecting, self.id, 0);
        log::info!("Liveness session {} reset", self.id);
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn samples_seen(&self) -> usize {
        self.extractor.samples_seen()
    }

    /// Buffer fill level in [0, 1], for progress display.
    pub fn fill_ratio(&self) -> f32 {
        self.extractor.buffer().fill_ratio()
    }

    pub fn last_result(&self) -> &ScanResult {
        &self.last_result
    }
}

impl Default for StreamingSession {
    fn default() -> Self {
        Self::new()
    }
}
