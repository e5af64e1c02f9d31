//! Per-session signal front end: normalizer -> projector -> buffer.
//!
//! Both execution modes drive samples through this type, so a streaming
//! session and a buffered replay of the same samples hold identical buffers.

use crate::buffer::SignalBuffer;
use crate::config::LivenessConfig;
use crate::dsp::TemporalNormalizer;
use crate::rppg::PulseProjector;
use crate::types::ColorSample;

/// Values derived from one accepted sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseStep {
    /// Channel ratios against the running average
    pub normalized: [f32; 3],
    pub pulse: f32,
    /// std(S1) / std(S2) after this sample
    pub alpha_balance: f32,
}

#[derive(Debug, Clone)]
pub struct PulseExtractor {
    normalizer: TemporalNormalizer,
    projector: PulseProjector,
    buffer: SignalBuffer,
    samples_seen: usize,
    last_timestamp_us: Option<i64>,
}

impl PulseExtractor {
    pub fn new(config: &LivenessConfig) -> Self {
        let capacity = config.buffer_capacity();
        Self {
            normalizer: TemporalNormalizer::new(config.normalizer.ema_alpha),
            projector: PulseProjector::new(capacity),
            buffer: SignalBuffer::new(capacity),
            samples_seen: 0,
            last_timestamp_us: None,
        }
    }

    /// Feed one finite sample through the front end.
    pub fn push(&mut self, sample: &ColorSample) -> PulseStep {
        let normalized = self.normalizer.update(sample.rgb());
        let pulse = self.projector.project(normalized);
        self.buffer.push(pulse);
        self.samples_seen += 1;
        self.last_timestamp_us = Some(sample.timestamp_us);

        PulseStep {
            normalized,
            pulse,
            alpha_balance: self.projector.alpha_balance(),
        }
    }

    pub fn buffer(&self) -> &SignalBuffer {
        &self.buffer
    }

    /// Samples accepted since creation or the last reset
    pub fn samples_seen(&self) -> usize {
        self.samples_seen
    }

    pub fn last_timestamp_us(&self) -> Option<i64> {
        self.last_timestamp_us
    }

    pub fn reset(&mut self) {
        self.normalizer.reset();
        self.projector.reset();
        self.buffer.clear();
        self.samples_seen = 0;
        self.last_timestamp_us = None;
    }
}
