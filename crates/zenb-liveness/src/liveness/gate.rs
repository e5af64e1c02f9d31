//! Liveness Gate
//!
//! Classifies one full pulse window. Rules are evaluated in order and the
//! first match wins:
//!
//! 1. buffer not full                        -> `INSUFFICIENT_DATA`
//! 2. variance below static threshold        -> `SPOOFING_DETECTED` (photo, frozen frame)
//! 3. mean |Δx| / MAD above erratic threshold -> `SPOOFING_DETECTED` (noise, tampering)
//! 4. no BPM                                 -> `NO_HEARTBEAT`, unless one strongly
//!    concentrated component lies outside the band -> `INVALID_BPM`;
//!    HRV below floor                        -> `SPOOFING_DETECTED` (looped / synthetic);
//!    HRV above ceiling                      -> `NO_HEARTBEAT`
//! 5. BPM outside band                       -> `INVALID_BPM`
//! 6. otherwise                              -> `LIFE_CONFIRMED`
//!
//! The gate is stateless; the same window always yields the same decision.
//! Intermediate values are only collected by the `*_traced` variants.

use ndarray::Array1;

use crate::buffer::SignalBuffer;
use crate::config::{GateConfig, LivenessConfig};
use crate::dsp::{stats, SignalConditioner};
use crate::physio::{hrv_from_intervals, HrvMetrics};
use crate::rppg::{DominantComponent, FrequencyAnalyzer, FrequencyEstimate};
use crate::types::{RejectReason, ScanResult, SessionId, SessionState};

/// Intermediate values behind a decision.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalTrace {
    pub variance: f32,
    /// Mean absolute successive difference over mean absolute deviation
    pub erratic_ratio: f32,
    /// Empty when the gate stopped before conditioning
    pub conditioned: Vec<f32>,
    pub peaks: Vec<usize>,
    pub intervals: Vec<f32>,
    pub band_power: Vec<f32>,
    pub hrv: Option<HrvMetrics>,
    /// Whole-spectrum component consulted when no rate could be timed
    pub dominant: Option<DominantComponent>,
}

/// Gate output for one window.
#[derive(Debug, Clone, PartialEq)]
pub struct GateDecision {
    pub status: SessionState,
    pub bpm: Option<f32>,
    pub snr: f32,
    pub hrv: f32,
    /// 0-100
    pub confidence: f32,
    pub reason: Option<RejectReason>,
}

impl GateDecision {
    fn rejected(status: SessionState, reason: RejectReason) -> Self {
        Self {
            status,
            bpm: None,
            snr: 0.0,
            hrv: 0.0,
            confidence: 0.0,
            reason: Some(reason),
        }
    }

    pub fn to_result(&self, session_id: SessionId, timestamp_us: i64) -> ScanResult {
        ScanResult {
            status: self.status,
            bpm: self.bpm,
            snr: self.snr,
            confidence: self.confidence,
            hrv: self.hrv,
            session_id,
            timestamp_us,
            reason: self.reason,
        }
    }
}

/// Conditioner -> analyzer -> classification chain.
#[derive(Clone)]
pub struct LivenessGate {
    config: GateConfig,
    min_bpm: f32,
    max_bpm: f32,
    sample_rate: f32,
    conditioner: SignalConditioner,
    analyzer: FrequencyAnalyzer,
}

impl LivenessGate {
    pub fn new(config: &LivenessConfig) -> Self {
        Self {
            config: config.gate.clone(),
            min_bpm: config.band.min_bpm,
            max_bpm: config.band.max_bpm,
            sample_rate: config.sampling.sample_rate_hz,
            conditioner: SignalConditioner::new(&config.filter_config()),
            analyzer: FrequencyAnalyzer::new(config),
        }
    }

    /// Classify the buffer contents. A buffer that is not full is never analysed.
    pub fn evaluate(&self, buffer: &SignalBuffer) -> GateDecision {
        if !buffer.is_full() {
            return Self::not_full();
        }
        self.run(&buffer.to_array(), None)
    }

    /// [`Self::evaluate`] plus the intermediate values behind the decision.
    pub fn evaluate_traced(&self, buffer: &SignalBuffer) -> (GateDecision, SignalTrace) {
        if !buffer.is_full() {
            return (Self::not_full(), SignalTrace::default());
        }
        self.evaluate_window_traced(&buffer.to_array())
    }

    /// Classify one complete window (rules 2-6).
    pub fn evaluate_window(&self, window: &Array1<f32>) -> GateDecision {
        self.run(window, None)
    }

    pub fn evaluate_window_traced(&self, window: &Array1<f32>) -> (GateDecision, SignalTrace) {
        let mut trace = SignalTrace::default();
        let decision = self.run(window, Some(&mut trace));
        (decision, trace)
    }

    fn not_full() -> GateDecision {
        GateDecision::rejected(SessionState::InsufficientData, RejectReason::NotEnoughSamples)
    }

    fn run(&self, window: &Array1<f32>, mut trace: Option<&mut SignalTrace>) -> GateDecision {
        let variance = stats::variance(window);
        let mad = stats::mean_abs_deviation(window);
        let erratic_ratio = if mad > 0.0 {
            stats::mean_abs_successive_diff(window) / mad
        } else {
            0.0
        };

        if let Some(t) = trace.as_deref_mut() {
            t.variance = variance;
            t.erratic_ratio = erratic_ratio;
        }

        if variance < self.config.static_variance_threshold {
            return GateDecision::rejected(SessionState::SpoofingDetected, RejectReason::StaticSignal);
        }
        if erratic_ratio > self.config.erratic_ratio_threshold {
            return GateDecision::rejected(SessionState::SpoofingDetected, RejectReason::ErraticSignal);
        }

        let conditioned = self.conditioner.condition(window);
        let FrequencyEstimate {
            bpm,
            snr,
            peaks,
            intervals,
            band_power,
            dominant,
        } = self.analyzer.analyze(&conditioned);
        let hrv = hrv_from_intervals(&intervals, self.sample_rate);

        // Too few beats to time, but one clear oscillation outside the band
        let bpm = bpm.or_else(|| dominant.and_then(|d| self.out_of_band_rate(&d)));

        let (status, reason) = self.classify(bpm, hrv.as_ref());
        let confidence = self.confidence(bpm, snr, hrv.as_ref());

        if let Some(t) = trace {
            t.conditioned = conditioned.to_vec();
            t.peaks = peaks;
            t.intervals = intervals;
            t.band_power = band_power;
            t.hrv = hrv;
            t.dominant = dominant;
        }

        GateDecision {
            status,
            bpm,
            snr,
            hrv: hrv.map(|m| m.normalized).unwrap_or(0.0),
            confidence,
            reason,
        }
    }

    /// Rate of a periodic component that is concentrated enough to name but
    /// lies outside the valid band. In-band components without timed beats
    /// are not trusted as a heartbeat.
    fn out_of_band_rate(&self, dominant: &DominantComponent) -> Option<f32> {
        let rate = dominant.bpm();
        let periodic = dominant.concentration >= self.config.periodic_concentration_min;
        (periodic && (rate < self.min_bpm || rate > self.max_bpm)).then_some(rate)
    }

    fn classify(
        &self,
        bpm: Option<f32>,
        hrv: Option<&HrvMetrics>,
    ) -> (SessionState, Option<RejectReason>) {
        let Some(bpm) = bpm else {
            return (SessionState::NoHeartbeat, Some(RejectReason::NoPeaks));
        };

        // Fewer than two intervals: nothing to judge variability on
        if let Some(m) = hrv {
            if m.normalized < self.config.hrv_min {
                return (SessionState::SpoofingDetected, Some(RejectReason::HrvTooRegular));
            }
            if m.normalized > self.config.hrv_max {
                return (SessionState::NoHeartbeat, Some(RejectReason::HrvTooIrregular));
            }
        }

        if bpm < self.min_bpm || bpm > self.max_bpm {
            return (SessionState::InvalidBpm, Some(RejectReason::BpmOutOfRange));
        }

        (SessionState::LifeConfirmed, None)
    }

    /// Weighted BPM plausibility, SNR and HRV plausibility, scaled to 0-100.
    fn confidence(&self, bpm: Option<f32>, snr: f32, hrv: Option<&HrvMetrics>) -> f32 {
        let g = &self.config;

        let bpm_score = bpm
            .map(|b| (1.0 - (b - g.typical_bpm).abs() / g.typical_bpm).clamp(0.0, 1.0))
            .unwrap_or(0.0);
        let snr_score = (snr / g.snr_reference).clamp(0.0, 1.0);
        // Without a rate only the spectral evidence counts
        let hrv_score = if bpm.is_some() {
            self.hrv_plausibility(hrv)
        } else {
            0.0
        };

        let total = g.weight_bpm + g.weight_snr + g.weight_hrv;
        if total <= 0.0 {
            return 0.0;
        }
        let score =
            (g.weight_bpm * bpm_score + g.weight_snr * snr_score + g.weight_hrv * hrv_score) / total;
        (score * 100.0).clamp(0.0, 100.0)
    }

    /// 1.0 at the centre of the HRV band, 0.5 at its edges, 0 outside.
    /// Unknown HRV (too few beats) scores 0.5.
    fn hrv_plausibility(&self, hrv: Option<&HrvMetrics>) -> f32 {
        let Some(m) = hrv else {
            return 0.5;
        };
        let (lo, hi) = (self.config.hrv_min, self.config.hrv_max);
        if m.normalized < lo || m.normalized > hi {
            return 0.0;
        }
        let half = (hi - lo) / 2.0;
        if half <= 0.0 {
            return 1.0;
        }
        let centre = lo + half;
        1.0 - 0.5 * ((m.normalized - centre).abs() / half).min(1.0)
    }
}
