//! Domain types shared across the liveness pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Mean colour of one frame's region of interest.
///
/// Produced by the frame colour extractor (or [`crate::vision::roi_color_sample`])
/// and consumed exactly once by a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorSample {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// Frame timestamp in microseconds (caller clock)
    pub timestamp_us: i64,
}

impl ColorSample {
    pub fn new(r: f32, g: f32, b: f32, timestamp_us: i64) -> Self {
        Self { r, g, b, timestamp_us }
    }

    pub fn from_rgb(rgb: [f32; 3], timestamp_us: i64) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2], timestamp_us)
    }

    #[inline]
    pub fn rgb(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// True when every channel is a finite number.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }
}

/// Opaque identifier of one verification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Classification of an analysis call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    /// Streaming session still filling its buffer
    Collecting,
    LifeConfirmed,
    SpoofingDetected,
    /// A periodic signal was found but its rate is outside the valid band
    InvalidBpm,
    NoHeartbeat,
    /// Buffered analysis requested with fewer samples than one window
    InsufficientData,
}

impl SessionState {
    /// Whether this state carries a verdict (as opposed to "not enough data yet").
    pub fn is_verdict(&self) -> bool {
        !matches!(self, Self::Collecting | Self::InsufficientData)
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Self::LifeConfirmed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collecting => "COLLECTING",
            Self::LifeConfirmed => "LIFE_CONFIRMED",
            Self::SpoofingDetected => "SPOOFING_DETECTED",
            Self::InvalidBpm => "INVALID_BPM",
            Self::NoHeartbeat => "NO_HEARTBEAT",
            Self::InsufficientData => "INSUFFICIENT_DATA",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the gate rejected (or could not yet judge) a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Fewer samples than one analysis window
    NotEnoughSamples,
    /// Variance below the static threshold (photo, frozen frame)
    StaticSignal,
    /// Sample-to-sample jumps too large relative to signal level (noise, tampering)
    ErraticSignal,
    /// Fewer than two detectable beats
    NoPeaks,
    /// Beat intervals too regular for a living heart (looped or synthetic source)
    HrvTooRegular,
    /// Beat intervals too irregular to be a pulse
    HrvTooIrregular,
    BpmOutOfRange,
}

impl RejectReason {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::NotEnoughSamples => "not enough samples for one analysis window",
            Self::StaticSignal => "static signal (photo or frozen video)",
            Self::ErraticSignal => "erratic signal (noise or tampering)",
            Self::NoPeaks => "fewer than two detectable heartbeats",
            Self::HrvTooRegular => "beat intervals suspiciously regular",
            Self::HrvTooIrregular => "beat intervals too irregular",
            Self::BpmOutOfRange => "heart rate outside physiological range",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Result of one analysis call; the only artifact handed to the verification workflow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub status: SessionState,
    /// Estimated heart rate, absent when no frequency could be estimated
    pub bpm: Option<f32>,
    /// Linear ratio of the dominant band bin power to the mean of the other band bins
    pub snr: f32,
    /// 0-100
    pub confidence: f32,
    /// RMSSD over mean beat interval, 0-1
    pub hrv: f32,
    pub session_id: SessionId,
    /// Timestamp of the newest analysed sample
    pub timestamp_us: i64,
    pub reason: Option<RejectReason>,
}

impl ScanResult {
    /// Result for a session that has not produced a verdict yet.
    pub(crate) fn pending(status: SessionState, session_id: SessionId, timestamp_us: i64) -> Self {
        Self {
            status,
            bpm: None,
            snr: 0.0,
            confidence: 0.0,
            hrv: 0.0,
            session_id,
            timestamp_us,
            reason: Some(RejectReason::NotEnoughSamples),
        }
    }

    pub fn is_live(&self) -> bool {
        self.status.is_live()
    }
}
