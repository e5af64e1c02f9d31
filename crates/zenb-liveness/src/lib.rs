//! # zenb-liveness
//!
//! Camera-based liveness verification for ZenB.
//!
//! Decides whether the face in front of the camera belongs to a living person
//! by recovering the blood-volume pulse from subtle skin-colour changes (rPPG).
//! A photo, a screen replay or a noise-injected feed lacks a plausible pulse.
//!
//! This crate provides:
//! - **DSP**: EMA lighting normalization, detrend/band conditioning, FFT, peak picking
//! - **rPPG**: POS chrominance projection and heart-rate estimation
//! - **Liveness gate**: static / erratic / heartbeat / HRV / rate checks with confidence
//! - **Sessions**: streaming and buffered modes over one shared core, plus a handle registry
//!
//! ## Example
//!
//! ```ignore
//! use zenb_liveness::{ColorSample, SessionState, StreamingSession};
//!
//! let mut session = StreamingSession::new();
//!
//! for frame in video_frames {
//!     let result = session.push(ColorSample::new(frame.r, frame.g, frame.b, frame.timestamp_us));
//!     match result.status {
//!         SessionState::Collecting => continue,
//!         SessionState::LifeConfirmed => println!("Live: {:.0} BPM", result.bpm.unwrap_or(0.0)),
//!         other => println!("Rejected: {} ({:?})", other, result.reason),
//!     }
//! }
//! ```

pub mod buffer;
pub mod config;
pub mod dsp;
pub mod liveness;
pub mod physio;
pub mod rppg;
pub mod session;
pub mod types;
pub mod vision;

#[cfg(test)]
mod tests_proptest;

pub use buffer::SignalBuffer;
pub use config::{AnalyzerStrategy, ConfigError, LivenessConfig};
pub use liveness::{GateDecision, LivenessGate};
pub use session::{
    BufferedSession, ScanDiagnostics, ScanReport, SessionError, SessionRegistry,
    StreamingSession,
};
pub use types::{ColorSample, RejectReason, ScanResult, SessionId, SessionState};
