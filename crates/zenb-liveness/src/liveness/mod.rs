//! Liveness decision
//!
//! - `LivenessGate` - ordered spoof / heartbeat / rate checks over one pulse window
//! - `GateDecision` - classification, metrics and confidence
//! - `SignalTrace` - intermediate values kept for diagnostics

mod gate;

pub use gate::{GateDecision, LivenessGate, SignalTrace};
