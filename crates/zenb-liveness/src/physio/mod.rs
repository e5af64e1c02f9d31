//! Physiological metrics derived from detected beats.

mod hrv;

pub use hrv::{hrv_from_intervals, HrvMetrics};
