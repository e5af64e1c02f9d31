//! Remote Photoplethysmography (rPPG) stages
//!
//! - `PulseProjector` - chrominance projection of normalized RGB into a pulse scalar
//! - `FrequencyAnalyzer` - heart rate (peak interval or spectral) and SNR

mod analyzer;
mod projector;

pub use analyzer::{DominantComponent, FrequencyAnalyzer, FrequencyEstimate};
pub use projector::{chrominance, PulseProjector};
