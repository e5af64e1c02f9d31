//! Chrominance projection (POS family)
//!
//! Combines the three normalized channels into one pulse scalar:
//!
//! ```text
//! S1 = G' - B'
//! S2 = G' + B' - 2R'
//! pulse = S1 + (std(S1) / std(S2)) * S2
//! ```
//!
//! Luminance changes from motion and lighting scale all channels alike and
//! cancel in S1/S2; the blood-volume colour shift (green/blue against red)
//! survives. The balance ratio is computed over a bounded history of S1/S2.
//!
//! Wang et al. (2017): "Algorithmic Principles of Remote PPG"

use std::collections::VecDeque;

use crate::dsp::stats;

/// The two chrominance projections of a normalized sample: `(S1, S2)`.
#[inline]
pub fn chrominance(normalized: [f32; 3]) -> (f32, f32) {
    let [r, g, b] = normalized;
    (g - b, g + b - 2.0 * r)
}

/// Stateful projector holding the S1/S2 history of one session.
#[derive(Debug, Clone)]
pub struct PulseProjector {
    s1_history: VecDeque<f32>,
    s2_history: VecDeque<f32>,
    history_len: usize,
}

impl PulseProjector {
    /// # Arguments
    /// * `history_len` - number of recent projections used for the balance ratio
    pub fn new(history_len: usize) -> Self {
        let history_len = history_len.max(1);
        Self {
            s1_history: VecDeque::with_capacity(history_len),
            s2_history: VecDeque::with_capacity(history_len),
            history_len,
        }
    }

    /// Project one normalized sample. The sample joins the history before the
    /// balance ratio is computed.
    pub fn project(&mut self, normalized: [f32; 3]) -> f32 {
        let (s1, s2) = chrominance(normalized);

        if self.s1_history.len() == self.history_len {
            self.s1_history.pop_front();
            self.s2_history.pop_front();
        }
        self.s1_history.push_back(s1);
        self.s2_history.push_back(s2);

        s1 + self.alpha_balance() * s2
    }

    /// std(S1) / std(S2), or 1 when the history is empty or S2 is flat.
    pub fn alpha_balance(&self) -> f32 {
        if self.s2_history.is_empty() {
            return 1.0;
        }
        let denom = stats::std_dev_of(&self.s2_history);
        if denom == 0.0 {
            return 1.0;
        }
        stats::std_dev_of(&self.s1_history) / denom
    }

    pub fn history_len(&self) -> usize {
        self.s1_history.len()
    }

    pub fn reset(&mut self) {
        self.s1_history.clear();
        self.s2_history.clear();
    }
}
