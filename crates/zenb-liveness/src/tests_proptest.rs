use proptest::prelude::*;

/// Property-based checks for buffer, normalizer and session invariants

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::SignalBuffer;
    use crate::dsp::TemporalNormalizer;
    use crate::session::{BufferedSession, StreamingSession};
    use crate::types::ColorSample;

    // =========================================================================
    // FIFO: length bounded by capacity, newest samples retained in order
    // =========================================================================
    proptest! {
        #[test]
        fn test_buffer_fifo_invariant(
            capacity in 1usize..200,
            values in prop::collection::vec(-1.0f32..1.0, 0..400),
        ) {
            let mut buf = SignalBuffer::new(capacity);
            for v in &values {
                buf.push(*v);
                prop_assert!(buf.len() <= capacity);
            }
            let keep = values.len().min(capacity);
            let tail: Vec<f32> = values[values.len() - keep..].to_vec();
            prop_assert_eq!(buf.iter().copied().collect::<Vec<_>>(), tail);
        }
    }

    // =========================================================================
    // Normalizer never emits NaN / Infinity for finite input
    // =========================================================================
    proptest! {
        #[test]
        fn test_normalizer_finite(
            alpha in 0.01f32..1.0,
            zero_first in any::<bool>(),
            samples in prop::collection::vec(prop::array::uniform3(0.0f32..255.0), 1..300),
        ) {
            let mut norm = TemporalNormalizer::new(alpha);
            if zero_first {
                norm.update([0.0, 0.0, 0.0]);
            }
            for rgb in samples {
                let out = norm.update(rgb);
                prop_assert!(out.iter().all(|v| v.is_finite()));
            }
        }
    }

    // =========================================================================
    // Streaming and buffered classify any sequence identically
    // =========================================================================
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn test_modes_agree(
            freq in 0.2f32..3.0,
            amplitude in 0.0f32..4.0,
            len in 140usize..220,
            jitter in prop::collection::vec(-1.0f32..1.0, 220),
        ) {
            let frames: Vec<ColorSample> = (0..len)
                .map(|i| {
                    let beat = amplitude * (2.0 * std::f32::consts::PI * freq * i as f32 / 30.0).sin();
                    ColorSample::new(120.0 + jitter[i], 128.0 + beat, 100.0, i as i64 * 33_333)
                })
                .collect();

            let mut streaming = StreamingSession::new();
            let mut buffered = BufferedSession::new();
            let mut last = None;
            for s in &frames {
                last = Some(streaming.push(*s));
                buffered.add_sample(*s);
            }
            let last = last.unwrap();
            let report = buffered.analyze();

            // Streaming says COLLECTING where buffered says INSUFFICIENT_DATA
            prop_assert_eq!(last.status.is_verdict(), report.result.status.is_verdict());
            if last.status.is_verdict() {
                prop_assert_eq!(last.status, report.result.status);
                prop_assert_eq!(last.bpm, report.result.bpm);
                prop_assert_eq!(last.snr, report.result.snr);
                prop_assert_eq!(last.hrv, report.result.hrv);
                prop_assert_eq!(last.confidence, report.result.confidence);
            }
            prop_assert!(last.confidence.is_finite() && (0.0..=100.0).contains(&last.confidence));
        }
    }
}
