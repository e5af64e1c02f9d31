use std::f32::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use zenb_liveness::{
    AnalyzerStrategy, BufferedSession, ColorSample, LivenessConfig, RejectReason, ScanResult,
    SessionState, StreamingSession,
};

const FPS: f32 = 30.0;
const FRAME_US: i64 = 33_333;

/// Skin-like base colour with a green-channel pulse at `freq` Hz.
fn pulse_frames(freq: f32, n: usize) -> Vec<ColorSample> {
    pulse_frames_at(freq, 0.0, n)
}

fn pulse_frames_at(freq: f32, phase: f32, n: usize) -> Vec<ColorSample> {
    (0..n)
        .map(|i| {
            let g = 128.0 + 1.5 * (2.0 * PI * freq * i as f32 / FPS + phase).sin();
            ColorSample::new(120.0, g, 100.0, i as i64 * FRAME_US)
        })
        .collect()
}

fn run(session: &mut StreamingSession, frames: &[ColorSample]) -> Vec<ScanResult> {
    frames.iter().map(|s| session.push(*s)).collect()
}

#[test]
fn constant_input_is_spoofing() {
    let frames: Vec<_> = (0..150)
        .map(|i| ColorSample::new(120.0, 128.0, 100.0, i * FRAME_US))
        .collect();
    let results = run(&mut StreamingSession::new(), &frames);
    let last = results.last().unwrap();

    assert_eq!(last.status, SessionState::SpoofingDetected);
    assert_eq!(last.reason, Some(RejectReason::StaticSignal));
    assert_eq!(last.confidence, 0.0);
    assert!(last.bpm.is_none());
}

#[test]
fn resting_pulse_is_life_confirmed() {
    let results = run(&mut StreamingSession::new(), &pulse_frames(1.2, 150));
    let last = results.last().unwrap();

    assert_eq!(last.status, SessionState::LifeConfirmed, "{:?}", last.reason);
    let bpm = last.bpm.unwrap();
    assert!((bpm - 72.0).abs() <= 5.0, "bpm {}", bpm);
    assert!(last.confidence > 0.0 && last.confidence <= 100.0);
    assert!(last.snr > 1.0);
    assert!((0.0..=1.0).contains(&last.hrv));
    assert!(last.reason.is_none());
}

#[test]
fn spectral_strategy_confirms_resting_pulse() {
    let mut config = LivenessConfig::default();
    config.analyzer.strategy = AnalyzerStrategy::Spectral;
    let mut session = StreamingSession::with_config(config).unwrap();
    let last = *run(&mut session, &pulse_frames(1.2, 150)).last().unwrap();

    assert_eq!(last.status, SessionState::LifeConfirmed, "{:?}", last.reason);
    assert!((last.bpm.unwrap() - 72.0).abs() <= 5.0);
}

#[test]
fn slow_oscillation_is_invalid_bpm() {
    // Half the starting phases leave only one beat in the window
    for k in 0..8 {
        let phase = k as f32 * PI / 4.0;
        let results = run(&mut StreamingSession::new(), &pulse_frames_at(0.3, phase, 150));
        let last = results.last().unwrap();

        assert_eq!(last.status, SessionState::InvalidBpm, "phase {} {:?}", phase, last.reason);
        assert_eq!(last.reason, Some(RejectReason::BpmOutOfRange));
        assert!(last.bpm.unwrap() < 40.0, "phase {} bpm {:?}", phase, last.bpm);
    }
}

#[test]
fn slow_oscillation_stays_invalid_while_streaming() {
    let results = run(&mut StreamingSession::new(), &pulse_frames(0.3, 450));
    for (i, r) in results.iter().enumerate().skip(149) {
        assert_eq!(r.status, SessionState::InvalidBpm, "frame {} {:?}", i, r.reason);
        assert!(r.bpm.unwrap() < 40.0, "frame {} bpm {:?}", i, r.bpm);
    }
}

#[test]
fn single_transient_is_no_heartbeat() {
    // One blink-like bump in an otherwise still feed
    let frames: Vec<_> = (0..150)
        .map(|i| {
            let g = 128.0 + 3.0 * (-((i as f32 - 75.0) / 15.0).powi(2)).exp();
            ColorSample::new(120.0, g, 100.0, i as i64 * FRAME_US)
        })
        .collect();
    let last = *run(&mut StreamingSession::new(), &frames).last().unwrap();

    assert_eq!(last.status, SessionState::NoHeartbeat, "{:?}", last.reason);
    assert_eq!(last.reason, Some(RejectReason::NoPeaks));
    assert!(last.bpm.is_none());

    let mut buffered = BufferedSession::new();
    for s in &frames {
        buffered.add_sample(*s);
    }
    let report = buffered.analyze();
    assert_eq!(report.result.status, SessionState::NoHeartbeat);
    assert!(report.diagnostics.peaks.len() < 2);
    assert!(report.diagnostics.dominant.is_some());
}

#[test]
fn white_noise_is_never_live() {
    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let frames: Vec<_> = (0..200)
            .map(|i| {
                ColorSample::new(
                    120.0 + rng.gen_range(-4.0..4.0),
                    128.0 + rng.gen_range(-4.0..4.0),
                    100.0 + rng.gen_range(-4.0..4.0),
                    i * FRAME_US,
                )
            })
            .collect();

        let results = run(&mut StreamingSession::new(), &frames);
        assert!(
            results.iter().all(|r| r.status != SessionState::LifeConfirmed),
            "seed {} produced a live verdict",
            seed
        );
        let last = results.last().unwrap();
        assert_eq!(last.status, SessionState::SpoofingDetected, "seed {}", seed);
        assert_eq!(last.reason, Some(RejectReason::ErraticSignal));
    }
}

#[test]
fn short_input_is_collecting_or_insufficient() {
    let frames = pulse_frames(1.2, 149);

    let results = run(&mut StreamingSession::new(), &frames);
    assert!(results.iter().all(|r| r.status == SessionState::Collecting));

    let mut buffered = BufferedSession::new();
    for s in &frames {
        buffered.add_sample(*s);
    }
    let report = buffered.analyze();
    assert_eq!(report.result.status, SessionState::InsufficientData);
    assert_eq!(report.result.confidence, 0.0);
}

#[test]
fn reset_matches_fresh_session() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut reused = StreamingSession::new();
    for i in 0..180 {
        reused.push(ColorSample::new(
            90.0 + rng.gen_range(0.0..30.0),
            110.0,
            80.0,
            i * FRAME_US,
        ));
    }
    reused.reset();

    let frames = pulse_frames(1.2, 150);
    let after_reset = run(&mut reused, &frames);
    let fresh = run(&mut StreamingSession::new(), &frames);

    for (a, b) in after_reset.iter().zip(&fresh) {
        assert_eq!(a.status, b.status);
        assert_eq!(a.bpm, b.bpm);
        assert_eq!(a.snr, b.snr);
        assert_eq!(a.hrv, b.hrv);
        assert_eq!(a.confidence, b.confidence);
        assert_eq!(a.reason, b.reason);
        assert_eq!(a.timestamp_us, b.timestamp_us);
    }
}

#[test]
fn zero_first_sample_stays_finite() {
    let mut frames = vec![ColorSample::new(0.0, 0.0, 0.0, 0)];
    frames.extend(pulse_frames(1.2, 299).into_iter().map(|mut s| {
        s.timestamp_us += FRAME_US;
        s
    }));

    for r in run(&mut StreamingSession::new(), &frames) {
        assert!(r.snr.is_finite());
        assert!(r.hrv.is_finite());
        assert!(r.confidence.is_finite());
        assert!(r.bpm.map_or(true, f32::is_finite));
    }
}

#[test]
fn hrv_floor_rejects_perfect_periodicity() {
    let config = LivenessConfig::from_toml_str("[gate]\nhrv_min = 0.1\n").unwrap();
    let mut session = StreamingSession::with_config(config).unwrap();
    let last = *run(&mut session, &pulse_frames(1.2, 150)).last().unwrap();

    assert_eq!(last.status, SessionState::SpoofingDetected);
    assert_eq!(last.reason, Some(RejectReason::HrvTooRegular));
}
