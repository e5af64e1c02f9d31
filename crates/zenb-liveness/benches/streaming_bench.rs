use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;
use zenb_liveness::{AnalyzerStrategy, BufferedSession, ColorSample, LivenessConfig, StreamingSession};

fn frames(n: usize) -> Vec<ColorSample> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n)
        .map(|i| {
            let g = 128.0 + 1.5 * (2.0 * PI * 1.2 * i as f32 / 30.0).sin();
            ColorSample::new(
                120.0 + rng.gen_range(-0.3..0.3),
                g,
                100.0,
                i as i64 * 33_333,
            )
        })
        .collect()
}

/// Per-frame cost once the buffer is full (full analysis on every push).
/// Target: well under one frame period (33 ms @ 30 fps)
fn benchmark_streaming_push(c: &mut Criterion) {
    let input = frames(600);
    let mut group = c.benchmark_group("streaming_push");

    for strategy in [AnalyzerStrategy::PeakInterval, AnalyzerStrategy::Spectral] {
        let mut config = LivenessConfig::default();
        config.analyzer.strategy = strategy;
        let mut session = StreamingSession::with_config(config).expect("valid config");
        for s in &input[..150] {
            session.push(*s);
        }

        let mut i = 150;
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", strategy)),
            &input,
            |b, input| {
                b.iter(|| {
                    let r = session.push(black_box(input[i % input.len()]));
                    i += 1;
                    r
                })
            },
        );
    }
    group.finish();
}

fn benchmark_buffered_analyze(c: &mut Criterion) {
    let mut session = BufferedSession::new();
    for s in frames(300) {
        session.add_sample(s);
    }

    c.bench_function("buffered_analyze_300", |b| {
        b.iter(|| black_box(session.analyze()))
    });
}

criterion_group!(benches, benchmark_streaming_push, benchmark_buffered_analyze);
criterion_main!(benches);
