//! Codec and sweep benchmarks
//!
//! Run with: cargo bench --bench sweep

use bchsim::sim::{CodecAdapter, CodecConfig, ErrorModel, SweepConfig, SweepExecutor, TrialRunner};
use bchsim::sim::sweep::trial_rng;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

/// Encode and decode of a clean full-length payload for growing t
fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("bch_m9");

    for strength in [1usize, 4, 16, 32].iter() {
        let mut adapter = CodecAdapter::new(CodecConfig::new(*strength, 9)).unwrap();
        let payload = vec![0xA5u8; adapter.parameters().max_data_length_bytes];
        let ecc = adapter.encode(&payload).unwrap();
        group.throughput(Throughput::Bytes(payload.len() as u64));

        group.bench_with_input(BenchmarkId::new("encode", strength), &payload, |b, payload| {
            b.iter(|| adapter.encode(black_box(payload)).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("decode", strength), &payload, |b, payload| {
            b.iter(|| adapter.decode(black_box(payload), black_box(&ecc)).unwrap())
        });
    }

    group.finish();
}

/// Single trials with t errors injected
fn bench_trial(c: &mut Criterion) {
    let mut group = c.benchmark_group("trial");

    for model in [ErrorModel::Scattered, ErrorModel::Burst] {
        let mut adapter = CodecAdapter::new(CodecConfig::new(8, 9)).unwrap();
        let runner = TrialRunner::new(model, 0);
        let mut trial = 0;
        group.bench_function(BenchmarkId::new("m9_t8", model), |b| {
            b.iter(|| {
                trial += 1;
                runner.execute(&mut adapter, &mut trial_rng(1, 8, trial))
            })
        });
    }

    group.finish();
}

/// Short sweep: sequential vs parallel
fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep_m8");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(10);

    for parallel in [false, true] {
        let config = SweepConfig {
            field_order: 8,
            trials: 200,
            max_strength: Some(8),
            seed: Some(7),
            parallel,
            ..SweepConfig::default()
        };
        let executor = SweepExecutor::new(config).unwrap();
        let name = if parallel { "parallel" } else { "sequential" };
        group.bench_function(name, |b| b.iter(|| executor.run().unwrap()));
    }

    group.finish();
}

criterion_group!(benches, bench_codec, bench_trial, bench_sweep);
criterion_main!(benches);
