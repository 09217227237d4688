//! Criterion benchmarks for the pedalera effect collection
//!
//! Run with: cargo bench -p pedalera-effects
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pedalera_core::Effect;
use pedalera_effects::{
    Echo, Flanger, HarmonicExciter, MultibandCompressor, Phaser, RoomProfile, synthesize_room_ir,
};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_blocks<E: Effect>(group_name: &str, c: &mut Criterion, mut make: impl FnMut() -> E) {
    let mut group = c.benchmark_group(group_name);

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::new("process", block_size),
            &block_size,
            |b, _| {
                let mut effect = make();
                b.iter(|| {
                    for &sample in &input {
                        black_box(effect.process(black_box(sample)));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_echo(c: &mut Criterion) {
    bench_blocks("Echo", c, || {
        let mut echo = Echo::new(SAMPLE_RATE);
        echo.set_feedback(0.5);
        echo.set_wobble(1.2, 2.0);
        echo
    });
}

fn bench_flanger(c: &mut Criterion) {
    bench_blocks("Flanger", c, || {
        let mut flanger = Flanger::new(SAMPLE_RATE);
        flanger.set_depth(0.8);
        flanger
    });
}

fn bench_phaser(c: &mut Criterion) {
    bench_blocks("Phaser", c, || {
        let mut phaser = Phaser::new(SAMPLE_RATE);
        phaser.set_rate(1.0);
        phaser
    });

    // The recompute threshold trades sweep smoothness for coefficient
    // math; benchmark the always-recompute worst case too.
    let mut group = c.benchmark_group("Phaser");
    let input = generate_test_signal(512);
    group.bench_function("process_threshold_zero", |b| {
        let mut phaser = Phaser::new(SAMPLE_RATE);
        phaser.set_rate(1.0);
        phaser.set_recompute_threshold_hz(0.0);
        b.iter(|| {
            for &sample in &input {
                black_box(phaser.process(black_box(sample)));
            }
        });
    });
    group.finish();
}

fn bench_multiband(c: &mut Criterion) {
    bench_blocks("MultibandCompressor", c, || {
        let mut comp = MultibandCompressor::new(SAMPLE_RATE);
        for band in 0..4 {
            comp.band_mut(band).set_threshold_db(-30.0);
        }
        comp
    });
}

fn bench_exciter(c: &mut Criterion) {
    bench_blocks("HarmonicExciter", c, || {
        let mut exciter = HarmonicExciter::new(SAMPLE_RATE);
        exciter.set_even_level(0.7);
        exciter.set_odd_level(0.7);
        exciter
    });
}

fn bench_room_ir(c: &mut Criterion) {
    let mut group = c.benchmark_group("RoomIr");
    group.sample_size(10);

    for profile in RoomProfile::ALL {
        group.bench_with_input(
            BenchmarkId::new("synthesize", profile.name()),
            &profile,
            |b, profile| {
                let params = profile.params();
                b.iter(|| black_box(synthesize_room_ir(&params, 1.0, SAMPLE_RATE)));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_echo,
    bench_flanger,
    bench_phaser,
    bench_multiband,
    bench_exciter,
    bench_room_ir
);
criterion_main!(benches);
