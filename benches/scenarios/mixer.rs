//! Benchmarks for the full mixer read path with live effects.
//!
//! These simulate the audio callback under combat load: several overlapping
//! patterns, some layered, all pulled through one `read`.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tactor_dsp::pattern::library::PatternLibrary;
use tactor_dsp::Mixer;

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

fn loaded_mixer(names: &[&str]) -> Mixer {
    let library = PatternLibrary::builtin();
    let mixer = Mixer::new(SAMPLE_RATE);
    for name in names {
        let mut pattern = library.get(name).cloned().unwrap();
        // Long enough to stay alive for the whole measurement.
        pattern.duration_ms = 600_000.0;
        mixer.trigger(&pattern).unwrap();
    }
    mixer
}

pub fn bench_mixer(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/mixer");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === IDLE: no active effects ===
        let idle = Mixer::new(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("idle", size), &size, |b, _| {
            b.iter(|| {
                idle.read(black_box(&mut buffer));
            })
        });

        // === LIGHT: one single-voice effect ===
        let light = loaded_mixer(&["sustained"]);
        group.bench_with_input(BenchmarkId::new("1_effect", size), &size, |b, _| {
            b.iter(|| {
                light.read(black_box(&mut buffer));
            })
        });

        // === COMBAT: four overlapping effects, one layered ===
        let combat = loaded_mixer(&["sustained", "buildup", "oscillating", "heartbeat"]);
        group.bench_with_input(BenchmarkId::new("4_effects", size), &size, |b, _| {
            b.iter(|| {
                combat.read(black_box(&mut buffer));
            })
        });

        // === HEAVY: eight effects, layered patterns doubled up ===
        let heavy = loaded_mixer(&[
            "sustained",
            "buildup",
            "oscillating",
            "heartbeat",
            "impact",
            "sharp_pulse",
            "heartbeat",
            "thud_then_rumble",
        ]);
        group.bench_with_input(BenchmarkId::new("8_effects", size), &size, |b, _| {
            b.iter(|| {
                heavy.read(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
