//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tactor_dsp::dsp::oscillator::OscillatorBlock;
use tactor_dsp::dsp::Waveform;

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Sine - uses sin() transcendental function
        let mut osc = OscillatorBlock::new(Waveform::Sine, 40.0, 1.0, 0.0);
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer), black_box(SAMPLE_RATE));
            })
        });

        // Square - sin plus signum
        let mut osc = OscillatorBlock::new(Waveform::Square, 40.0, 1.0, 0.0);
        group.bench_with_input(BenchmarkId::new("square", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer), black_box(SAMPLE_RATE));
            })
        });

        // Triangle - branch per sample
        let mut osc = OscillatorBlock::new(Waveform::Triangle, 40.0, 1.0, 0.0);
        group.bench_with_input(BenchmarkId::new("triangle", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer), black_box(SAMPLE_RATE));
            })
        });

        // Sawtooth - simple linear ramp
        let mut osc = OscillatorBlock::new(Waveform::Sawtooth, 40.0, 1.0, 0.0);
        group.bench_with_input(BenchmarkId::new("sawtooth", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer), black_box(SAMPLE_RATE));
            })
        });

        // Noise - xorshift PRNG
        let mut osc = OscillatorBlock::new(Waveform::Noise, 40.0, 1.0, 0.0);
        group.bench_with_input(BenchmarkId::new("noise", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer), black_box(SAMPLE_RATE));
            })
        });
    }

    group.finish();
}
