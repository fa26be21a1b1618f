//! Benchmarks for intensity curve evaluation, which runs once per sample on
//! the render path.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tactor_dsp::dsp::curve::intensity_at;
use tactor_dsp::dsp::{CurvePoint, IntensityCurve};

use crate::BLOCK_SIZES;

pub fn bench_curve(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/curve");

    let analytic = [
        ("linear", IntensityCurve::Linear),
        ("exponential", IntensityCurve::Exponential),
        ("logarithmic", IntensityCurve::Logarithmic),
        ("sine", IntensityCurve::Sine),
        ("bounce", IntensityCurve::Bounce),
    ];

    for &size in BLOCK_SIZES {
        for (name, curve) in analytic {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for i in 0..size {
                        let t = i as f32 / size as f32;
                        black_box(intensity_at(black_box(curve), t, 0.8, &[]));
                    }
                })
            });
        }

        // Custom - linear scan over a typical point count
        let points: Vec<CurvePoint> = (0..=8)
            .map(|i| CurvePoint {
                time: i as f32 / 8.0,
                intensity: (i % 3) as f32 / 2.0,
            })
            .collect();
        group.bench_with_input(BenchmarkId::new("custom_9pt", size), &size, |b, _| {
            b.iter(|| {
                for i in 0..size {
                    let t = i as f32 / size as f32;
                    black_box(intensity_at(IntensityCurve::Custom, t, 0.8, black_box(&points)));
                }
            })
        });
    }

    group.finish();
}
