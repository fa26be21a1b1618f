//! Benchmarks for low-level DSP primitives.

mod curve;
mod oscillator;

pub use curve::bench_curve;
pub use oscillator::bench_oscillator;
