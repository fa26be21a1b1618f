//! Benchmarks for whole-mixer scenarios.

mod mixer;

pub use mixer::bench_mixer;
