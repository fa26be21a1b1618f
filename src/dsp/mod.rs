//! Low-level DSP primitives used by the higher level pattern streams.
//!
//! These components are allocation-free and realtime-safe, making them safe
//! to embed directly inside effect structs. They intentionally stay focused
//! on the signal math so the stream and engine layers can handle timing,
//! layering, and concurrency.

/// Intensity-curve evaluation (linear, eased, and custom point curves).
pub mod curve;
/// Linear fade-in/fade-out window math.
pub mod fade;
/// Buffer summing and clamping helpers.
pub mod mix;
/// Oscillator waveforms and the noise source.
pub mod oscillator;

pub use curve::{CurvePoint, IntensityCurve};
pub use oscillator::{OscillatorBlock, Waveform};
