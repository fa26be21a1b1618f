//! Pull-based sample streams: one per live effect.
//!
//! A stream owns everything needed to render one triggered pattern - the
//! oscillators, fades, and curve state - and produces mono samples until the
//! pattern's duration elapses. The mixer owns streams and sums them.

/// The multi-layer timed compositor.
pub mod layered;
/// One oscillator wrapped with a pattern-kind envelope.
pub mod single;
/// The `SampleSource` trait shared by all streams.
pub mod source;

pub use layered::LayeredPatternStream;
pub use single::PatternVoice;
pub use source::SampleSource;
