pub mod dsp;
pub mod engine; // Mixer, effect lifecycle, rate limiting
pub mod error;
pub mod io; // Device output via cpal
pub mod pattern; // Pattern data model and library
pub mod stream; // Pull-based sample sources

pub use engine::mixer::Mixer;
pub use error::TactorError;
pub use pattern::model::{HapticPattern, PatternKind, PatternLayer};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub const DEFAULT_SAMPLE_RATE: f32 = 48_000.0;
pub(crate) const MIN_DURATION_MS: f32 = 1.0;
