//! The immutable pattern data model and the pattern library.
//!
//! Patterns are plain value data: the loader applies defaults and clamping
//! once at deserialization (`HapticPattern::normalize`), and nothing on the
//! render path re-validates fields per sample.

/// Condition predicates evaluated by the event source before triggering.
pub mod condition;
/// Event-name → pattern mapping, JSON load/export, built-in defaults.
pub mod library;
/// `HapticPattern`, `PatternLayer`, and their serde defaults.
pub mod model;

pub use condition::Condition;
pub use library::PatternLibrary;
pub use model::{HapticPattern, PatternKind, PatternLayer};
