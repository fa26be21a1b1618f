use std::fmt;

use crate::stream::source::SampleSource;

/// Handle for one live effect, usable for early cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectId(pub(crate) u64);

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "effect#{}", self.0)
    }
}

/// A live, time-bounded instance of a triggered pattern.
///
/// Owned exclusively by the mixer. `expires_at_frame` is the mixer-clock
/// deadline (`duration + fade_out + slack`) after which the effect is
/// removed even if its stream somehow never reports finished - the
/// poll-on-read replacement for one cleanup timer per effect.
pub(crate) struct ActiveEffect {
    pub id: EffectId,
    pub stream: Box<dyn SampleSource>,
    pub expires_at_frame: u64,
}

impl ActiveEffect {
    pub fn expired(&self, clock_frames: u64) -> bool {
        self.stream.is_finished() || clock_frames >= self.expires_at_frame
    }
}
