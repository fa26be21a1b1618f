//! Linear fade-in/fade-out window math.
//!
//! Fade policy: if `fade_in + fade_out` exceeds the window's duration, both
//! fades are scaled by `duration / (fade_in + fade_out)` so the two ramps
//! meet instead of inverting. This is the one policy used everywhere -
//! layers and single-pattern voices alike.

/// Precomputed fade ramps for one active window. All times in milliseconds,
/// relative to the window start.
#[derive(Debug, Clone, Copy)]
pub struct FadeWindow {
    fade_in_ms: f32,
    fade_out_ms: f32,
    duration_ms: f32,
}

impl FadeWindow {
    pub fn new(fade_in_ms: f32, fade_out_ms: f32, duration_ms: f32) -> Self {
        let duration_ms = duration_ms.max(0.0);
        let mut fade_in_ms = fade_in_ms.max(0.0);
        let mut fade_out_ms = fade_out_ms.max(0.0);

        let total = fade_in_ms + fade_out_ms;
        if total > duration_ms && total > 0.0 {
            let scale = duration_ms / total;
            fade_in_ms *= scale;
            fade_out_ms *= scale;
        }

        Self {
            fade_in_ms,
            fade_out_ms,
            duration_ms,
        }
    }

    /// Fade gain at `t_ms` (relative to window start), in [0, 1].
    #[inline]
    pub fn gain_at(&self, t_ms: f32) -> f32 {
        if t_ms < 0.0 || t_ms >= self.duration_ms {
            return 0.0;
        }

        let mut gain = 1.0f32;
        if self.fade_in_ms > 0.0 && t_ms < self.fade_in_ms {
            gain *= t_ms / self.fade_in_ms;
        }
        let remaining = self.duration_ms - t_ms;
        if self.fade_out_ms > 0.0 && remaining < self.fade_out_ms {
            gain *= remaining / self.fade_out_ms;
        }
        gain.clamp(0.0, 1.0)
    }
}
