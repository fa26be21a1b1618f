use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::engine::effect::{ActiveEffect, EffectId};
use crate::engine::rate_limit::RateLimiter;
use crate::error::TactorError;
use crate::pattern::model::HapticPattern;
use crate::stream::layered::LayeredPatternStream;
use crate::stream::single::PatternVoice;
use crate::stream::source::SampleSource;
use crate::MAX_BLOCK_SIZE;

/// Slack added to every effect's expiry deadline so a stream is never cut
/// off mid-fade by clock rounding.
const EXPIRY_SLACK_MS: f32 = 100.0;

/*
Mixer / Effect Lifecycle
========================

The mixer owns the set of currently-playing effects and produces the final
output stream the device adapter pulls.

Threading model: one hardware pull thread calls `read` at a fixed cadence;
`trigger`, `stop`, and `stop_all` arrive from arbitrary caller threads. A
single mutex guards the active-effect collection. `read` holds it across
the whole render walk: that is bounded compute with no I/O, so a concurrent
`trigger` waits at most one buffer's worth of math and never observes a
half-mixed collection. Effect expiry is a
deadline on the mixer's own sample clock, checked on every `read` pass, so
there is no cleanup timer to race with a manual `stop`: removal is a retain
on id either way, and removing an already-gone effect is a no-op.

`read` preallocates its scratch buffer at construction and renders in
MAX_BLOCK_SIZE chunks, so the callback path never allocates. Summation is
plain addition - commutative, so concurrent triggers mix identically in any
order. The final output is clamped to full scale as a safety limiter.
*/

struct Shared {
    effects: Mutex<Vec<ActiveEffect>>,
    scratch: Mutex<Vec<f32>>,
    rate_limiter: Mutex<Option<RateLimiter>>,
    next_id: AtomicU64,
    /// Frames rendered so far; the mixer's clock for expiry deadlines.
    clock_frames: AtomicU64,
    /// Cleared during reinitialization: triggers are dropped, not queued.
    accepting: AtomicBool,
    /// Render rate as f32 bits, so every clone observes renegotiation with
    /// the output device.
    sample_rate_bits: AtomicU32,
}

/// Cloneable handle to the shared mixer state.
#[derive(Clone)]
pub struct Mixer {
    shared: Arc<Shared>,
}

impl Mixer {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            shared: Arc::new(Shared {
                effects: Mutex::new(Vec::new()),
                scratch: Mutex::new(vec![0.0; MAX_BLOCK_SIZE]),
                rate_limiter: Mutex::new(None),
                next_id: AtomicU64::new(1),
                clock_frames: AtomicU64::new(0),
                accepting: AtomicBool::new(true),
                sample_rate_bits: AtomicU32::new(sample_rate.to_bits()),
            }),
        }
    }

    /// Attach a rate limiter consulted on every named trigger.
    pub fn with_rate_limiter(self, min_interval: Duration) -> Self {
        *self.shared.rate_limiter.lock() = Some(RateLimiter::new(min_interval));
        self
    }

    pub fn sample_rate(&self) -> f32 {
        f32::from_bits(self.shared.sample_rate_bits.load(Ordering::Acquire))
    }

    /// Adopt the rate the output stream actually negotiated.
    ///
    /// Effects already playing were synthesized at the old rate and would
    /// come out pitch-shifted with the wrong duration, so a real change
    /// drops them; patterns triggered afterwards render at the new rate.
    pub(crate) fn set_sample_rate(&self, sample_rate: f32) {
        let previous = self.sample_rate();
        if sample_rate == previous {
            return;
        }
        self.shared
            .sample_rate_bits
            .store(sample_rate.to_bits(), Ordering::Release);

        let mut effects = self.shared.effects.lock();
        if !effects.is_empty() {
            log::warn!(
                "sample rate changed {previous} -> {sample_rate}; dropping {} active effects",
                effects.len()
            );
            effects.clear();
        }
    }

    /// Start playing a pattern. Returns an id usable for early cancellation.
    ///
    /// A pattern triggered while another instance of it is still playing
    /// becomes a new, independent effect - both play to completion.
    pub fn trigger(&self, pattern: &HapticPattern) -> Result<EffectId, TactorError> {
        self.trigger_named(pattern, None)
    }

    /// `trigger` with an event name for rate limiting and logging.
    pub fn trigger_named(
        &self,
        pattern: &HapticPattern,
        name: Option<&str>,
    ) -> Result<EffectId, TactorError> {
        if !self.shared.accepting.load(Ordering::Acquire) {
            log::warn!("trigger dropped: mixer is reinitializing");
            return Err(TactorError::Reinitializing);
        }

        if let Some(name) = name {
            if let Some(limiter) = self.shared.rate_limiter.lock().as_mut() {
                if !limiter.allow(name) {
                    log::debug!("trigger for '{name}' rate limited");
                    return Err(TactorError::RateLimited(name.to_string()));
                }
            }
        }

        let sample_rate = self.sample_rate();
        let stream: Box<dyn SampleSource> = if pattern.is_layered() {
            Box::new(LayeredPatternStream::new(pattern, sample_rate))
        } else {
            Box::new(PatternVoice::new(pattern, sample_rate))
        };

        let id = EffectId(self.shared.next_id.fetch_add(1, Ordering::Relaxed));
        let lifetime_ms = pattern.duration_ms + pattern.fade_out_ms + EXPIRY_SLACK_MS;
        let lifetime_frames = (lifetime_ms / 1000.0 * sample_rate).ceil() as u64;
        let expires_at_frame = self.shared.clock_frames.load(Ordering::Acquire) + lifetime_frames;

        self.shared.effects.lock().push(ActiveEffect {
            id,
            stream,
            expires_at_frame,
        });
        log::debug!(
            "{id} started: {:?} {}ms @{}",
            pattern.kind,
            pattern.duration_ms,
            name.unwrap_or("<anonymous>")
        );
        Ok(id)
    }

    /// Remove one effect immediately. Idempotent: stopping an effect that
    /// already ended (or was never started) is a no-op.
    pub fn stop(&self, id: EffectId) {
        let mut effects = self.shared.effects.lock();
        let before = effects.len();
        effects.retain(|effect| effect.id != id);
        if effects.len() < before {
            log::debug!("{id} stopped");
        }
    }

    /// Remove every active effect immediately.
    pub fn stop_all(&self) {
        let mut effects = self.shared.effects.lock();
        if !effects.is_empty() {
            log::debug!("stopping {} active effects", effects.len());
            effects.clear();
        }
    }

    pub fn active_count(&self) -> usize {
        self.shared.effects.lock().len()
    }

    /// Render the mixed output of every active effect into `out`.
    ///
    /// Always fills the entire buffer (exhausted inputs pad with silence)
    /// and returns `out.len()`, keeping the playback cadence glitch-free.
    /// Runs on the audio callback path: no allocation, no blocking I/O.
    pub fn read(&self, out: &mut [f32]) -> usize {
        out.fill(0.0);

        let clock = self.shared.clock_frames.load(Ordering::Acquire);
        {
            let mut effects = self.shared.effects.lock();
            let mut scratch = self.shared.scratch.lock();

            for chunk_index in 0..out.len().div_ceil(MAX_BLOCK_SIZE) {
                let start = chunk_index * MAX_BLOCK_SIZE;
                let end = (start + MAX_BLOCK_SIZE).min(out.len());
                let chunk = &mut out[start..end];

                for effect in effects.iter_mut() {
                    let n = effect.stream.render(&mut scratch[..chunk.len()]);
                    crate::dsp::mix::sum_in_place(chunk, &scratch[..n]);
                }
            }

            let now = clock + out.len() as u64;
            effects.retain(|effect| !effect.expired(now));
        }

        // Safety limiter: overlapping effects each respect their own
        // intensity ceiling, but their sum can still exceed full scale.
        crate::dsp::mix::clamp_in_place(out, 1.0);

        self.shared
            .clock_frames
            .fetch_add(out.len() as u64, Ordering::AcqRel);
        out.len()
    }

    /// Gate used by the device adapter while rebuilding the output stream.
    /// While closed, triggers are dropped with a warning.
    pub(crate) fn set_accepting(&self, accepting: bool) {
        self.shared.accepting.store(accepting, Ordering::Release);
        if accepting {
            if let Some(limiter) = self.shared.rate_limiter.lock().as_mut() {
                limiter.reset();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::model::PatternKind;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn pulse(duration_ms: f32) -> HapticPattern {
        let mut pattern = HapticPattern {
            kind: PatternKind::SustainedRumble,
            frequency: 40.0,
            duration_ms,
            intensity: 50.0,
            ..Default::default()
        };
        pattern.normalize();
        pattern
    }

    #[test]
    fn read_always_fills_the_whole_buffer() {
        let mixer = Mixer::new(SAMPLE_RATE);
        let mut buffer = [1.0f32; 512];

        // No effects: full buffer of silence.
        assert_eq!(mixer.read(&mut buffer), 512);
        assert!(buffer.iter().all(|s| *s == 0.0));

        // One short effect: still a full buffer, tail silence-padded.
        mixer.trigger(&pulse(1.0)).unwrap();
        let mut buffer = [1.0f32; 512];
        assert_eq!(mixer.read(&mut buffer), 512);
        assert!(buffer[..48].iter().any(|s| s.abs() > 0.0));
        assert!(buffer[100..].iter().all(|s| *s == 0.0));
    }

    #[test]
    fn finished_effects_are_removed_on_read() {
        let mixer = Mixer::new(SAMPLE_RATE);
        mixer.trigger(&pulse(1.0)).unwrap();
        assert_eq!(mixer.active_count(), 1);

        let mut buffer = [0.0f32; 512];
        mixer.read(&mut buffer);
        assert_eq!(mixer.active_count(), 0);
    }

    #[test]
    fn stop_removes_the_effect_before_the_next_read() {
        let mixer = Mixer::new(SAMPLE_RATE);
        let id = mixer.trigger(&pulse(10_000.0)).unwrap();

        let mut buffer = [0.0f32; 256];
        mixer.read(&mut buffer);
        assert!(buffer.iter().any(|s| s.abs() > 0.0));

        mixer.stop(id);
        let mut buffer = [0.0f32; 256];
        mixer.read(&mut buffer);
        assert!(buffer.iter().all(|s| *s == 0.0));

        // Stopping again is a harmless no-op.
        mixer.stop(id);
    }

    #[test]
    fn stop_all_clears_everything() {
        let mixer = Mixer::new(SAMPLE_RATE);
        mixer.trigger(&pulse(10_000.0)).unwrap();
        mixer.trigger(&pulse(10_000.0)).unwrap();
        assert_eq!(mixer.active_count(), 2);
        mixer.stop_all();
        assert_eq!(mixer.active_count(), 0);
    }

    #[test]
    fn mixing_is_commutative() {
        let a = pulse(500.0);
        let mut b = pulse(500.0);
        b.frequency = 55.0;
        b.intensity = 30.0;

        let render = |first: &HapticPattern, second: &HapticPattern| -> Vec<f32> {
            let mixer = Mixer::new(SAMPLE_RATE);
            mixer.trigger(first).unwrap();
            mixer.trigger(second).unwrap();
            let mut out = vec![0.0f32; 24_000];
            mixer.read(&mut out);
            out
        };

        assert_eq!(render(&a, &b), render(&b, &a));
    }

    #[test]
    fn same_pattern_twice_is_two_independent_effects() {
        let mixer = Mixer::new(SAMPLE_RATE);
        let first = mixer.trigger(&pulse(10_000.0)).unwrap();
        let second = mixer.trigger(&pulse(10_000.0)).unwrap();
        assert_ne!(first, second);
        assert_eq!(mixer.active_count(), 2);

        // Two identical in-phase effects sum to double one alone.
        let mut both = vec![0.0f32; 4800];
        mixer.read(&mut both);

        let solo_mixer = Mixer::new(SAMPLE_RATE);
        solo_mixer.trigger(&pulse(10_000.0)).unwrap();
        let mut solo = vec![0.0f32; 4800];
        solo_mixer.read(&mut solo);

        for (b, s) in both.iter().zip(solo.iter()) {
            assert!((b - s * 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn rate_limiter_collapses_rapid_triggers() {
        let mixer = Mixer::new(SAMPLE_RATE).with_rate_limiter(Duration::from_secs(60));
        assert!(mixer.trigger_named(&pulse(100.0), Some("impact")).is_ok());
        assert!(matches!(
            mixer.trigger_named(&pulse(100.0), Some("impact")),
            Err(TactorError::RateLimited(_))
        ));
        // Anonymous triggers bypass the limiter.
        assert!(mixer.trigger_named(&pulse(100.0), None).is_ok());
    }

    #[test]
    fn triggers_are_dropped_while_not_accepting() {
        let mixer = Mixer::new(SAMPLE_RATE);
        mixer.set_accepting(false);
        assert!(matches!(
            mixer.trigger(&pulse(100.0)),
            Err(TactorError::Reinitializing)
        ));
        mixer.set_accepting(true);
        assert!(mixer.trigger(&pulse(100.0)).is_ok());
    }

    #[test]
    fn adopted_sample_rate_rescales_pattern_durations() {
        let mixer = Mixer::new(SAMPLE_RATE);
        mixer.set_sample_rate(44_100.0);
        assert_eq!(mixer.sample_rate(), 44_100.0);

        // A 1s pattern now spans 44100 frames, not 48000.
        mixer.trigger(&pulse(1000.0)).unwrap();
        let mut buffer = vec![0.0f32; 44_100];
        mixer.read(&mut buffer);
        assert!(buffer[43_500..].iter().any(|s| s.abs() > 0.01));

        let mut after = vec![0.0f32; 512];
        mixer.read(&mut after);
        assert!(after.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn rate_change_drops_effects_synthesized_at_the_old_rate() {
        let mixer = Mixer::new(SAMPLE_RATE);
        mixer.trigger(&pulse(10_000.0)).unwrap();
        mixer.set_sample_rate(44_100.0);
        assert_eq!(mixer.active_count(), 0);

        // Setting the same rate again is a no-op and keeps effects.
        mixer.trigger(&pulse(10_000.0)).unwrap();
        mixer.set_sample_rate(44_100.0);
        assert_eq!(mixer.active_count(), 1);
    }

    #[test]
    fn expiry_deadline_removes_stuck_effects() {
        let mixer = Mixer::new(SAMPLE_RATE);
        mixer.trigger(&pulse(10.0)).unwrap();

        // 10ms pattern + 100ms slack: after ~0.2s of reads it must be gone.
        let mut buffer = [0.0f32; 2048];
        for _ in 0..5 {
            mixer.read(&mut buffer);
        }
        assert_eq!(mixer.active_count(), 0);
    }
}
