use crate::dsp::curve::{intensity_at, CurvePoint, IntensityCurve};
use crate::dsp::fade::FadeWindow;
use crate::dsp::oscillator::OscillatorBlock;
use crate::pattern::model::{HapticPattern, PatternKind};
use crate::stream::source::SampleSource;

/// Tremolo rate for `Oscillating` patterns. Sits in the classic 2-7 Hz
/// tremolo band, fast enough to feel like pulsing rather than a swell.
const TREMOLO_RATE_HZ: f32 = 5.0;

/// Attack ramp for `SharpPulse` before its decay takes over.
const PULSE_ATTACK_MS: f32 = 5.0;

/*
Single-Voice Pattern Stream
===========================

Non-layered pattern kinds render through one oscillator shaped by three
multipliers evaluated per sample:

  shape        The kind envelope. SharpPulse ramps up over 5ms then decays
               with (1-t)^2; Impact skips the attack and decays cubically;
               BuildupRumble ramps linearly upward; SustainedRumble holds
               1.0; Oscillating applies a 5 Hz tremolo; Fade ramps down.

  curve        The pattern's intensity curve - only applied when non-linear.
               A Linear curve means "no curve shaping" for single voices
               (otherwise every sustained pattern would ramp from silence).

  fade         Linear fade-in/out ramps from the pattern's fade fields,
               sharing the proportional-overlap policy in dsp::fade.

The product of all three times the base intensity (0-1) scales each raw
oscillator sample. The stream ends exactly at the pattern duration.
*/

pub struct PatternVoice {
    osc: OscillatorBlock,
    kind: PatternKind,
    curve: IntensityCurve,
    curve_points: Vec<CurvePoint>,
    fade: FadeWindow,
    base_intensity: f32,
    duration_ms: f32,
    sample_rate: f32,
    position: u64,
    total_frames: u64,
}

impl PatternVoice {
    pub fn new(pattern: &HapticPattern, sample_rate: f32) -> Self {
        let duration_ms = pattern.duration_ms;
        let total_frames = (duration_ms / 1000.0 * sample_rate).round().max(1.0) as u64;

        Self {
            osc: OscillatorBlock::new(pattern.waveform, pattern.frequency, 1.0, 0.0),
            kind: pattern.kind,
            curve: pattern.curve,
            curve_points: pattern.curve_points.clone(),
            fade: FadeWindow::new(pattern.fade_in_ms, pattern.fade_out_ms, duration_ms),
            base_intensity: pattern.base_intensity(),
            duration_ms,
            sample_rate,
            position: 0,
            total_frames,
        }
    }

    #[inline]
    fn shape_at(&self, progress: f32, t_ms: f32) -> f32 {
        match self.kind {
            PatternKind::SharpPulse => {
                let attack = (t_ms / PULSE_ATTACK_MS).min(1.0);
                let decay = (1.0 - progress).max(0.0);
                attack * decay * decay
            }
            PatternKind::Impact => {
                let decay = (1.0 - progress).max(0.0);
                decay * decay * decay
            }
            PatternKind::BuildupRumble => progress,
            PatternKind::SustainedRumble => 1.0,
            PatternKind::Oscillating => {
                let t_secs = t_ms / 1000.0;
                0.5 * (1.0 + (std::f32::consts::TAU * TREMOLO_RATE_HZ * t_secs).sin())
            }
            PatternKind::Fade => (1.0 - progress).max(0.0),
            // Layered kinds never reach a PatternVoice; render flat if they do.
            PatternKind::MultiLayer | PatternKind::Sequence => 1.0,
        }
    }
}

impl SampleSource for PatternVoice {
    fn render(&mut self, out: &mut [f32]) -> usize {
        let remaining = self.total_frames.saturating_sub(self.position) as usize;
        let frames = out.len().min(remaining);
        if frames == 0 {
            return 0;
        }

        for (i, sample) in out.iter_mut().take(frames).enumerate() {
            let raw = self.osc.next_sample(self.sample_rate);
            let t_ms = (self.position + i as u64) as f32 / self.sample_rate * 1000.0;
            let progress = (t_ms / self.duration_ms).clamp(0.0, 1.0);

            let shape = self.shape_at(progress, t_ms);
            let curve_mult = if self.curve == IntensityCurve::Linear {
                1.0
            } else {
                intensity_at(self.curve, progress, 1.0, &self.curve_points)
            };
            let fade_mult = self.fade.gain_at(t_ms);

            *sample = raw * shape * curve_mult * fade_mult * self.base_intensity;
        }
        out[frames..].fill(0.0);

        self.position += frames as u64;
        frames
    }

    fn is_finished(&self) -> bool {
        self.position >= self.total_frames
    }
}
