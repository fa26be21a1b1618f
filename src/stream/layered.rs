use crate::dsp::curve::{intensity_at, CurvePoint, IntensityCurve};
use crate::dsp::fade::FadeWindow;
use crate::dsp::mix::clamp_in_place;
use crate::dsp::oscillator::OscillatorBlock;
use crate::pattern::model::{HapticPattern, PatternLayer};
use crate::stream::source::SampleSource;
use crate::MAX_BLOCK_SIZE;

/*
Multi-Layer Pattern Compositor
==============================

Renders a pattern containing independently timed voices into one stream.

Per chunk, starting at global frame position p:

  1. Zero the output chunk.
  2. For each layer, compute its absolute window [start, start+duration) in
     milliseconds (duration 0 inherits the pattern duration). Skip the layer
     when the window misses [chunk_start, chunk_end).
  3. Pull raw oscillator samples for the whole chunk into a preallocated
     scratch buffer.
  4. For every chunk sample whose absolute time falls inside the window,
     accumulate raw · curve(layer_progress, base=intensity/100) · amplitude
     · fade. Layer-local progress runs 0→1 over the layer's own window.
  5. Clamp each output sample to ±intensity/100 - overlapping layers sum,
     and the clamp keeps summation from exceeding the pattern's ceiling.
  6. Advance the global position, bounded by the pattern duration; return 0
     once exhausted.

A layer whose window opens mid-chunk contributes only from its start sample
onward. Fade windows wider than the layer's duration scale proportionally
(see dsp::fade) so the multipliers never invert.
*/

struct LayerVoice {
    osc: OscillatorBlock,
    start_ms: f32,
    duration_ms: f32,
    amplitude: f32,
    curve: IntensityCurve,
    fade: FadeWindow,
}

impl LayerVoice {
    fn new(layer: &PatternLayer, pattern_duration_ms: f32) -> Self {
        let duration_ms = if layer.duration_ms > 0.0 {
            layer.duration_ms
        } else {
            pattern_duration_ms
        };
        Self {
            osc: OscillatorBlock::new(
                layer.waveform,
                layer.frequency,
                1.0,
                layer.phase_deg,
            ),
            start_ms: layer.start_ms,
            duration_ms,
            amplitude: layer.amplitude.clamp(0.0, 1.0),
            curve: layer.curve,
            fade: FadeWindow::new(layer.fade_in_ms, layer.fade_out_ms, duration_ms),
        }
    }

    #[inline]
    fn end_ms(&self) -> f32 {
        self.start_ms + self.duration_ms
    }
}

pub struct LayeredPatternStream {
    layers: Vec<LayerVoice>,
    curve_points: Vec<CurvePoint>,
    scratch: Vec<f32>,
    base_intensity: f32,
    sample_rate: f32,
    position: u64,
    total_frames: u64,
}

impl LayeredPatternStream {
    /// Build the compositor for a pattern. A pattern that declares no layers
    /// gets one implicit layer covering the whole duration with the
    /// pattern's own waveform, frequency, and curve.
    pub fn new(pattern: &HapticPattern, sample_rate: f32) -> Self {
        let duration_ms = pattern.duration_ms;
        let layers: Vec<LayerVoice> = if pattern.layers.is_empty() {
            vec![LayerVoice::new(
                &PatternLayer {
                    waveform: pattern.waveform,
                    frequency: pattern.frequency,
                    amplitude: 1.0,
                    fade_in_ms: pattern.fade_in_ms,
                    fade_out_ms: pattern.fade_out_ms,
                    curve: pattern.curve,
                    ..Default::default()
                },
                duration_ms,
            )]
        } else {
            pattern
                .layers
                .iter()
                .map(|layer| LayerVoice::new(layer, duration_ms))
                .collect()
        };

        Self {
            layers,
            curve_points: pattern.curve_points.clone(),
            scratch: vec![0.0; MAX_BLOCK_SIZE],
            base_intensity: pattern.base_intensity(),
            sample_rate,
            position: 0,
            total_frames: (duration_ms / 1000.0 * sample_rate).round().max(1.0) as u64,
        }
    }

    fn render_chunk(&mut self, out: &mut [f32]) -> usize {
        let remaining = self.total_frames.saturating_sub(self.position) as usize;
        let frames = out.len().min(remaining).min(self.scratch.len());
        if frames == 0 {
            return 0;
        }

        out[..frames].fill(0.0);

        let ms_per_frame = 1000.0 / self.sample_rate;
        let chunk_start_ms = self.position as f32 * ms_per_frame;
        let chunk_end_ms = chunk_start_ms + frames as f32 * ms_per_frame;

        for layer in &mut self.layers {
            if layer.end_ms() <= chunk_start_ms || layer.start_ms >= chunk_end_ms {
                continue;
            }

            let scratch = &mut self.scratch[..frames];
            layer.osc.render(scratch, self.sample_rate);

            for (i, (&raw, sample)) in scratch.iter().zip(out.iter_mut()).enumerate() {
                let abs_ms = chunk_start_ms + i as f32 * ms_per_frame;
                if abs_ms < layer.start_ms || abs_ms >= layer.end_ms() {
                    continue;
                }
                let local_ms = abs_ms - layer.start_ms;
                let progress = local_ms / layer.duration_ms;
                let curve_value =
                    intensity_at(layer.curve, progress, self.base_intensity, &self.curve_points);
                let fade_mult = layer.fade.gain_at(local_ms);
                *sample += raw * curve_value * layer.amplitude * fade_mult;
            }
        }

        clamp_in_place(&mut out[..frames], self.base_intensity);
        self.position += frames as u64;
        frames
    }
}

impl SampleSource for LayeredPatternStream {
    fn render(&mut self, out: &mut [f32]) -> usize {
        let mut written = 0;
        while written < out.len() {
            let n = self.render_chunk(&mut out[written..]);
            if n == 0 {
                break;
            }
            written += n;
        }
        out[written..].fill(0.0);
        written
    }

    fn is_finished(&self) -> bool {
        self.position >= self.total_frames
    }
}
