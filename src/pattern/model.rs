use serde::{Deserialize, Serialize};

use crate::dsp::{CurvePoint, IntensityCurve, Waveform};
use crate::pattern::condition::Condition;
use crate::MIN_DURATION_MS;

/// Intensity used when a pattern document omits the field.
pub const DEFAULT_INTENSITY: f32 = 70.0;
/// Frequency used when a pattern document omits the field. Low enough for a
/// tactile transducer, high enough to feel sharp.
pub const DEFAULT_FREQUENCY_HZ: f32 = 40.0;

/// What shape of haptic event a pattern describes.
///
/// The kind selects the amplitude envelope for single-voice patterns and
/// selects the layered compositor for `MultiLayer`/`Sequence`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    SharpPulse,
    BuildupRumble,
    SustainedRumble,
    Oscillating,
    Impact,
    Fade,
    MultiLayer,
    Sequence,
}

impl Default for PatternKind {
    fn default() -> Self {
        PatternKind::SharpPulse
    }
}

/// One voice within a `MultiLayer`/`Sequence` pattern.
///
/// A layer is active over `[start_ms, start_ms + duration_ms)`; samples
/// outside that window contribute nothing. `duration_ms == 0` means
/// "inherit the pattern duration".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PatternLayer {
    pub waveform: Waveform,
    pub frequency: f32,
    /// Amplitude in [0, 1], clamped at load.
    pub amplitude: f32,
    /// Phase offset in degrees.
    pub phase_deg: f32,
    /// Start time relative to pattern start, milliseconds.
    pub start_ms: f32,
    /// Active window length in milliseconds; 0 inherits the pattern's.
    pub duration_ms: f32,
    pub fade_in_ms: f32,
    pub fade_out_ms: f32,
    pub curve: IntensityCurve,
}

impl Default for PatternLayer {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            frequency: DEFAULT_FREQUENCY_HZ,
            amplitude: 1.0,
            phase_deg: 0.0,
            start_ms: 0.0,
            duration_ms: 0.0,
            fade_in_ms: 0.0,
            fade_out_ms: 0.0,
            curve: IntensityCurve::Linear,
        }
    }
}

/// A declarative description of one haptic event.
///
/// Every field has a serde default so pattern documents only spell out what
/// they care about; unknown fields are ignored. Numeric invariants are
/// enforced once by [`HapticPattern::normalize`], which the library loader
/// calls on every pattern it accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct HapticPattern {
    pub kind: PatternKind,
    pub waveform: Waveform,
    /// Base frequency in Hz.
    pub frequency: f32,
    /// Total duration in milliseconds. Always > 0 after normalization.
    pub duration_ms: f32,
    /// Intensity in [0, 100].
    pub intensity: f32,
    pub fade_in_ms: f32,
    pub fade_out_ms: f32,
    pub curve: IntensityCurve,
    /// Control points for `IntensityCurve::Custom`, shared by all layers.
    pub curve_points: Vec<CurvePoint>,
    /// Ordered voices for `MultiLayer` (and resolved `Sequence`) patterns.
    pub layers: Vec<PatternLayer>,
    /// Chained pattern names for `Sequence` patterns, resolved by the
    /// library into end-to-end layers.
    pub chain: Vec<String>,
    /// Predicates the event source checks before triggering.
    pub conditions: Vec<Condition>,
}

impl Default for HapticPattern {
    fn default() -> Self {
        Self {
            kind: PatternKind::SharpPulse,
            waveform: Waveform::Sine,
            frequency: DEFAULT_FREQUENCY_HZ,
            duration_ms: 250.0,
            intensity: DEFAULT_INTENSITY,
            fade_in_ms: 0.0,
            fade_out_ms: 0.0,
            curve: IntensityCurve::Linear,
            curve_points: Vec::new(),
            layers: Vec::new(),
            chain: Vec::new(),
            conditions: Vec::new(),
        }
    }
}

impl HapticPattern {
    /// Clamp out-of-range numeric fields and canonicalize the custom curve.
    ///
    /// Malformed data is recovered locally, never rejected: intensity to
    /// [0, 100], amplitudes to [0, 1], duration to a positive minimum.
    /// Custom curve points are sorted by time, clamped to the unit square,
    /// and implicit (0,0)/(1,1) endpoints are synthesized if absent.
    pub fn normalize(&mut self) {
        self.intensity = self.intensity.clamp(0.0, 100.0);
        self.duration_ms = self.duration_ms.max(MIN_DURATION_MS);
        self.frequency = self.frequency.clamp(0.0, 20_000.0);
        self.fade_in_ms = self.fade_in_ms.max(0.0);
        self.fade_out_ms = self.fade_out_ms.max(0.0);

        for layer in &mut self.layers {
            layer.amplitude = layer.amplitude.clamp(0.0, 1.0);
            layer.frequency = layer.frequency.clamp(0.0, 20_000.0);
            layer.start_ms = layer.start_ms.max(0.0);
            layer.duration_ms = layer.duration_ms.max(0.0);
            layer.fade_in_ms = layer.fade_in_ms.max(0.0);
            layer.fade_out_ms = layer.fade_out_ms.max(0.0);
        }

        for point in &mut self.curve_points {
            point.time = point.time.clamp(0.0, 1.0);
            point.intensity = point.intensity.clamp(0.0, 1.0);
        }
        self.curve_points
            .sort_by(|a, b| a.time.total_cmp(&b.time));
        if let Some(first) = self.curve_points.first() {
            if first.time > 0.0 {
                self.curve_points.insert(
                    0,
                    CurvePoint {
                        time: 0.0,
                        intensity: 0.0,
                    },
                );
            }
        }
        if let Some(last) = self.curve_points.last() {
            if last.time < 1.0 {
                self.curve_points.push(CurvePoint {
                    time: 1.0,
                    intensity: 1.0,
                });
            }
        }
    }

    /// Base intensity scaled to [0, 1] for the render path.
    #[inline]
    pub fn base_intensity(&self) -> f32 {
        self.intensity / 100.0
    }

    /// Whether this pattern renders through the layered compositor.
    #[inline]
    pub fn is_layered(&self) -> bool {
        matches!(self.kind, PatternKind::MultiLayer | PatternKind::Sequence)
    }
}
