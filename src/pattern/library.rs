use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dsp::IntensityCurve;
use crate::error::TactorError;
use crate::pattern::model::{HapticPattern, PatternKind, PatternLayer};

/// A named collection of haptic patterns.
///
/// This is the loader side of the pattern-repository contract: patterns come
/// in as a JSON document mapping event names to pattern objects, every
/// accepted pattern is normalized once, and `Sequence` patterns are resolved
/// into end-to-end layers so the mixer never needs to chase name references
/// at trigger time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternLibrary {
    patterns: HashMap<String, HapticPattern>,
}

impl PatternLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a pattern pack from JSON. Unknown fields inside patterns are
    /// ignored; missing optional fields take their documented defaults.
    pub fn from_json_str(json: &str) -> Result<Self, TactorError> {
        let mut library: PatternLibrary = serde_json::from_str(json)?;
        library.finalize();
        log::info!("loaded pattern pack with {} patterns", library.len());
        Ok(library)
    }

    /// Export the library as a pretty-printed JSON pattern pack.
    pub fn to_json_string(&self) -> Result<String, TactorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Insert (or replace) a pattern under an event name. The pattern is
    /// normalized on the way in.
    pub fn insert(&mut self, name: impl Into<String>, mut pattern: HapticPattern) {
        pattern.normalize();
        self.patterns.insert(name.into(), pattern);
    }

    /// Merge another pack into this one; incoming names win.
    pub fn merge(&mut self, other: PatternLibrary) {
        self.patterns.extend(other.patterns);
        self.resolve_sequences();
    }

    pub fn get(&self, name: &str) -> Option<&HapticPattern> {
        self.patterns.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.patterns.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    fn finalize(&mut self) {
        for pattern in self.patterns.values_mut() {
            pattern.normalize();
        }
        self.resolve_sequences();
    }

    /// Flatten every `Sequence` pattern's chain into layers laid end to end.
    ///
    /// Each chained name contributes one layer carrying that pattern's
    /// waveform, frequency, curve, and fades, starting where the previous
    /// layer ended; the chained pattern's own intensity becomes the layer
    /// amplitude. Unknown names are skipped with a warning.
    fn resolve_sequences(&mut self) {
        let sequence_names: Vec<String> = self
            .patterns
            .iter()
            .filter(|(_, p)| p.kind == PatternKind::Sequence && !p.chain.is_empty())
            .map(|(name, _)| name.clone())
            .collect();

        for name in sequence_names {
            let chain = self.patterns[&name].chain.clone();
            let mut layers = Vec::with_capacity(chain.len());
            let mut cursor_ms = 0.0f32;

            for link in &chain {
                let Some(linked) = self.patterns.get(link) else {
                    log::warn!("sequence '{name}' references unknown pattern '{link}'; skipping");
                    continue;
                };
                if linked.kind == PatternKind::Sequence {
                    log::warn!("sequence '{name}' nests sequence '{link}'; skipping");
                    continue;
                }
                layers.push(PatternLayer {
                    waveform: linked.waveform,
                    frequency: linked.frequency,
                    amplitude: linked.base_intensity(),
                    phase_deg: 0.0,
                    start_ms: cursor_ms,
                    duration_ms: linked.duration_ms,
                    fade_in_ms: linked.fade_in_ms,
                    fade_out_ms: linked.fade_out_ms,
                    curve: linked.curve,
                });
                cursor_ms += linked.duration_ms;
            }

            let pattern = self.patterns.get_mut(&name).unwrap();
            pattern.layers = layers;
            if cursor_ms > 0.0 {
                pattern.duration_ms = cursor_ms;
            }
            pattern.normalize();
        }
    }

    /// The built-in default pattern set.
    pub fn builtin() -> Self {
        let mut library = Self::new();

        library.insert(
            "impact",
            HapticPattern {
                kind: PatternKind::Impact,
                frequency: 45.0,
                duration_ms: 350.0,
                intensity: 85.0,
                curve: IntensityCurve::Bounce,
                ..Default::default()
            },
        );
        library.insert(
            "sharp_pulse",
            HapticPattern {
                kind: PatternKind::SharpPulse,
                frequency: 40.0,
                duration_ms: 200.0,
                intensity: 70.0,
                ..Default::default()
            },
        );
        library.insert(
            "buildup",
            HapticPattern {
                kind: PatternKind::BuildupRumble,
                frequency: 32.0,
                duration_ms: 2000.0,
                intensity: 75.0,
                fade_out_ms: 250.0,
                curve: IntensityCurve::Exponential,
                ..Default::default()
            },
        );
        library.insert(
            "sustained",
            HapticPattern {
                kind: PatternKind::SustainedRumble,
                frequency: 35.0,
                duration_ms: 1500.0,
                intensity: 60.0,
                fade_in_ms: 100.0,
                fade_out_ms: 200.0,
                ..Default::default()
            },
        );
        library.insert(
            "oscillating",
            HapticPattern {
                kind: PatternKind::Oscillating,
                frequency: 38.0,
                duration_ms: 1200.0,
                intensity: 65.0,
                ..Default::default()
            },
        );
        library.insert(
            "heartbeat",
            HapticPattern {
                kind: PatternKind::MultiLayer,
                duration_ms: 900.0,
                intensity: 80.0,
                layers: vec![
                    PatternLayer {
                        frequency: 50.0,
                        start_ms: 0.0,
                        duration_ms: 150.0,
                        fade_out_ms: 60.0,
                        curve: IntensityCurve::Sine,
                        ..Default::default()
                    },
                    PatternLayer {
                        frequency: 42.0,
                        amplitude: 0.7,
                        start_ms: 300.0,
                        duration_ms: 150.0,
                        fade_out_ms: 60.0,
                        curve: IntensityCurve::Sine,
                        ..Default::default()
                    },
                ],
                ..Default::default()
            },
        );

        let mut sequence = HapticPattern {
            kind: PatternKind::Sequence,
            intensity: 100.0,
            chain: vec!["impact".to_string(), "sustained".to_string()],
            ..Default::default()
        };
        sequence.normalize();
        library.patterns.insert("thud_then_rumble".to_string(), sequence);
        library.resolve_sequences();

        library
    }
}
