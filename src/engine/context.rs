use crate::pattern::model::HapticPattern;

/// Event metadata supplied alongside a trigger.
///
/// The core performs no game-specific interpretation of these values; they
/// exist so the *caller* can pre-scale a pattern before handing it to the
/// mixer, and so `Condition` predicates have something to evaluate against.
#[derive(Debug, Clone, Default)]
pub struct TriggerContext {
    /// Remaining health as a fraction, 0..1.
    pub health_fraction: Option<f32>,
    /// Damage dealt by the triggering event as a fraction, 0..1.
    pub damage_fraction: Option<f32>,
    /// Mass class of the involved ship; heavier classes feel lower-pitched.
    pub mass_class: Option<f32>,
    /// Ship type name, matched by `Condition::ShipTypeContains`.
    pub ship_type: Option<String>,
    /// Recent event rate in events/second.
    pub event_rate: Option<f32>,
}

impl TriggerContext {
    /// Produce a copy of `pattern` scaled by this context.
    ///
    /// Damage scales intensity (half strength at zero damage, full at 1.0);
    /// mass class lowers the base frequency (heavier = deeper). The result
    /// is re-normalized so scaling can never violate pattern invariants.
    pub fn scaled(&self, pattern: &HapticPattern) -> HapticPattern {
        let mut scaled = pattern.clone();

        if let Some(damage) = self.damage_fraction {
            let damage = damage.clamp(0.0, 1.0);
            scaled.intensity *= 0.5 + 0.5 * damage;
        }
        if let Some(mass) = self.mass_class {
            if mass > 0.0 {
                let shift = 1.0 / mass.sqrt();
                scaled.frequency *= shift;
                for layer in &mut scaled.layers {
                    layer.frequency *= shift;
                }
            }
        }

        scaled.normalize();
        scaled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_context_leaves_the_pattern_alone() {
        let pattern = HapticPattern::default();
        let scaled = TriggerContext::default().scaled(&pattern);
        assert_eq!(scaled.intensity, pattern.intensity);
        assert_eq!(scaled.frequency, pattern.frequency);
    }

    #[test]
    fn damage_scales_intensity() {
        let pattern = HapticPattern {
            intensity: 80.0,
            ..Default::default()
        };

        let light = TriggerContext {
            damage_fraction: Some(0.0),
            ..Default::default()
        };
        assert!((light.scaled(&pattern).intensity - 40.0).abs() < 1e-4);

        let heavy = TriggerContext {
            damage_fraction: Some(1.0),
            ..Default::default()
        };
        assert!((heavy.scaled(&pattern).intensity - 80.0).abs() < 1e-4);
    }

    #[test]
    fn mass_class_lowers_frequency() {
        let pattern = HapticPattern {
            frequency: 40.0,
            ..Default::default()
        };
        let ctx = TriggerContext {
            mass_class: Some(4.0),
            ..Default::default()
        };
        assert!((ctx.scaled(&pattern).frequency - 20.0).abs() < 1e-4);
    }
}
