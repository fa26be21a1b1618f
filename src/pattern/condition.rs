use serde::{Deserialize, Serialize};

use crate::engine::context::TriggerContext;

/// A predicate the event source evaluates before triggering a pattern.
///
/// Pattern documents used to express these as loosely-typed key/value maps
/// resolved by string lookup at trigger time; here they are a tagged enum
/// validated at load time, so a typo fails deserialization instead of
/// silently never matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Condition {
    /// Remaining health fraction is below the threshold (0..1).
    HealthBelow(f32),
    /// Damage fraction of the triggering event is above the threshold.
    DamageAbove(f32),
    /// Event rate (events/second) is above the threshold.
    RateAbove(f32),
    /// The ship type string contains the given substring.
    ShipTypeContains(String),
}

impl Condition {
    /// Evaluate against a trigger context. Missing context fields fail the
    /// predicate rather than erroring.
    pub fn is_met(&self, ctx: &TriggerContext) -> bool {
        match self {
            Condition::HealthBelow(threshold) => {
                ctx.health_fraction.is_some_and(|h| h < *threshold)
            }
            Condition::DamageAbove(threshold) => {
                ctx.damage_fraction.is_some_and(|d| d > *threshold)
            }
            Condition::RateAbove(threshold) => ctx.event_rate.is_some_and(|r| r > *threshold),
            Condition::ShipTypeContains(needle) => ctx
                .ship_type
                .as_deref()
                .is_some_and(|ship| ship.contains(needle.as_str())),
        }
    }
}
