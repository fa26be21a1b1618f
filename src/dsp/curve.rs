use serde::{Deserialize, Serialize};

/*
Intensity Curves
================

An intensity curve reshapes how strongly a pattern plays across its own
lifetime. The input is normalized time t in [0, 1] (0 = pattern start,
1 = pattern end); the output is a multiplier applied to the pattern's base
intensity.

  Linear        t                straight ramp
  Exponential   t^2.5            slow start, fast finish - buildups
  Logarithmic   log10(9t + 1)    fast start, slow finish
  Sine          sin(t·π)         symmetric swell, peaks at t = 0.5
  Bounce        two-piece cubic ease, continuous at t = 0.5, no overshoot -
                impact-style patterns
  Custom        piecewise-linear interpolation over author-supplied points

This function runs once per output sample on the render path, so it must not
allocate. Custom curves use a linear scan over the point list; typical
patterns carry fewer than ten points, so a binary search would cost more in
branching than it saves.

Evaluation clamps t to [0, 1] first and the result to [0, base] after, so a
malformed curve can never push a layer above its configured intensity.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityCurve {
    Linear,
    Exponential,
    Logarithmic,
    Sine,
    Bounce,
    Custom,
}

impl Default for IntensityCurve {
    fn default() -> Self {
        IntensityCurve::Linear
    }
}

/// One control point of a custom curve. Points are sorted by time at load
/// and implicit (0,0)/(1,1) endpoints are synthesized if absent - see
/// `HapticPattern::normalize`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub time: f32,
    pub intensity: f32,
}

/// Evaluate an intensity curve at normalized time `t`.
///
/// Returns a value in `[0, base]`. `points` is only consulted for
/// `IntensityCurve::Custom`.
#[inline]
pub fn intensity_at(curve: IntensityCurve, t: f32, base: f32, points: &[CurvePoint]) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let shaped = match curve {
        IntensityCurve::Linear => t,
        IntensityCurve::Exponential => t.powf(2.5),
        IntensityCurve::Logarithmic => (9.0 * t + 1.0).log10(),
        IntensityCurve::Sine => (t * std::f32::consts::PI).sin(),
        IntensityCurve::Bounce => {
            if t < 0.5 {
                4.0 * t * t * t
            } else {
                1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
            }
        }
        IntensityCurve::Custom => custom_at(t, points),
    };
    (shaped * base).clamp(0.0, base.max(0.0))
}

/// Piecewise-linear lookup. Span ends are inclusive so an exact control
/// point returns its stated intensity; `t` outside every span falls back to
/// `t` itself (only reachable when the point list does not cover [0, 1]).
#[inline]
fn custom_at(t: f32, points: &[CurvePoint]) -> f32 {
    for pair in points.windows(2) {
        let (p0, p1) = (pair[0], pair[1]);
        if t >= p0.time && t <= p1.time {
            let span = p1.time - p0.time;
            if span <= f32::EPSILON {
                return p1.intensity;
            }
            let frac = (t - p0.time) / span;
            return p0.intensity + (p1.intensity - p0.intensity) * frac;
        }
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn all_curves_hit_zero_and_one_at_the_endpoints() {
        for curve in [
            IntensityCurve::Linear,
            IntensityCurve::Exponential,
            IntensityCurve::Logarithmic,
            IntensityCurve::Sine,
            IntensityCurve::Bounce,
        ] {
            let start = intensity_at(curve, 0.0, 1.0, &[]);
            assert!(start.abs() < EPS, "{curve:?} at t=0 gave {start}");
            if curve == IntensityCurve::Sine {
                // Sine returns to zero at t=1; its peak is mid-pattern.
                assert!(intensity_at(curve, 1.0, 1.0, &[]).abs() < 1e-4);
                assert!((intensity_at(curve, 0.5, 1.0, &[]) - 1.0).abs() < EPS);
            } else {
                let end = intensity_at(curve, 1.0, 1.0, &[]);
                assert!((end - 1.0).abs() < EPS, "{curve:?} at t=1 gave {end}");
            }
        }
    }

    #[test]
    fn exponential_is_slower_than_linear_early_on() {
        let exp = intensity_at(IntensityCurve::Exponential, 0.5, 1.0, &[]);
        assert!((exp - 0.5f32.powf(2.5)).abs() < EPS);
        assert!(exp < 0.5);
    }

    #[test]
    fn logarithmic_is_faster_than_linear_early_on() {
        let log = intensity_at(IntensityCurve::Logarithmic, 0.25, 1.0, &[]);
        assert!(log > 0.25);
    }

    #[test]
    fn bounce_is_continuous_at_the_midpoint() {
        let below = intensity_at(IntensityCurve::Bounce, 0.5 - 1e-4, 1.0, &[]);
        let above = intensity_at(IntensityCurve::Bounce, 0.5 + 1e-4, 1.0, &[]);
        assert!((below - above).abs() < 1e-2);
        assert!((intensity_at(IntensityCurve::Bounce, 0.5, 1.0, &[]) - 0.5).abs() < EPS);
    }

    #[test]
    fn custom_interpolates_between_points() {
        let points = [
            CurvePoint { time: 0.0, intensity: 0.0 },
            CurvePoint { time: 0.5, intensity: 1.0 },
            CurvePoint { time: 1.0, intensity: 0.0 },
        ];
        assert!((intensity_at(IntensityCurve::Custom, 0.25, 1.0, &points) - 0.5).abs() < EPS);
        assert!((intensity_at(IntensityCurve::Custom, 0.5, 1.0, &points) - 1.0).abs() < EPS);
        assert!((intensity_at(IntensityCurve::Custom, 0.75, 1.0, &points) - 0.5).abs() < EPS);
    }

    #[test]
    fn custom_with_no_coverage_falls_back_to_t() {
        let points = [
            CurvePoint { time: 0.6, intensity: 0.2 },
            CurvePoint { time: 0.8, intensity: 0.9 },
        ];
        assert!((intensity_at(IntensityCurve::Custom, 0.3, 1.0, &points) - 0.3).abs() < EPS);
        assert!((intensity_at(IntensityCurve::Custom, 0.3, 1.0, &[]) - 0.3).abs() < EPS);
    }

    #[test]
    fn result_is_scaled_and_clamped_by_base() {
        assert!((intensity_at(IntensityCurve::Linear, 1.0, 0.6, &[]) - 0.6).abs() < EPS);
        assert_eq!(intensity_at(IntensityCurve::Linear, 0.7, 0.0, &[]), 0.0);
        // Out-of-range t is clamped before evaluation.
        assert!((intensity_at(IntensityCurve::Linear, 2.0, 1.0, &[]) - 1.0).abs() < EPS);
        assert_eq!(intensity_at(IntensityCurve::Linear, -1.0, 1.0, &[]), 0.0);
    }
}
