//! Easing curves applied across interpolation segments.
//!
//! Every curve maps normalized segment time `t` in `[0, 1]` to eased time
//! `t'` in `[0, 1]` with `f(0) = 0` and `f(1) = 1`. Inputs outside the unit
//! interval are clamped first.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Newton-Raphson iterations before falling back to bisection.
const NEWTON_ITERATIONS: usize = 8;

/// Convergence tolerance on the x axis when solving a bezier curve.
const SOLVE_EPSILON: f64 = 1e-7;

/// Derivative magnitude below which a Newton step is abandoned.
const MIN_SLOPE: f64 = 1e-6;

/// Upper bound on bisection steps (2^-64 is far below f64 resolution in [0, 1]).
const MAX_BISECTION_STEPS: usize = 64;

// ---------------------------------------------------------------------------
// Parametric curves
// ---------------------------------------------------------------------------

fn clamp_unit(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

pub fn linear(t: f64) -> f64 {
    clamp_unit(t)
}

/// Quadratic ease-in: `t²`.
pub fn ease_in(t: f64) -> f64 {
    let t = clamp_unit(t);
    t * t
}

/// Quadratic ease-out: `1 - (1 - t)²`.
pub fn ease_out(t: f64) -> f64 {
    let inv = 1.0 - clamp_unit(t);
    1.0 - inv * inv
}

/// Cubic smoothstep: `t² (3 - 2t)`.
pub fn ease_in_out(t: f64) -> f64 {
    let t = clamp_unit(t);
    t * t * (3.0 - 2.0 * t)
}

/// Step curve: stays at 0 until the segment end is reached exactly.
pub fn hold(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Cubic bezier
// ---------------------------------------------------------------------------

/// A control point of a normalized easing curve. Both coordinates lie in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BezierControlPoint {
    pub x: f64,
    pub y: f64,
}

impl BezierControlPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn is_normalized(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

/// Cubic bezier easing curve from `(0, 0)` to `(1, 1)`.
///
/// Only the two inner control points are stored; they serialize as a
/// two-element array `[p1, p2]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[BezierControlPoint; 2]", into = "[BezierControlPoint; 2]")]
pub struct CubicBezier {
    pub p1: BezierControlPoint,
    pub p2: BezierControlPoint,
}

impl From<[BezierControlPoint; 2]> for CubicBezier {
    fn from([p1, p2]: [BezierControlPoint; 2]) -> Self {
        Self { p1, p2 }
    }
}

impl From<CubicBezier> for [BezierControlPoint; 2] {
    fn from(curve: CubicBezier) -> Self {
        [curve.p1, curve.p2]
    }
}

impl CubicBezier {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            p1: BezierControlPoint::new(x1, y1),
            p2: BezierControlPoint::new(x2, y2),
        }
    }

    /// Whether both control points are finite and inside the unit square.
    ///
    /// A unit-square `x` keeps the curve monotonic in time, so [`solve`]
    /// has exactly one answer.
    ///
    /// [`solve`]: CubicBezier::solve
    pub fn is_well_formed(&self) -> bool {
        self.p1.is_normalized() && self.p2.is_normalized()
    }

    /// Eased progress for normalized time `t`.
    ///
    /// Finds the curve parameter whose x coordinate equals `t`, then returns
    /// the y coordinate at that parameter.
    pub fn solve(&self, t: f64) -> f64 {
        let t = clamp_unit(t);
        if t == 0.0 || t == 1.0 {
            return t;
        }
        let x = Axis::new(self.p1.x, self.p2.x);
        let y = Axis::new(self.p1.y, self.p2.y);
        y.sample(x.parameter_for(t))
    }
}

/// Polynomial coefficients of one axis of a cubic bezier with endpoints 0 and 1.
struct Axis {
    a: f64,
    b: f64,
    c: f64,
}

impl Axis {
    fn new(p1: f64, p2: f64) -> Self {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        Self { a, b, c }
    }

    fn sample(&self, s: f64) -> f64 {
        ((self.a * s + self.b) * s + self.c) * s
    }

    fn slope(&self, s: f64) -> f64 {
        (3.0 * self.a * s + 2.0 * self.b) * s + self.c
    }

    /// Invert the axis: find `s` in `[0, 1]` with `sample(s) == target`.
    fn parameter_for(&self, target: f64) -> f64 {
        let mut s = target;
        for _ in 0..NEWTON_ITERATIONS {
            let err = self.sample(s) - target;
            if err.abs() < SOLVE_EPSILON && (0.0..=1.0).contains(&s) {
                return s;
            }
            let slope = self.slope(s);
            if slope.abs() < MIN_SLOPE {
                break;
            }
            s -= err / slope;
        }

        let (mut lo, mut hi) = (0.0, 1.0);
        s = target;
        for _ in 0..MAX_BISECTION_STEPS {
            let value = self.sample(s);
            if (value - target).abs() < SOLVE_EPSILON {
                break;
            }
            if value < target {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) / 2.0;
        }
        s
    }
}

/// Independent easing curves for each animated box property.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BezierControlPoints {
    pub x: CubicBezier,
    pub y: CubicBezier,
    pub width: CubicBezier,
    pub height: CubicBezier,
}

impl BezierControlPoints {
    /// Apply the same curve to all four properties.
    pub fn uniform(curve: CubicBezier) -> Self {
        Self {
            x: curve,
            y: curve,
            width: curve,
            height: curve,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(CubicBezier::is_well_formed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn parametric_curves_hit_endpoints() {
        for f in [linear, ease_in, ease_out, ease_in_out] {
            assert_eq!(f(0.0), 0.0);
            assert_eq!(f(1.0), 1.0);
        }
    }

    #[test]
    fn ease_in_is_quadratic() {
        assert!(close(ease_in(0.5), 0.25));
    }

    #[test]
    fn ease_out_is_mirrored_quadratic() {
        assert!(close(ease_out(0.5), 0.75));
    }

    #[test]
    fn ease_in_out_is_symmetric() {
        assert!(close(ease_in_out(0.5), 0.5));
        assert!(close(ease_in_out(0.25) + ease_in_out(0.75), 1.0));
    }

    #[test]
    fn hold_stays_at_zero_until_end() {
        assert_eq!(hold(0.0), 0.0);
        assert_eq!(hold(0.999), 0.0);
        assert_eq!(hold(1.0), 1.0);
    }

    #[test]
    fn out_of_range_time_is_clamped() {
        assert_eq!(linear(-0.5), 0.0);
        assert_eq!(ease_in(2.0), 1.0);
    }

    #[test]
    fn diagonal_bezier_is_linear() {
        let curve = CubicBezier::new(0.25, 0.25, 0.75, 0.75);
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            assert!(close(curve.solve(t), t), "t={t}");
        }
    }

    #[test]
    fn css_ease_in_out_bezier_is_symmetric() {
        let curve = CubicBezier::new(0.42, 0.0, 0.58, 1.0);
        assert!(close(curve.solve(0.5), 0.5));
        assert!(curve.solve(0.2) < 0.2);
        assert!(curve.solve(0.8) > 0.8);
    }

    #[test]
    fn steep_bezier_still_converges() {
        // x has zero slope at the midpoint.
        let curve = CubicBezier::new(1.0, 0.0, 0.0, 1.0);
        assert!(close(curve.solve(0.5), 0.5));
        for t in [0.1, 0.45, 0.49, 0.51, 0.9] {
            let v = curve.solve(t);
            assert!((0.0..=1.0).contains(&v), "t={t} v={v}");
        }
    }

    #[test]
    fn bezier_is_monotonic() {
        let curve = CubicBezier::new(0.1, 0.9, 0.2, 1.0);
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = curve.solve(i as f64 / 100.0);
            assert!(v + 1e-5 >= prev);
            prev = v;
        }
    }

    #[test]
    fn out_of_square_points_are_malformed() {
        assert!(CubicBezier::new(0.42, 0.0, 0.58, 1.0).is_well_formed());
        assert!(!CubicBezier::new(1.2, 0.0, 0.58, 1.0).is_well_formed());
        assert!(!CubicBezier::new(0.2, f64::NAN, 0.58, 1.0).is_well_formed());
        let points = BezierControlPoints {
            height: CubicBezier::new(0.0, -0.1, 1.0, 1.0),
            ..BezierControlPoints::uniform(CubicBezier::new(0.0, 0.0, 1.0, 1.0))
        };
        assert!(!points.is_well_formed());
    }

    #[test]
    fn curve_serializes_as_point_pair() {
        let curve = CubicBezier::new(0.1, 0.2, 0.3, 0.4);
        let json = serde_json::to_value(curve).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"x": 0.1, "y": 0.2}, {"x": 0.3, "y": 0.4}])
        );
        let back: CubicBezier = serde_json::from_value(json).unwrap();
        assert_eq!(back, curve);
    }
}
