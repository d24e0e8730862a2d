//! Cubic Bezier curve implementation for acceleration response mapping.

use serde::{Deserialize, Serialize};

use crate::curve::Curve;
use crate::error::CurveError;
use crate::point::Point;

/// Maximum Newton-Raphson iterations when inverting x(t).
const MAX_ITERATIONS: usize = 20;

/// Early-exit tolerance on |x(t) - x| for the inversion.
const X_TOLERANCE: f64 = 1e-6;

/// Which of the two free control points an edit addresses.
///
/// The anchors P0 = (0,0) and P3 = (1,1) are fixed; only P1 and P2 move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlHandle {
    /// The first interior control point.
    P1,
    /// The second interior control point.
    P2,
}

/// Cubic Bezier curve for acceleration response mapping.
///
/// The curve is anchored at (0,0) and (1,1) and shaped by two free control
/// points, so it always maps the unit square onto itself: input device speed
/// (normalized to `[0,1]`) in, output pointer speed (normalized) out.
///
/// Because a Bezier is parameterized by `t` rather than by `x`, evaluating
/// at a given `x` first inverts `x(t) = x` with Newton-Raphson (at most 20
/// iterations, early exit below 1e-6, `t` clamped into `[0,1]` after every
/// step). The inversion is an approximation near flat spots of `x(t)`, not
/// an exact inverse.
///
/// # Example
///
/// ```
/// use openaccel_curves::{BezierCurve, Point};
///
/// let curve = BezierCurve::new(Point::new(0.4, 0.1), Point::new(0.5, 0.5))?;
/// let y = curve.eval_by_x(0.5);
/// assert!((0.0..=1.0).contains(&y));
/// # Ok::<(), openaccel_curves::CurveError>(())
/// ```
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BezierCurve {
    p1: Point,
    p2: Point,
}

impl BezierCurve {
    /// Default first control point, biased toward a gentle low-speed slope.
    pub const DEFAULT_P1: Point = Point::new(0.4, 0.1);
    /// Default second control point.
    pub const DEFAULT_P2: Point = Point::new(0.5, 0.5);

    /// Create a new curve from its two free control points.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::ControlPointOutOfRange`] if either point has a
    /// coordinate outside `[0,1]` or a non-finite coordinate.
    pub fn new(p1: Point, p2: Point) -> Result<Self, CurveError> {
        let curve = Self { p1, p2 };
        curve.validate()?;
        Ok(curve)
    }

    /// Create a curve that is an exact identity mapping (f(x) = x).
    #[must_use]
    pub fn linear() -> Self {
        Self {
            p1: Point::new(1.0 / 3.0, 1.0 / 3.0),
            p2: Point::new(2.0 / 3.0, 2.0 / 3.0),
        }
    }

    /// The two free control points, in order (P1, P2).
    #[must_use]
    pub fn control_points(&self) -> (Point, Point) {
        (self.p1, self.p2)
    }

    /// Read one control point.
    #[must_use]
    pub fn control_point(&self, handle: ControlHandle) -> Point {
        match handle {
            ControlHandle::P1 => self.p1,
            ControlHandle::P2 => self.p2,
        }
    }

    /// Overwrite one control point, clamping it into the unit square.
    ///
    /// This is the interactive-edit path: a drag may hand in coordinates
    /// outside the plot and they are pinned rather than rejected.
    pub fn set_control_point(&mut self, handle: ControlHandle, point: Point) {
        let point = point.clamp_unit();
        match handle {
            ControlHandle::P1 => self.p1 = point,
            ControlHandle::P2 => self.p2 = point,
        }
    }

    /// Check if a coordinate value is valid (finite and in `[0,1]` range).
    #[inline]
    fn is_valid_coordinate(value: f64) -> bool {
        value.is_finite() && (0.0..=1.0).contains(&value)
    }

    /// Validate the curve's control points.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::ControlPointOutOfRange`] naming the first
    /// offending point and coordinate.
    pub fn validate(&self) -> Result<(), CurveError> {
        for (point_index, point) in [(1, self.p1), (2, self.p2)] {
            if !Self::is_valid_coordinate(point.x) {
                return Err(CurveError::ControlPointOutOfRange {
                    point_index,
                    coordinate: "x",
                    value: point.x,
                });
            }
            if !Self::is_valid_coordinate(point.y) {
                return Err(CurveError::ControlPointOutOfRange {
                    point_index,
                    coordinate: "y",
                    value: point.y,
                });
            }
        }
        Ok(())
    }

    /// Evaluate the curve at parameter `t`.
    ///
    /// With the anchors fixed at (0,0) and (1,1) the cubic
    /// B(t) = (1-t)³P₀ + 3(1-t)²tP₁ + 3(1-t)t²P₂ + t³P₃ loses its P₀ term
    /// and its P₃ term reduces to t³.
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;

        let x = 3.0 * mt2 * t * self.p1.x + 3.0 * mt * t2 * self.p2.x + t3;
        let y = 3.0 * mt2 * t * self.p1.y + 3.0 * mt * t2 * self.p2.y + t3;

        Point::new(x, y)
    }

    /// x-derivative of the curve at parameter `t`.
    ///
    /// The derivative of a cubic Bezier is a quadratic Bezier:
    /// B'(t) = 3[(1-t)²(P₁-P₀) + 2(1-t)t(P₂-P₁) + t²(P₃-P₂)]
    #[inline]
    fn x_derivative(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        let mt = 1.0 - t;

        let d0 = self.p1.x;
        let d1 = self.p2.x - self.p1.x;
        let d2 = 1.0 - self.p2.x;

        3.0 * (mt * mt * d0 + 2.0 * mt * t * d1 + t * t * d2)
    }

    /// Find the parameter `t` whose x-coordinate matches `target_x`.
    ///
    /// Newton-Raphson seeded at `t = target_x`: for curves close to the
    /// diagonal the seed is already near the root. `t` is clamped back into
    /// `[0,1]` after every step so a large step off a flat spot cannot
    /// diverge; a sub-epsilon derivative stops iteration outright, since
    /// dividing by it would yield a NaN that `f64::clamp` propagates.
    fn find_t_for_x(&self, target_x: f64) -> f64 {
        let target_x = target_x.clamp(0.0, 1.0);

        let mut t = target_x;

        for _ in 0..MAX_ITERATIONS {
            let error = self.evaluate(t).x - target_x;

            if error.abs() < X_TOLERANCE {
                break;
            }

            let dx_dt = self.x_derivative(t);

            if dx_dt.abs() <= f64::EPSILON {
                break;
            }

            t = (t - error / dx_dt).clamp(0.0, 1.0);
        }

        t
    }

    /// Map an input `x` to the curve's `y` by inverting `x(t)`.
    ///
    /// Input is clamped to `[0,1]`; the result is clamped to `[0,1]`
    /// (the control points' convex hull already keeps y in range, the clamp
    /// pins rounding residue at the anchors).
    #[must_use]
    pub fn eval_by_x(&self, x: f64) -> f64 {
        let t = self.find_t_for_x(x);
        self.evaluate(t).y.clamp(0.0, 1.0)
    }
}

impl Curve for BezierCurve {
    fn eval_by_x(&self, x: f64) -> f64 {
        BezierCurve::eval_by_x(self, x)
    }
}

impl Default for BezierCurve {
    fn default() -> Self {
        Self {
            p1: Self::DEFAULT_P1,
            p2: Self::DEFAULT_P2,
        }
    }
}
