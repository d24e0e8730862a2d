//! The polymorphic curve capability.
//!
//! Consumers of a curve (the sampler, a plot view) only need "give me y for
//! this x"; they hold `&dyn Curve` and never a concrete shape. New shapes
//! implement this trait next to [`BezierCurve`](crate::BezierCurve).

/// A normalized transfer curve over the unit square.
pub trait Curve {
    /// Map an input `x` in `[0,1]` to the curve's output `y` in `[0,1]`.
    ///
    /// Inputs outside `[0,1]` are clamped. How the mapping is computed
    /// (closed form, numerical inversion, table) is the shape's business.
    fn eval_by_x(&self, x: f64) -> f64;
}
