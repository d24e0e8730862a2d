//! Discretization of a [`Curve`] into the step-function form consumed by
//! acceleration backends.
//!
//! Backends do not evaluate curves. They take a flat list of output values
//! sampled at a fixed input spacing and interpolate between them, so the
//! continuous curve is flattened here into an [`AccelFunction`] before it
//! ever leaves the process.

use serde::{Deserialize, Serialize};

use crate::curve::Curve;
use crate::error::CurveError;

/// Hard capacity of a backend acceleration function.
pub const MAX_POINTS: usize = 64;

/// Number of samples taken across the curve's input range.
const SAMPLE_COUNT: u32 = 64;

/// A curve flattened to evenly spaced output samples.
///
/// `points[i]` is the output value at input `i * step`. An empty function
/// means "nothing sampled yet" and is what a backend reports before any
/// custom function has been installed.
///
/// Deserialization enforces the [`MAX_POINTS`] capacity, so a stored
/// function can be loaded without re-checking its length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAccelFunction")]
pub struct AccelFunction {
    step: f64,
    points: Vec<f64>,
}

/// Unvalidated mirror of [`AccelFunction`] used during deserialization.
#[derive(Deserialize)]
struct RawAccelFunction {
    step: f64,
    points: Vec<f64>,
}

impl TryFrom<RawAccelFunction> for AccelFunction {
    type Error = CurveError;

    fn try_from(raw: RawAccelFunction) -> Result<Self, Self::Error> {
        Self::from_parts(raw.step, raw.points)
    }
}

impl AccelFunction {
    /// Sample `curve` into a 64-point step function.
    ///
    /// The curve is evaluated on the unit interval and then scaled:
    /// `x_axis_top` stretches the input spacing so the final sample sits at
    /// input `x_axis_top`, and every output is multiplied by `y_axis_top`.
    /// Non-finite or non-positive tops fall back to 1.0.
    #[must_use]
    pub fn sample(curve: &dyn Curve, x_axis_top: f64, y_axis_top: f64) -> Self {
        let x_axis_top = sane_axis_top(x_axis_top);
        let y_axis_top = sane_axis_top(y_axis_top);

        let raw_step = 1.0 / f64::from(SAMPLE_COUNT - 1);

        let mut points = Vec::with_capacity(MAX_POINTS);
        for i in 0..SAMPLE_COUNT {
            let x = f64::from(i) * raw_step;
            points.push(curve.eval_by_x(x) * y_axis_top);
        }

        Self {
            step: raw_step * x_axis_top,
            points,
        }
    }

    /// Assemble a function from an already sampled step and point list.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::TooManySamples`] if `points` exceeds
    /// [`MAX_POINTS`].
    pub fn from_parts(step: f64, points: Vec<f64>) -> Result<Self, CurveError> {
        if points.len() > MAX_POINTS {
            return Err(CurveError::TooManySamples {
                count: points.len(),
                max: MAX_POINTS,
            });
        }
        Ok(Self { step, points })
    }

    /// Input spacing between consecutive samples.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// The sampled output values.
    #[must_use]
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// `true` if nothing has been sampled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Input value of the last sample, i.e. the covered input range.
    #[must_use]
    pub fn x_span(&self) -> f64 {
        match self.points.len().checked_sub(1) {
            Some(intervals) => self.step * intervals as f64,
            None => 0.0,
        }
    }
}

fn sane_axis_top(top: f64) -> f64 {
    if top.is_finite() && top > 0.0 { top } else { 1.0 }
}
