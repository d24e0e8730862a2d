//! Error types for curve operations.

use std::fmt;

/// Error type for curve construction and sampling.
#[derive(Debug, Clone, PartialEq)]
pub enum CurveError {
    /// Control point is outside the valid `[0,1]` range.
    ///
    /// Both free control points must have x and y coordinates in the
    /// range `[0.0, 1.0]` inclusive and finite.
    ControlPointOutOfRange {
        /// Index of the control point (1 or 2; the anchors P0 and P3 are fixed).
        point_index: usize,
        /// Which coordinate is out of range ("x" or "y").
        coordinate: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// A step function was given more samples than the wire format carries.
    ///
    /// The backend property store accepts at most
    /// [`AccelFunction::MAX_POINTS`](crate::AccelFunction::MAX_POINTS)
    /// samples; larger counts are a contract violation, never truncated.
    TooManySamples {
        /// Number of samples supplied.
        count: usize,
        /// The fixed capacity.
        max: usize,
    },
}

impl fmt::Display for CurveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ControlPointOutOfRange {
                point_index,
                coordinate,
                value,
            } => {
                write!(
                    f,
                    "Control point {point_index} {coordinate} coordinate {value} is outside valid range [0,1]"
                )
            }
            Self::TooManySamples { count, max } => {
                write!(f, "Step function has {count} samples but the wire format carries at most {max}")
            }
        }
    }
}

impl std::error::Error for CurveError {}
