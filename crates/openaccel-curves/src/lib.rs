//! Editable Acceleration Curves for OpenAccel
//!
//! This crate implements the curve model behind custom pointer acceleration:
//! cubic Bezier response curves, interactive control-point editing, and
//! flattening into the fixed-size step functions that acceleration backends
//! install.
//!
//! # Overview
//!
//! The curve system supports:
//! - **Bezier**: Cubic curves anchored at (0,0) and (1,1) with two free
//!   control points
//! - **Editing**: Grab/drag/release of control points through a
//!   toolkit-agnostic plot projection
//! - **Sampling**: Discretization into at most 64 evenly spaced output
//!   values plus a step width
//!
//! # Evaluation Contract
//!
//! `BezierCurve::eval_by_x()` inverts the curve's x(t) with Newton-Raphson
//! (at most 20 iterations, early exit below 1e-6) and is meant for editor
//! redraws and sampling, not for per-event hot paths. Backends never
//! evaluate curves at event time; they interpolate the sampled
//! [`AccelFunction`] instead.
//!
//! # Example
//!
//! ```
//! use openaccel_curves::{AccelFunction, BezierCurve, Point};
//!
//! // Shape a curve (editor or config load time)
//! let curve = BezierCurve::new(Point::new(0.4, 0.1), Point::new(0.5, 0.5))?;
//!
//! // Flatten it into the form backends install
//! let function = AccelFunction::sample(&curve, 1.0, 1.0);
//! assert_eq!(function.points().len(), 64);
//! # Ok::<(), openaccel_curves::CurveError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod bezier;
pub mod curve;
pub mod editor;
pub mod error;
pub mod point;
pub mod prelude;
pub mod sampler;

pub use bezier::{BezierCurve, ControlHandle};
pub use curve::Curve;
pub use editor::{CurveEditor, PlotProjection};
pub use error::CurveError;
pub use point::Point;
pub use sampler::{AccelFunction, MAX_POINTS};
