//! Prelude for openaccel-curves.
//!
//! This module re-exports the most commonly used types for convenient importing.
//!
//! # Example
//!
//! ```rust
//! use openaccel_curves::prelude::*;
//!
//! let editor = CurveEditor::new(BezierCurve::default());
//! let function = AccelFunction::sample(editor.curve(), 1.0, 1.0);
//! assert!(!function.is_empty());
//! ```

pub use crate::bezier::{BezierCurve, ControlHandle};
pub use crate::curve::Curve;
pub use crate::editor::{CurveEditor, PICK_RADIUS, PlotProjection};
pub use crate::error::CurveError;
pub use crate::point::Point;
pub use crate::sampler::{AccelFunction, MAX_POINTS};
