//! Interactive control-point editing for a [`BezierCurve`].
//!
//! The editor owns the grab/drag/release cycle of a plot widget without
//! knowing anything about the widget toolkit: the caller supplies a
//! [`PlotProjection`] that converts between view (pixel) coordinates and
//! curve (unit-square) coordinates, and feeds pointer events in view space.

use crate::bezier::{BezierCurve, ControlHandle};
use crate::curve::Curve;
use crate::point::Point;

/// Grab distance around a control point, in view units (pixels).
pub const PICK_RADIUS: f64 = 10.0;

/// Two-way mapping between view (pixel) space and curve (unit) space.
pub trait PlotProjection {
    /// Project a curve-space point into view space.
    fn to_view(&self, point: Point) -> Point;
    /// Project a view-space point into curve space.
    fn to_curve(&self, point: Point) -> Point;
}

/// Edit session state for one curve.
#[derive(Debug, Default)]
pub struct CurveEditor {
    curve: BezierCurve,
    grabbed: Option<ControlHandle>,
    dirty: bool,
}

impl CurveEditor {
    /// Start editing the given curve.
    #[must_use]
    pub fn new(curve: BezierCurve) -> Self {
        Self {
            curve,
            grabbed: None,
            dirty: false,
        }
    }

    /// The curve being edited.
    #[must_use]
    pub fn curve(&self) -> &BezierCurve {
        &self.curve
    }

    /// The handle currently held by the pointer, if any.
    #[must_use]
    pub fn grabbed(&self) -> Option<ControlHandle> {
        self.grabbed
    }

    /// Handle a button press at `cursor` (view space).
    ///
    /// Grabs the first control point within [`PICK_RADIUS`] of the cursor,
    /// P1 checked before P2. Returns the grabbed handle, or `None` if the
    /// press landed on neither.
    pub fn press(&mut self, projection: &dyn PlotProjection, cursor: Point) -> Option<ControlHandle> {
        self.grabbed = [ControlHandle::P1, ControlHandle::P2]
            .into_iter()
            .find(|&handle| {
                let view = projection.to_view(self.curve.control_point(handle));
                view.distance_to(cursor) <= PICK_RADIUS
            });
        self.grabbed
    }

    /// Handle pointer motion at `cursor` (view space).
    ///
    /// Moves the grabbed control point, clamped into the unit square.
    /// Returns `true` if the curve changed.
    pub fn drag(&mut self, projection: &dyn PlotProjection, cursor: Point) -> bool {
        let Some(handle) = self.grabbed else {
            return false;
        };
        self.curve
            .set_control_point(handle, projection.to_curve(cursor));
        self.dirty = true;
        true
    }

    /// Handle button release, ending any active grab.
    pub fn release(&mut self) {
        self.grabbed = None;
    }

    /// Whether the curve changed since the last [`take_dirty`] call.
    ///
    /// [`take_dirty`]: CurveEditor::take_dirty
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag, returning its previous value.
    ///
    /// Callers poll this after a drag to decide whether a re-apply of the
    /// sampled curve is due.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl Curve for CurveEditor {
    fn eval_by_x(&self, x: f64) -> f64 {
        self.curve.eval_by_x(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Square plot mapping the unit square onto `side` x `side` pixels,
    /// y axis flipped as screen coordinates are.
    struct SquarePlot {
        side: f64,
    }

    impl PlotProjection for SquarePlot {
        fn to_view(&self, point: Point) -> Point {
            Point::new(point.x * self.side, (1.0 - point.y) * self.side)
        }

        fn to_curve(&self, point: Point) -> Point {
            Point::new(point.x / self.side, 1.0 - point.y / self.side)
        }
    }

    fn plot() -> SquarePlot {
        SquarePlot { side: 200.0 }
    }

    #[test]
    fn test_press_within_radius_grabs() {
        let mut editor = CurveEditor::default();
        let plot = plot();

        let p1_view = plot.to_view(editor.curve().control_point(ControlHandle::P1));
        let near = Point::new(p1_view.x + 4.0, p1_view.y - 3.0);

        assert_eq!(editor.press(&plot, near), Some(ControlHandle::P1));
        assert_eq!(editor.grabbed(), Some(ControlHandle::P1));
    }

    #[test]
    fn test_press_far_away_grabs_nothing() {
        let mut editor = CurveEditor::default();
        let plot = plot();

        assert_eq!(editor.press(&plot, Point::new(0.0, 0.0)), None);
        assert_eq!(editor.grabbed(), None);
    }

    #[test]
    fn test_drag_moves_grabbed_point_and_sets_dirty() {
        let mut editor = CurveEditor::default();
        let plot = plot();

        let p2_view = plot.to_view(editor.curve().control_point(ControlHandle::P2));
        assert_eq!(editor.press(&plot, p2_view), Some(ControlHandle::P2));

        let target = plot.to_view(Point::new(0.8, 0.2));
        assert!(editor.drag(&plot, target));

        let moved = editor.curve().control_point(ControlHandle::P2);
        assert!((moved.x - 0.8).abs() < 1e-9);
        assert!((moved.y - 0.2).abs() < 1e-9);
        assert!(editor.is_dirty());
        assert!(editor.take_dirty());
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_drag_without_grab_is_ignored() {
        let mut editor = CurveEditor::default();
        let plot = plot();

        assert!(!editor.drag(&plot, Point::new(50.0, 50.0)));
        assert!(!editor.is_dirty());
        assert_eq!(editor.curve().control_points(), (
            crate::bezier::BezierCurve::DEFAULT_P1,
            crate::bezier::BezierCurve::DEFAULT_P2,
        ));
    }

    #[test]
    fn test_drag_outside_plot_clamps_into_unit_square() {
        let mut editor = CurveEditor::default();
        let plot = plot();

        let p1_view = plot.to_view(editor.curve().control_point(ControlHandle::P1));
        editor.press(&plot, p1_view);
        editor.drag(&plot, Point::new(-40.0, 400.0));

        let moved = editor.curve().control_point(ControlHandle::P1);
        assert_eq!(moved, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_release_ends_grab() {
        let mut editor = CurveEditor::default();
        let plot = plot();

        let p1_view = plot.to_view(editor.curve().control_point(ControlHandle::P1));
        editor.press(&plot, p1_view);
        editor.release();

        assert_eq!(editor.grabbed(), None);
        assert!(!editor.drag(&plot, Point::new(10.0, 10.0)));
    }
}
