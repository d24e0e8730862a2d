//! Example demonstrating curve shaping and step-function sampling
//!
//! This example builds a Bezier acceleration curve, evaluates it across the
//! input range, simulates a control-point drag, and prints the sampled
//! function in the JSON form a settings store would persist.

use openaccel_curves::{AccelFunction, BezierCurve, ControlHandle, Point};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("OpenAccel Curve Sampling Example");
    println!("================================\n");

    // 1. Build the default curve
    println!("1. Building the default curve...");
    let mut curve = BezierCurve::default();
    let (p1, p2) = curve.control_points();
    println!("✓ Control points: P1 = ({}, {}), P2 = ({}, {})", p1.x, p1.y, p2.x, p2.y);
    println!();

    // 2. Evaluate across the input range
    println!("2. Evaluating y = f(x) on [0, 1]...");
    for i in 0..=10 {
        let x = f64::from(i) / 10.0;
        let y = curve.eval_by_x(x);
        println!("  f({x:.1}) = {y:.4}");
    }
    println!();

    // 3. Reshape by moving a control point
    println!("3. Moving P2 to steepen the high-speed response...");
    curve.set_control_point(ControlHandle::P2, Point::new(0.7, 0.3));
    match curve.validate() {
        Ok(()) => println!("✓ Curve still valid after edit"),
        Err(e) => println!("✗ Unexpected validation failure: {e}"),
    }
    println!("  f(0.5) = {:.4}", curve.eval_by_x(0.5));
    println!();

    // 4. Sample into the backend step-function form
    println!("4. Sampling into a 64-point step function (x top = 2, y top = 2)...");
    let function = AccelFunction::sample(&curve, 2.0, 2.0);
    println!("✓ Sampled {} points, step = {:.6}", function.points().len(), function.step());
    println!("  input span covered: {:.4}", function.x_span());

    let json = serde_json::to_string(&function)?;
    println!("  serialized: {} bytes", json.len());

    // Round-trip through the serialized form, as a settings store would.
    let restored: AccelFunction = serde_json::from_str(&json)?;
    if restored == function {
        println!("✓ Round-trip through JSON preserved the function");
    } else {
        println!("✗ Round-trip mismatch");
    }

    println!("\nCurve sampling example completed successfully!");
    Ok(())
}
