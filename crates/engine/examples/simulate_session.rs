//! Example driving a full apply / confirm session against the in-memory store
//!
//! Runs entirely offline: a fixed inventory, an in-memory settings backend,
//! and synthetic device frames stand in for real hardware, which makes this
//! a faithful dry run of the apply, grace countdown, and confirm flow.

use std::sync::Arc;

use anyhow::Result;
use openaccel_curves::{AccelFunction, BezierCurve, ControlHandle, Point};
use openaccel_settings::{AccelSettings, MemoryBackend, SettingsBackend};
use pointer_accel_engine::{
    AccelSession, DeviceRegistry, MovementType, NetCommand, PointerDevice, SafetyNet, supervise,
};

const NODE: &str = "/dev/input/event7";
const NAME: &str = "Simulated Trackball";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("OpenAccel Session Simulation");
    println!("============================\n");

    // 1. Seed the in-memory store with a device running the flat profile
    println!("1. Seeding the in-memory settings store...");
    let store = Arc::new(MemoryBackend::new());
    let mut seeded = AccelSettings::default();
    seeded.profile.flat = true;
    store.add_device(NODE, seeded);
    println!("✓ {NAME} at {NODE} (flat profile)");

    // 2. Attach through the offline registry
    println!("\n2. Attaching to the device...");
    let mut registry = DeviceRegistry::with_inventory(vec![PointerDevice::new(NODE, NAME)]);
    registry.select_offline(NAME)?;
    registry.on_speed(|sample| {
        println!("  {} speed: {:.3} counts/ms", sample.movement, sample.speed);
    });
    let mut session = AccelSession::new(registry, Arc::clone(&store));
    println!("✓ Attached");

    // 3. Feed a burst of synthetic frames through the pipeline
    println!("\n3. Injecting synthetic motion frames...");
    let mut timestamp_us = 1_000_000;
    for step in 1..=5 {
        let delta = f64::from(step) * 2.0;
        session
            .registry_mut()
            .inject_frame(delta, 0.0, 0.0, 0.0, timestamp_us);
        timestamp_us += 10_000;
    }

    // 4. Apply a custom motion curve
    println!("\n4. Applying a custom motion curve...");
    let mut curve = BezierCurve::default();
    curve.set_control_point(ControlHandle::P2, Point::new(0.7, 0.3));
    session.apply(MovementType::Motion, AccelFunction::sample(&curve, 3.0, 3.0))?;
    println!("✓ Profile now: {:?}", store.get_settings(NODE)?.profile);

    // 5. Supervise the grace period, confirming from a background task
    println!("\n5. Running the grace countdown (confirming after 2s)...");
    let mut net = SafetyNet::new();
    let (tx, mut rx) = tokio::sync::mpsc::channel(4);
    let confirmer = tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_secs(2)).await;
        tx.send(NetCommand::Confirm).await
    });

    let outcome = supervise(&mut net, &mut session, &mut rx, |seconds| {
        println!("  restoring in {seconds}s unless confirmed");
    })
    .await?;
    confirmer.await??;
    println!("✓ Outcome: {outcome:?}");

    // 6. Keep the applied settings
    session.keep_applied();
    let final_settings = store.get_settings(NODE)?;
    println!(
        "\n✓ Device left on the custom profile: {}",
        final_settings.profile.custom
    );

    Ok(())
}
