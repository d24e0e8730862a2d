//! Example listing pointer devices and streaming speed samples
//!
//! Without arguments this lists every pointer device evdev exposes. With a
//! device name argument it attaches to that device and prints normalized
//! speed samples while the pointer moves.
//!
//! Reading `/dev/input/event*` requires membership in the `input` group
//! (or root) on most distributions.

use pointer_accel_engine::{DeviceRegistry, MovementType};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("OpenAccel Pointer Devices");
    println!("=========================\n");

    let mut registry = DeviceRegistry::enumerate();
    if registry.devices().is_empty() {
        println!("✗ No pointer devices found (missing input-group permissions?)");
        return Ok(());
    }
    for device in registry.devices() {
        println!("  {} ({})", device.name, device.node.display());
    }

    let Some(name) = std::env::args().nth(1) else {
        println!("\nPass a device name to stream its speed samples.");
        return Ok(());
    };

    println!("\nAttaching to {name:?}...");
    registry.set_current(&name)?;
    registry.set_movement_type(MovementType::Motion);
    registry.on_speed(|sample| {
        println!("  {} speed: {:.3} counts/ms", sample.movement, sample.speed);
    });

    println!("✓ Attached; move the pointer (5 second window)");
    match tokio::time::timeout(std::time::Duration::from_secs(5), registry.drive()).await {
        Ok(result) => result?,
        Err(_) => println!("\n✓ Done listening"),
    }

    Ok(())
}
