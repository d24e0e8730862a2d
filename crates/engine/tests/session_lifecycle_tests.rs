//! Integration tests for the apply / restore session lifecycle.
//!
//! Coverage areas:
//! 1. Device selection errors surface before any backend traffic.
//! 2. Apply snapshots the original settings once per device and restore
//!    returns to that snapshot, not to the previous experiment.
//! 3. A failed restore keeps the snapshot so it can be retried.
//! 4. Dropping a session restores unless the apply was kept.
//! 5. The speed pipeline delivers samples through a live session.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use openaccel_curves::{AccelFunction, BezierCurve};
use openaccel_settings::{
    AccelSettings, AccelerationProfile, MemoryBackend, MovementType, SettingsBackend,
};
use pointer_accel_engine::{AccelSession, DeviceRegistry, EngineError, PointerDevice, SpeedSample};

type TestResult = Result<(), Box<dyn std::error::Error>>;

const NODE: &str = "/dev/input/event7";
const NAME: &str = "Test Trackball";

fn seeded_store() -> Arc<MemoryBackend> {
    let store = MemoryBackend::new();
    store.add_device(
        NODE,
        AccelSettings {
            profile: AccelerationProfile {
                adaptive: true,
                flat: false,
                custom: false,
            },
            ..AccelSettings::default()
        },
    );
    Arc::new(store)
}

fn attached_registry() -> Result<DeviceRegistry, Box<dyn std::error::Error>> {
    let mut registry = DeviceRegistry::with_inventory(vec![PointerDevice::new(NODE, NAME)]);
    registry.select_offline(NAME)?;
    Ok(registry)
}

fn motion_curve() -> AccelFunction {
    AccelFunction::sample(&BezierCurve::default(), 2.0, 2.0)
}

#[test]
fn test_selection_errors_before_backend_traffic() {
    let mut registry = DeviceRegistry::with_inventory(vec![PointerDevice::new(NODE, NAME)]);
    let result = registry.select_offline("Ghost Mouse");
    assert!(matches!(result, Err(EngineError::DeviceNotFound { .. })));

    // Nothing attached: applying is refused without touching the store.
    let mut session = AccelSession::new(registry, seeded_store());
    let result = session.apply(MovementType::Motion, motion_curve());
    assert!(matches!(result, Err(EngineError::NoCurrentDevice)));
    assert!(!session.has_snapshot());
}

#[test]
fn test_apply_then_restore_round_trip() -> TestResult {
    let store = seeded_store();
    let mut session = AccelSession::new(attached_registry()?, Arc::clone(&store));

    // 1. Apply a custom motion curve
    session.apply(MovementType::Motion, motion_curve())?;
    assert!(session.has_snapshot());

    // 2. The device now runs the custom profile with points installed
    let active = session.device_settings()?;
    assert!(active.profile.custom);
    assert!(!active.function(MovementType::Motion).is_empty());

    // 3. Restore flips the profile back to the snapshot
    session.restore()?;
    assert!(!session.has_snapshot());
    let restored = session.device_settings()?;
    assert!(restored.profile.adaptive);
    assert!(!restored.profile.custom);

    // 4. A second restore has nothing to work with
    let result = session.restore();
    assert!(matches!(result, Err(EngineError::NothingToRestore)));
    Ok(())
}

#[test]
fn test_second_apply_reuses_first_snapshot() -> TestResult {
    let store = seeded_store();
    let mut session = AccelSession::new(attached_registry()?, Arc::clone(&store));

    session.apply(MovementType::Motion, motion_curve())?;
    // The second experiment overwrites the first on the device.
    session.apply(
        MovementType::Motion,
        AccelFunction::sample(&BezierCurve::linear(), 4.0, 4.0),
    )?;

    // Restore returns to the pre-session adaptive profile, skipping the
    // intermediate custom state entirely.
    session.restore()?;
    let restored = session.device_settings()?;
    assert!(restored.profile.adaptive);
    assert!(!restored.profile.custom);
    Ok(())
}

#[test]
fn test_applying_motion_leaves_scroll_untouched() -> TestResult {
    let store = seeded_store();
    let scroll = AccelFunction::sample(&BezierCurve::linear(), 1.0, 1.0);
    let mut seeded = AccelSettings::default();
    seeded.install_custom(MovementType::Scroll, scroll.clone());
    store.add_device(NODE, seeded);

    let mut session = AccelSession::new(attached_registry()?, Arc::clone(&store));
    session.apply(MovementType::Motion, motion_curve())?;

    let active = session.device_settings()?;
    let stored_scroll = active.function(MovementType::Scroll);
    assert_eq!(stored_scroll.points().len(), scroll.points().len());
    assert!(!active.function(MovementType::Motion).is_empty());
    Ok(())
}

/// Backend wrapper that can be told to fail writes.
struct FlakyBackend {
    inner: Arc<MemoryBackend>,
    fail_writes: Arc<AtomicBool>,
}

impl SettingsBackend for FlakyBackend {
    fn get_settings(&self, node: &str) -> openaccel_settings::SettingsResult<AccelSettings> {
        self.inner.get_settings(node)
    }

    fn set_settings(
        &self,
        node: &str,
        settings: &AccelSettings,
    ) -> openaccel_settings::SettingsResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(openaccel_settings::SettingsError::resolution(node));
        }
        self.inner.set_settings(node, settings)
    }
}

#[test]
fn test_failed_restore_keeps_snapshot_for_retry() -> TestResult {
    let store = seeded_store();
    let fail_writes = Arc::new(AtomicBool::new(false));
    let backend = FlakyBackend {
        inner: Arc::clone(&store),
        fail_writes: Arc::clone(&fail_writes),
    };
    let mut session = AccelSession::new(attached_registry()?, backend);

    session.apply(MovementType::Motion, motion_curve())?;

    fail_writes.store(true, Ordering::SeqCst);
    assert!(session.restore().is_err());
    assert!(session.has_snapshot(), "snapshot survives a failed restore");

    fail_writes.store(false, Ordering::SeqCst);
    session.restore()?;
    let restored = store.get_settings(NODE)?;
    assert!(restored.profile.adaptive);
    Ok(())
}

#[test]
fn test_drop_restores_saved_settings() -> TestResult {
    let store = seeded_store();
    {
        let mut session = AccelSession::new(attached_registry()?, Arc::clone(&store));
        session.apply(MovementType::Motion, motion_curve())?;
        let active = store.get_settings(NODE)?;
        assert!(active.profile.custom);
    }

    // The session went out of scope holding a snapshot; teardown wrote it back.
    let after = store.get_settings(NODE)?;
    assert!(after.profile.adaptive);
    assert!(!after.profile.custom);
    Ok(())
}

#[test]
fn test_keep_applied_skips_drop_restore() -> TestResult {
    let store = seeded_store();
    {
        let mut session = AccelSession::new(attached_registry()?, Arc::clone(&store));
        session.apply(MovementType::Motion, motion_curve())?;
        session.keep_applied();
        assert!(!session.has_snapshot());
    }

    let after = store.get_settings(NODE)?;
    assert!(after.profile.custom, "confirmed settings survive teardown");
    Ok(())
}

#[test]
fn test_speed_pipeline_feeds_callback_through_session() -> TestResult {
    let store = seeded_store();
    let mut session = AccelSession::new(attached_registry()?, store);

    let samples: Arc<std::sync::Mutex<Vec<SpeedSample>>> = Arc::default();
    let sink = Arc::clone(&samples);
    session.registry_mut().on_speed(move |sample| {
        if let Ok(mut sink) = sink.lock() {
            sink.push(sample);
        }
    });

    session.registry_mut().inject_frame(3.0, 4.0, 0.0, 0.0, 1_000_000);
    session.registry_mut().inject_frame(6.0, 8.0, 0.0, 0.0, 1_010_000);

    let samples = match samples.lock() {
        Ok(samples) => samples,
        Err(poisoned) => poisoned.into_inner(),
    };
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].movement, MovementType::Motion);
    // hypot(6, 8) = 10 counts over the 10ms between frames.
    assert!((samples[1].speed - 1.0).abs() < 1e-12);
    Ok(())
}
