//! Behavioral tests for the in-memory settings backend.
//!
//! The memory store mirrors the X11 store's semantics (f32 wire precision,
//! fixed write order, abort without rollback), so these tests double as a
//! specification of what the live backend is expected to do.

use openaccel_curves::{AccelFunction, BezierCurve};
use openaccel_settings::{
    AccelSettings, AccelerationProfile, MemoryBackend, MovementType, SettingsBackend,
    SettingsError,
};
use proptest::prelude::*;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const NODE: &str = "/dev/input/event7";

fn adaptive_settings() -> AccelSettings {
    AccelSettings {
        profile: AccelerationProfile {
            adaptive: true,
            flat: false,
            custom: false,
        },
        ..AccelSettings::default()
    }
}

#[test]
fn test_apply_then_restore_round_trip() -> TestResult {
    // 1. Seed a device running the adaptive profile with no custom functions
    let backend = MemoryBackend::new();
    backend.add_device(NODE, adaptive_settings());

    // 2. Save what the device currently reports
    let saved = backend.get_settings(NODE)?;
    assert!(saved.profile.adaptive);
    assert!(saved.function(MovementType::Motion).is_empty());

    // 3. Apply a custom motion function
    let mut applied = saved.clone();
    applied.install_custom(
        MovementType::Motion,
        AccelFunction::sample(&BezierCurve::default(), 2.0, 2.0),
    );
    backend.set_settings(NODE, &applied)?;

    // 4. The device now runs the custom profile
    let active = backend.get_settings(NODE)?;
    assert!(active.profile.custom);
    assert!(!active.function(MovementType::Motion).is_empty());

    // 5. Restore the saved settings; the profile flips back
    backend.set_settings(NODE, &saved)?;
    let restored = backend.get_settings(NODE)?;
    assert!(restored.profile.adaptive);
    assert!(!restored.profile.custom);

    Ok(())
}

#[test]
fn test_restore_leaves_installed_functions_in_place() -> TestResult {
    // A device that never had custom functions reports them empty, and an
    // empty function is never written. Restoring such a snapshot resets the
    // profile but leaves the previously installed points behind, exactly as
    // the property store would.
    let backend = MemoryBackend::new();
    backend.add_device(NODE, adaptive_settings());
    let saved = backend.get_settings(NODE)?;

    let mut applied = saved.clone();
    applied.install_custom(
        MovementType::Scroll,
        AccelFunction::sample(&BezierCurve::linear(), 1.0, 1.0),
    );
    backend.set_settings(NODE, &applied)?;

    backend.set_settings(NODE, &saved)?;
    let after = backend.get_settings(NODE)?;

    assert!(after.profile.adaptive);
    assert!(!after.function(MovementType::Scroll).is_empty());

    Ok(())
}

#[test]
fn test_functions_narrow_to_f32_on_write() -> TestResult {
    let backend = MemoryBackend::new();
    backend.add_device(NODE, AccelSettings::default());

    let function = AccelFunction::sample(&BezierCurve::default(), 3.0, 3.0);
    let mut settings = AccelSettings::default();
    settings.install_custom(MovementType::Motion, function.clone());
    backend.set_settings(NODE, &settings)?;

    let stored = backend.get_settings(NODE)?;
    let stored_points = stored.function(MovementType::Motion).points();

    assert_eq!(stored_points.len(), function.points().len());
    for (written, read) in function.points().iter().zip(stored_points) {
        let narrowed = f64::from(*written as f32);
        assert_eq!(read.to_bits(), narrowed.to_bits());
    }

    Ok(())
}

#[test]
fn test_unknown_node_is_a_resolution_error() {
    let backend = MemoryBackend::new();
    let result = backend.set_settings("/dev/input/event42", &AccelSettings::default());
    assert!(matches!(result, Err(SettingsError::Resolution { .. })));
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    /// Writing what a read returned changes nothing: narrowing to f32 is
    /// idempotent.
    #[test]
    fn prop_second_write_is_a_fixpoint(
        points in prop::collection::vec(-1000.0f64..1000.0, 1..=64),
        step in 0.0001f64..100.0,
    ) {
        let backend = MemoryBackend::new();
        backend.add_device(NODE, AccelSettings::default());

        let function = match AccelFunction::from_parts(step, points) {
            Ok(f) => f,
            Err(e) => panic!("function construction failed: {e:?}"),
        };
        let mut settings = AccelSettings::default();
        settings.install_custom(MovementType::Motion, function);

        backend.set_settings(NODE, &settings).expect("first write must succeed");
        let first = backend.get_settings(NODE).expect("read must succeed");

        backend.set_settings(NODE, &first).expect("second write must succeed");
        let second = backend.get_settings(NODE).expect("read must succeed");

        prop_assert_eq!(first, second);
    }

    /// Profile flags survive a write/read cycle exactly.
    #[test]
    fn prop_profile_flags_round_trip(adaptive: bool, flat: bool, custom: bool) {
        let backend = MemoryBackend::new();
        backend.add_device(NODE, AccelSettings::default());

        let settings = AccelSettings {
            profile: AccelerationProfile { adaptive, flat, custom },
            ..AccelSettings::default()
        };
        backend.set_settings(NODE, &settings).expect("write must succeed");

        let stored = backend.get_settings(NODE).expect("read must succeed");
        prop_assert_eq!(stored.profile, settings.profile);
    }

    /// Any node that was never seeded resolves to nothing.
    #[test]
    fn prop_unseeded_nodes_never_resolve(suffix in 0u32..10_000) {
        let backend = MemoryBackend::new();
        let node = format!("/dev/input/event{suffix}");
        let result = backend.get_settings(&node);
        prop_assert!(
            matches!(result, Err(SettingsError::Resolution { .. })),
            "expected SettingsError::Resolution"
        );
    }
}
