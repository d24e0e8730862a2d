//! In-memory settings store for tests and offline development.
//!
//! Behaves like the X11 store without a server: devices are seeded by
//! node, values are narrowed to f32 wire precision on write, and a write
//! aborts on the first rejected field without rolling back earlier ones.

use std::collections::HashMap;

use openaccel_curves::{AccelFunction, MAX_POINTS};
use parking_lot::RwLock;

use crate::backend::SettingsBackend;
use crate::error::{SettingsError, SettingsResult};
use crate::types::{AccelSettings, MovementType};

/// Settings backend holding per-node settings in process memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    devices: RwLock<HashMap<String, AccelSettings>>,
}

impl MemoryBackend {
    /// Create an empty store with no devices.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a device at `node` with its current settings.
    pub fn add_device(&self, node: impl Into<String>, settings: AccelSettings) {
        self.devices.write().insert(node.into(), settings);
    }

    /// Direct view of what the store holds, for assertions.
    #[must_use]
    pub fn stored(&self, node: &str) -> Option<AccelSettings> {
        self.devices.read().get(node).cloned()
    }
}

/// Narrow a function to f32 wire precision, enforcing store capacity.
fn narrow_function(function: &AccelFunction) -> SettingsResult<AccelFunction> {
    let count = function.points().len();
    if count > MAX_POINTS {
        return Err(SettingsError::shape_mismatch(count, MAX_POINTS));
    }

    let points = function
        .points()
        .iter()
        .map(|&v| f64::from(v as f32))
        .collect();
    let step = f64::from(function.step() as f32);

    match AccelFunction::from_parts(step, points) {
        Ok(narrowed) => Ok(narrowed),
        Err(_) => Err(SettingsError::shape_mismatch(count, MAX_POINTS)),
    }
}

impl SettingsBackend for MemoryBackend {
    fn get_settings(&self, node: &str) -> SettingsResult<AccelSettings> {
        self.devices
            .read()
            .get(node)
            .cloned()
            .ok_or_else(|| SettingsError::resolution(node))
    }

    fn set_settings(&self, node: &str, settings: &AccelSettings) -> SettingsResult<()> {
        let mut devices = self.devices.write();
        let Some(entry) = devices.get_mut(node) else {
            return Err(SettingsError::resolution(node));
        };

        // Same field order as the X store: the profile lands first and
        // sticks even when a later function write is rejected.
        entry.profile = settings.profile;

        for movement in MovementType::ALL {
            let function = settings.function(movement);
            if function.is_empty() {
                continue;
            }
            let narrowed = narrow_function(function)?;
            entry.set_function(movement, narrowed);
        }

        Ok(())
    }
}
