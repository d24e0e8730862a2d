//! Acceleration session: apply curves to a device, restore on teardown.
//!
//! A session pairs the device registry with a settings backend and keeps
//! one snapshot of the attached device's original settings. The first
//! apply for a device takes the snapshot; every later apply reuses it, so
//! restore always returns to the state before the session touched the
//! device, not to the previous experiment.

use openaccel_curves::AccelFunction;
use openaccel_settings::{AccelSettings, MovementType, SettingsBackend};
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use crate::registry::DeviceRegistry;
use crate::safety::RestoreSettings;

#[derive(Debug, Clone)]
struct SavedSettings {
    node: String,
    settings: AccelSettings,
}

/// Orchestrates applying and restoring acceleration settings.
pub struct AccelSession {
    registry: DeviceRegistry,
    backend: Box<dyn SettingsBackend>,
    saved: Option<SavedSettings>,
}

impl std::fmt::Debug for AccelSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccelSession")
            .field("registry", &self.registry)
            .field("saved", &self.saved.as_ref().map(|s| s.node.as_str()))
            .finish_non_exhaustive()
    }
}

impl AccelSession {
    /// Pair a registry with a settings backend.
    pub fn new(registry: DeviceRegistry, backend: impl SettingsBackend + 'static) -> Self {
        Self {
            registry,
            backend: Box::new(backend),
            saved: None,
        }
    }

    /// The registry driving this session.
    #[must_use]
    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// Mutable access to the registry, for selection and dispatch.
    pub fn registry_mut(&mut self) -> &mut DeviceRegistry {
        &mut self.registry
    }

    /// Whether an original-settings snapshot is being held.
    #[must_use]
    pub fn has_snapshot(&self) -> bool {
        self.saved.is_some()
    }

    fn current_node(&self) -> EngineResult<String> {
        let device = self
            .registry
            .current()
            .ok_or(EngineError::NoCurrentDevice)?;
        Ok(device.node.to_string_lossy().into_owned())
    }

    /// Read the attached device's settings as the backend sees them now.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoCurrentDevice`] without an attachment,
    /// otherwise propagates backend errors.
    pub fn device_settings(&self) -> EngineResult<AccelSettings> {
        let node = self.current_node()?;
        Ok(self.backend.get_settings(&node)?)
    }

    /// Apply a custom acceleration function to the attached device.
    ///
    /// The untouched movement type's function is left empty, which the
    /// backend skips, so applying a motion curve never disturbs the
    /// device's scroll function and vice versa.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoCurrentDevice`] without an attachment,
    /// otherwise propagates backend errors. A failed write leaves the
    /// snapshot in place for a later restore.
    pub fn apply(&mut self, movement: MovementType, function: AccelFunction) -> EngineResult<()> {
        let node = self.current_node()?;

        if self.saved.as_ref().is_some_and(|saved| saved.node != node) {
            // Only one snapshot is held; switching devices mid-session
            // abandons the old device's restore path.
            if let Some(stale) = self.saved.take() {
                warn!(node = %stale.node, "dropping snapshot for a previously applied device");
            }
        }
        if self.saved.is_none() {
            let settings = self.backend.get_settings(&node)?;
            info!(
                node = %node,
                profile = ?settings.profile.kind(),
                motion_points = settings.motion.points().len(),
                scroll_points = settings.scroll.points().len(),
                "saved original settings"
            );
            self.saved = Some(SavedSettings {
                node: node.clone(),
                settings,
            });
        }

        let mut applied = AccelSettings::default();
        applied.install_custom(movement, function);
        self.backend.set_settings(&node, &applied)?;
        debug!(node = %node, %movement, "applied custom acceleration function");
        Ok(())
    }

    /// Write the saved snapshot back and drop it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NothingToRestore`] when no snapshot is
    /// held. A failed backend write puts the snapshot back so restore
    /// can be retried.
    pub fn restore(&mut self) -> EngineResult<()> {
        let saved = self.saved.take().ok_or(EngineError::NothingToRestore)?;
        if let Err(error) = self.backend.set_settings(&saved.node, &saved.settings) {
            self.saved = Some(saved);
            return Err(error.into());
        }
        info!(node = %saved.node, "restored original settings");
        Ok(())
    }

    /// Keep the applied settings: drop the snapshot without writing.
    pub fn keep_applied(&mut self) {
        if let Some(saved) = self.saved.take() {
            info!(node = %saved.node, "keeping applied settings");
        }
    }
}

impl RestoreSettings for AccelSession {
    fn restore_saved(&mut self) -> EngineResult<()> {
        self.restore()
    }
}

impl Drop for AccelSession {
    fn drop(&mut self) {
        if self.saved.is_some() {
            if let Err(error) = self.restore() {
                warn!(%error, "failed to restore settings during teardown");
            }
        }
    }
}
