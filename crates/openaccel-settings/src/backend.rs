//! The backend seam between curve tooling and a concrete settings store.
//!
//! A backend is addressed by kernel device node (for example
//! `/dev/input/event7`) rather than by any backend-private device id: node
//! paths are what the event pipeline knows, and they stay stable while a
//! display server may renumber its devices at any time.

use crate::error::SettingsResult;
use crate::types::AccelSettings;

/// Reads and writes per-device acceleration settings.
///
/// Implementations are free to narrow values to their wire precision; the
/// X11 store carries single-precision floats, so a value read back may
/// differ from what was written by up to one f32 rounding step.
pub trait SettingsBackend: Send {
    /// Read the full acceleration settings of the device at `node`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Resolution`] if no backend device matches
    /// `node`, or a property/transport error if the device exists but its
    /// acceleration properties cannot be read.
    ///
    /// [`SettingsError::Resolution`]: crate::error::SettingsError::Resolution
    fn get_settings(&self, node: &str) -> SettingsResult<AccelSettings>;

    /// Write acceleration settings to the device at `node`.
    ///
    /// Fields are written in a fixed order (profile first, then the
    /// per-movement functions) and the write aborts on the first failure;
    /// earlier fields are not rolled back.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Resolution`] if no backend device matches
    /// `node`, [`SettingsError::ShapeMismatch`] if a function exceeds the
    /// store's capacity, or a property/transport error from the store.
    ///
    /// [`SettingsError::Resolution`]: crate::error::SettingsError::Resolution
    /// [`SettingsError::ShapeMismatch`]: crate::error::SettingsError::ShapeMismatch
    fn set_settings(&self, node: &str, settings: &AccelSettings) -> SettingsResult<()>;
}

// Shared handles stay usable as backends, since both operations take &self.
impl<T: SettingsBackend + Send + Sync> SettingsBackend for std::sync::Arc<T> {
    fn get_settings(&self, node: &str) -> SettingsResult<AccelSettings> {
        (**self).get_settings(node)
    }

    fn set_settings(&self, node: &str, settings: &AccelSettings) -> SettingsResult<()> {
        (**self).set_settings(node, settings)
    }
}
