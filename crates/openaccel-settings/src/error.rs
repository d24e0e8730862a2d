//! Error types for settings backends.
//!
//! This module provides error handling for backend operations with
//! proper classification of resolution, property and transport failures.

use thiserror::Error;

/// Errors that can occur while reading or writing acceleration settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// No backend device matched the given device node.
    #[error("No device found for node: {node}")]
    Resolution {
        /// The kernel device node that could not be resolved.
        node: String,
    },

    /// A required device property does not exist.
    #[error("Device property not found: {name}")]
    MissingProperty {
        /// The property name that was looked up.
        name: String,
    },

    /// A property exists but has an unexpected type or item format.
    #[error("Device property '{name}' has an unexpected type or format")]
    TypeMismatch {
        /// The property name that was read.
        name: String,
    },

    /// An acceleration function exceeds the backend's point capacity.
    #[error("Acceleration function has {count} points, backend accepts at most {max}")]
    ShapeMismatch {
        /// Number of points in the rejected function.
        count: usize,
        /// Backend capacity.
        max: usize,
    },

    /// Connecting to the display server failed.
    #[error("Failed to connect to the X server")]
    Connect(#[from] x11rb::errors::ConnectError),

    /// The display server connection broke while a request was in flight.
    #[error("X server connection failed")]
    Connection(#[from] x11rb::errors::ConnectionError),

    /// The display server rejected a request.
    #[error("X server request failed")]
    Reply(#[from] x11rb::errors::ReplyError),
}

impl SettingsError {
    /// Create a resolution error for a device node.
    #[must_use]
    pub fn resolution(node: impl Into<String>) -> Self {
        Self::Resolution { node: node.into() }
    }

    /// Create a missing property error.
    #[must_use]
    pub fn missing_property(name: impl Into<String>) -> Self {
        Self::MissingProperty { name: name.into() }
    }

    /// Create a type mismatch error.
    #[must_use]
    pub fn type_mismatch(name: impl Into<String>) -> Self {
        Self::TypeMismatch { name: name.into() }
    }

    /// Create a shape mismatch error.
    #[must_use]
    pub fn shape_mismatch(count: usize, max: usize) -> Self {
        Self::ShapeMismatch { count, max }
    }
}

/// A specialized `Result` type for settings backend operations.
pub type SettingsResult<T> = std::result::Result<T, SettingsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SettingsError::resolution("/dev/input/event7");
        assert!(err.to_string().contains("/dev/input/event7"));

        let err = SettingsError::missing_property("libinput Accel Profile Enabled");
        assert!(err.to_string().contains("libinput Accel Profile Enabled"));

        let err = SettingsError::shape_mismatch(65, 64);
        assert!(err.to_string().contains("65"));
        assert!(err.to_string().contains("64"));
    }

    #[test]
    fn test_error_constructors() {
        let err = SettingsError::type_mismatch("Device Node");
        assert!(matches!(err, SettingsError::TypeMismatch { .. }));

        let err = SettingsError::resolution("/dev/input/event0");
        assert!(matches!(err, SettingsError::Resolution { .. }));
    }
}
