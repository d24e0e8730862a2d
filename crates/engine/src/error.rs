//! Error types for the engine.
//!
//! This module provides error handling for device selection, event I/O and
//! backend failures surfaced through a session.

use openaccel_settings::SettingsError;
use thiserror::Error;

/// Errors that can occur in the device registry and session layer.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No enumerated pointer device carries the given name.
    #[error("No pointer device named '{name}'")]
    DeviceNotFound {
        /// The name that was requested.
        name: String,
    },

    /// Opening a device node for reading failed.
    #[error("Failed to attach to {node}: {source}")]
    Attach {
        /// The device node that could not be opened.
        node: String,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// An operation that needs a selected device ran without one.
    #[error("No device is currently selected")]
    NoCurrentDevice,

    /// A restore was requested but no settings snapshot is held.
    #[error("No saved settings to restore")]
    NothingToRestore,

    /// Event stream or reactor I/O failed.
    #[error("Device I/O failed")]
    Io(#[from] std::io::Error),

    /// A settings backend operation failed.
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl EngineError {
    /// Create a device not found error.
    #[must_use]
    pub fn device_not_found(name: impl Into<String>) -> Self {
        Self::DeviceNotFound { name: name.into() }
    }

    /// Create an attach error for a device node.
    #[must_use]
    pub fn attach(node: impl Into<String>, source: std::io::Error) -> Self {
        Self::Attach {
            node: node.into(),
            source,
        }
    }
}

/// A specialized `Result` type for engine operations.
pub type EngineResult<T> = std::result::Result<T, EngineError>;
