//! Prelude for openaccel-settings.
//!
//! This module re-exports the most commonly used types for convenient importing.
//!
//! # Example
//!
//! ```rust
//! use openaccel_settings::prelude::*;
//!
//! let mut settings = AccelSettings::default();
//! settings.profile = AccelerationProfile::custom();
//! assert_eq!(settings.profile.to_flags(), [0, 0, 1]);
//! ```

pub use crate::backend::SettingsBackend;
pub use crate::error::{SettingsError, SettingsResult};
#[cfg(any(test, feature = "harness"))]
pub use crate::memory::MemoryBackend;
pub use crate::types::{AccelSettings, AccelerationProfile, MovementType, ProfileKind};
pub use crate::x11::X11SettingsBackend;
